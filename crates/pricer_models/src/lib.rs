//! # Pricer Models (L2: Business Logic)
//!
//! Volatility models and the short-rate model they drive.
//!
//! This crate provides:
//! - The volatility model traits (`VolatilityModel`, `ParametricVolatilityModel`)
//! - A four-parameter exponential model bootstrapped from caplet volatilities
//! - A constant volatility model
//! - The Hull-White short-rate model with volatility substitution
//!
//! ## Design Principles
//!
//! - **Immutable models** shared through `Arc`
//! - **Clone-on-modify** parameters; non-calibrateable models return themselves
//! - **Non-negative volatilities** by construction

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod models;
