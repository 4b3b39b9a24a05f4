//! Execution strategies for product valuation.
//!
//! [`ValuationExecutor`] runs one task per calibration product, either on a
//! dedicated rayon pool or inline on the calling thread. Both strategies
//! return the results in task order and only after every task has finished.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

/// A valuation task that did not complete.
///
/// Raised when a task panics instead of returning its result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("valuation task {index} did not complete: {message}")]
pub struct ValuationTaskError {
    /// Index of the failed task
    pub index: usize,
    /// Panic message
    pub message: String,
}

/// Parallel or inline execution of independent valuation tasks.
///
/// The worker pool is owned by the executor and shut down when it is dropped.
///
/// # Example
///
/// ```
/// use pricer_optimiser::calibration::ValuationExecutor;
///
/// let executor = ValuationExecutor::parallel(4).unwrap();
/// let squares = executor.execute(5, |i| i * i).unwrap();
/// assert_eq!(squares, vec![0, 1, 4, 9, 16]);
///
/// let inline = ValuationExecutor::inline();
/// assert_eq!(inline.execute(5, |i| i * i).unwrap(), squares);
/// ```
pub enum ValuationExecutor {
    /// Run tasks sequentially on the calling thread, in submission order.
    Inline,
    /// Run tasks on a dedicated worker pool.
    Parallel(ThreadPool),
}

impl ValuationExecutor {
    /// Inline executor.
    pub fn inline() -> Self {
        Self::Inline
    }

    /// Executor backed by a pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns the pool build error if the workers cannot be spawned.
    pub fn parallel(threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("calibration-valuation-{i}"))
            .build()?;
        Ok(Self::Parallel(pool))
    }

    /// Executor for an optional worker count; `None` or `0` runs inline.
    pub fn from_threads(threads: Option<usize>) -> Result<Self, rayon::ThreadPoolBuildError> {
        match threads {
            None | Some(0) => Ok(Self::inline()),
            Some(n) => Self::parallel(n),
        }
    }

    /// Suggested worker count: twice the number of cores, at least four.
    pub fn default_parallelism() -> usize {
        2 * num_cpus::get().max(2)
    }

    /// Whether tasks run on a worker pool.
    pub fn is_parallel(&self) -> bool {
        matches!(self, Self::Parallel(_))
    }

    /// Number of threads running tasks.
    pub fn threads(&self) -> usize {
        match self {
            Self::Inline => 1,
            Self::Parallel(pool) => pool.current_num_threads(),
        }
    }

    /// Run `task(0)`, ..., `task(count - 1)` and collect the results in order.
    ///
    /// # Errors
    ///
    /// [`ValuationTaskError`] if a task panics.
    pub fn execute<T, F>(&self, count: usize, task: F) -> Result<Vec<T>, ValuationTaskError>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        let run = |index: usize| {
            panic::catch_unwind(AssertUnwindSafe(|| task(index))).map_err(|payload| {
                ValuationTaskError {
                    index,
                    message: panic_message(payload.as_ref()),
                }
            })
        };

        match self {
            Self::Inline => (0..count).map(run).collect(),
            Self::Parallel(pool) => pool.install(|| (0..count).into_par_iter().map(run).collect()),
        }
    }
}

impl fmt::Debug for ValuationExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => f.write_str("Inline"),
            Self::Parallel(pool) => f
                .debug_tuple("Parallel")
                .field(&pool.current_num_threads())
                .finish(),
        }
    }
}

/// Text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_from_threads() {
        assert!(!ValuationExecutor::from_threads(None).unwrap().is_parallel());
        assert!(!ValuationExecutor::from_threads(Some(0)).unwrap().is_parallel());

        let executor = ValuationExecutor::from_threads(Some(3)).unwrap();
        assert!(executor.is_parallel());
        assert_eq!(executor.threads(), 3);
    }

    #[test]
    fn test_default_parallelism() {
        assert!(ValuationExecutor::default_parallelism() >= 4);
        assert_eq!(ValuationExecutor::default_parallelism() % 2, 0);
    }

    #[test]
    fn test_inline_runs_in_submission_order() {
        let next = AtomicUsize::new(0);
        let order = ValuationExecutor::inline()
            .execute(10, |_| next.fetch_add(1, Ordering::SeqCst))
            .unwrap();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_parallel_preserves_order() {
        let executor = ValuationExecutor::parallel(4).unwrap();
        let results = executor
            .execute(100, |i| {
                // Uneven work so tasks finish out of order
                std::thread::sleep(std::time::Duration::from_micros(((100 - i) % 7) as u64 * 50));
                i * 2
            })
            .unwrap();
        assert_eq!(results, (0..100).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_every_task_completes() {
        let counter = AtomicUsize::new(0);
        let executor = ValuationExecutor::parallel(3).unwrap();
        executor
            .execute(50, |_| counter.fetch_add(1, Ordering::SeqCst))
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn test_empty_task_list() {
        let results: Vec<f64> = ValuationExecutor::parallel(2)
            .unwrap()
            .execute(0, |_| 1.0)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_panicking_task_is_reported() {
        for executor in [ValuationExecutor::inline(), ValuationExecutor::parallel(2).unwrap()] {
            let err = executor
                .execute(4, |i| {
                    if i == 2 {
                        panic!("worker lost");
                    }
                    i
                })
                .unwrap_err();
            assert_eq!(err.index, 2);
            assert_eq!(err.message, "worker lost");
        }
    }

    #[test]
    fn test_panic_message_formats() {
        let owned: Box<dyn Any + Send> = Box::new(format!("task {}", 3));
        assert_eq!(panic_message(owned.as_ref()), "task 3");

        let other: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    proptest! {
        #[test]
        fn prop_inline_and_parallel_results_agree(
            values in proptest::collection::vec(-1e3..1e3_f64, 0..64),
            threads in 1..6_usize,
        ) {
            let task = |i: usize| values[i] * (i as f64 + 1.0);
            let inline = ValuationExecutor::inline().execute(values.len(), task).unwrap();
            let parallel = ValuationExecutor::parallel(threads)
                .unwrap()
                .execute(values.len(), task)
                .unwrap();
            prop_assert_eq!(inline.len(), values.len());
            prop_assert_eq!(inline, parallel);
        }
    }
}
