//! Parallel compile execution.
//!
//! Components are independent of each other, so the pool hands them out to
//! a fixed number of scoped worker threads. Each worker pulls the next
//! index from a shared counter until the list is exhausted; a slow compile
//! never holds up the start of the next one. The worker handles are
//! collected and joined before [`WorkerPool::run`] returns.
//!
//! # Example
//!
//! ```ignore
//! use felib_build::build::WorkerPool;
//!
//! let results = WorkerPool::new(4).run(&sources, |source| compile(source));
//! ```

use crate::build::result::ComponentResult;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Default number of parallel jobs (uses available parallelism).
pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// A unit of work result that can report failure.
pub trait Outcome {
    /// Whether this outcome counts as a failure.
    fn is_failure(&self) -> bool;
}

impl Outcome for ComponentResult {
    fn is_failure(&self) -> bool {
        self.status.is_failure()
    }
}

/// Bounded pool of scoped worker threads.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    /// Number of parallel jobs
    jobs: usize,
    /// Whether to stop starting work after the first failure
    fail_fast: bool,
}

impl WorkerPool {
    /// Create a pool with `jobs` workers; `0` means available parallelism.
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { default_jobs() } else { jobs };
        Self { jobs, fail_fast: false }
    }

    /// Set fail-fast mode (stop on first error).
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Get the number of parallel jobs.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Run `work` for every item and return the outcomes in item order.
    ///
    /// In fail-fast mode, items that were not yet started when a failure
    /// was observed are left out of the returned list.
    pub fn run<T, R, F>(&self, items: &[T], work: F) -> Vec<R>
    where
        T: Sync,
        R: Outcome + Send,
        F: Fn(&T) -> R + Sync,
    {
        if items.is_empty() {
            return vec![];
        }

        let next_idx = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);
        let num_workers = self.jobs.min(items.len()).max(1);
        let fail_fast = self.fail_fast;

        let mut results: Vec<(usize, R)> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..num_workers)
                .map(|_| {
                    let next_idx = &next_idx;
                    let failed = &failed;
                    let work = &work;
                    s.spawn(move || {
                        let mut done = Vec::new();
                        loop {
                            if fail_fast && failed.load(Ordering::SeqCst) {
                                break;
                            }

                            let idx = next_idx.fetch_add(1, Ordering::SeqCst);
                            if idx >= items.len() {
                                break;
                            }

                            let outcome = work(&items[idx]);
                            if outcome.is_failure() {
                                failed.store(true, Ordering::SeqCst);
                            }
                            done.push((idx, outcome));
                        }
                        done
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(done) => done,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        results.sort_by_key(|(idx, _)| *idx);
        results.into_iter().map(|(_, r)| r).collect()
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(0)
    }
}
