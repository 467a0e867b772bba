//! Bounded worker pool.
//!
//! A [rayon](https://docs.rs/rayon) thread pool is built for each run and
//! dropped when the run ends; nothing is installed globally. With `n` threads,
//! at most `n` jobs execute at once, which bounds open files and decoded image
//! buffers to `n`.
//!
//! Jobs must not schedule parallel work of their own: a worker blocked on a
//! nested join may steal another job, and the bound no longer holds.
//!
//! A job returns a value, including failures, rather than panicking or
//! short-circuiting, so one bad input never stops its siblings.

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Worker pool needs at least one worker")]
    NoWorkers,
    #[error("Failed to start worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),
}

/// Fixed-size pool, scoped to the [`run`](WorkerPool::run) call.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        if workers == 0 {
            return Err(PoolError::NoWorkers);
        }
        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job` over every task and block until all have finished.
    ///
    /// Results are returned in task order; completion order is unspecified.
    pub fn run<T, R, F>(&self, tasks: &[T], job: F) -> Result<Vec<R>, PoolError>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("resquare-worker-{i}"))
            .build()?;
        debug!(workers = self.workers, tasks = tasks.len(), "worker pool started");

        let results: Vec<R> = pool.install(|| tasks.par_iter().map(&job).collect());
        debug!("worker pool drained");
        Ok(results)
    }
}
