//! The resize pipeline.
//!
//! ```text
//! discover  →  map to tasks  →  worker pool  →  RunReport
//! (scan)       (naming)         (pool + imaging)
//! ```
//!
//! The task list is fully built before any worker starts. Each task is
//! independent: a failure is recorded in its [`TaskOutcome`] and the run goes
//! on. Whether a failure should fail the process is left to the caller (see
//! [`RunReport::is_success`]).
//!
//! Progress is reported as [`ProcessEvent`]s over an optional channel, one
//! event per finished image, in completion order.

use crate::config::ResizeConfig;
use crate::imaging::{BackendError, ImageBackend, ResizeOutcome, RustBackend, transform};
use crate::naming::{Collision, find_collisions, map_tasks};
use crate::pool::{PoolError, WorkerPool};
use crate::scan::{ScanError, discover_images};
use crate::types::ImageTask;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),
}

/// Progress notifications sent while the pool runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// Sent once, before any worker starts.
    RunStarted { total: usize, workers: usize },
    /// Sent by a worker when its image is done, successfully or not.
    ImageFinished {
        /// 1-based position in discovery order.
        index: usize,
        total: usize,
        input: PathBuf,
        output: PathBuf,
        status: ImageStatus,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageStatus {
    Resized(ResizeOutcome),
    Failed(String),
}

/// What happened to one task.
#[derive(Debug)]
pub struct TaskOutcome {
    /// 1-based position in discovery order.
    pub index: usize,
    pub task: ImageTask,
    pub result: Result<ResizeOutcome, BackendError>,
}

/// Aggregate result of a run, in discovery order.
#[derive(Debug)]
pub struct RunReport {
    pub output_dir: PathBuf,
    pub outcomes: Vec<TaskOutcome>,
    pub collisions: Vec<Collision>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ImageTask, &BackendError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.task, e)))
    }

    /// True when every task succeeded.
    pub fn is_success(&self) -> bool {
        self.succeeded() == self.total()
    }
}

/// Resize every image under `input_dir` into `output_dir`.
pub fn process(
    input_dir: &Path,
    output_dir: &Path,
    config: &ResizeConfig,
    workers: usize,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunReport, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, input_dir, output_dir, config, workers, events)
}

/// Run the pipeline using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    input_dir: &Path,
    output_dir: &Path,
    config: &ResizeConfig,
    workers: usize,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunReport, ProcessError> {
    let pool = WorkerPool::new(workers)?;

    let inputs = discover_images(input_dir)?;
    let tasks = map_tasks(&inputs, output_dir, &config.output_extension);
    let collisions = find_collisions(&tasks);
    for collision in &collisions {
        warn!(
            output = %collision.output.display(),
            inputs = collision.inputs.len(),
            "several inputs map to the same output; only one result will remain"
        );
    }

    std::fs::create_dir_all(output_dir)?;

    let total = tasks.len();
    let workers = pool.workers();
    info!(
        total,
        workers,
        input = %input_dir.display(),
        output = %output_dir.display(),
        "starting resize run"
    );
    if let Some(tx) = &events {
        // A closed receiver only means nobody is listening.
        let _ = tx.send(ProcessEvent::RunStarted { total, workers });
    }

    let numbered: Vec<(usize, ImageTask)> = tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| (i + 1, task))
        .collect();

    let outcomes = pool.run(&numbered, |(index, task)| {
        let result = transform(backend, task, config);
        let status = match &result {
            Ok(outcome) => {
                debug!(input = %task.input.display(), output = %task.output.display(), "resized");
                ImageStatus::Resized(*outcome)
            }
            Err(err) => {
                warn!(input = %task.input.display(), error = %err, "resize failed");
                ImageStatus::Failed(err.to_string())
            }
        };
        if let Some(tx) = &events {
            let _ = tx.send(ProcessEvent::ImageFinished {
                index: *index,
                total,
                input: task.input.clone(),
                output: task.output.clone(),
                status,
            });
        }
        TaskOutcome {
            index: *index,
            task: task.clone(),
            result,
        }
    })?;

    let report = RunReport {
        output_dir: output_dir.to_path_buf(),
        outcomes,
        collisions,
    };
    info!(
        succeeded = report.succeeded(),
        failed = report.total() - report.succeeded(),
        "resize run finished"
    );
    Ok(report)
}
