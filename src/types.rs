//! Types shared between discovery, the pool and the pipeline.

use std::path::PathBuf;

/// One unit of work: resize `input` and write the result to `output`.
///
/// Built once per discovered file by [`naming::map_tasks`](crate::naming::map_tasks)
/// and consumed exactly once by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTask {
    pub input: PathBuf,
    pub output: PathBuf,
}
