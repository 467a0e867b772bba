//! # resquare
//!
//! Batch-resize every image under a directory into fixed-size squares.
//!
//! # Architecture
//!
//! ```text
//! input/  →  discover  →  tasks  →  worker pool  →  output/<stem><ext>
//!            (scan)       (naming)   (pool + imaging)
//! ```
//!
//! The whole task list is built before any image is decoded. Each task is then
//! handled by one worker, start to finish: identify, plan, decode, resample,
//! pad, encode. Tasks share nothing but the read-only [`config::ResizeConfig`]
//! and the progress channel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Layered settings: stock defaults, TOML file, CLI flags |
//! | [`scan`] | Recursive discovery of image files |
//! | [`naming`] | Input → output path mapping and collision detection |
//! | [`types`] | [`ImageTask`](types::ImageTask), the unit of work |
//! | [`imaging`] | Square geometry and the pure-Rust pixel backend |
//! | [`pool`] | Fixed-size worker pool |
//! | [`process`] | The pipeline tying the above together |
//! | [`output`] | CLI progress and summary formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Geometry Before Pixels
//!
//! All sizing decisions live in [`imaging::calculations`] as pure functions of
//! the source dimensions and the side length. The backend only executes a
//! [`imaging::ResizePlan`], which keeps the rounding and padding rules
//! testable without decoding a single image.
//!
//! ## Failures Stay Local
//!
//! A file that cannot be decoded or written fails its own task only. The run
//! finishes every other task, then reports the failures and exits non-zero.
//!
//! ## Flat Output
//!
//! Outputs are named by file stem alone, so inputs from different
//! subdirectories can claim the same output path. Such collisions are
//! reported before the pool starts; they are not renamed away.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod naming;
pub mod output;
pub mod pool;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
