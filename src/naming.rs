//! Output path derivation.
//!
//! Every input maps to `output_dir / (stem + extension)`. Directory structure
//! below the input root is flattened and the original extension dropped:
//!
//! - `in/photo1.JPG` + `.png` → `out/photo1.png`
//! - `in/trips/2019/beach.tiff` + `.jpg` → `out/beach.jpg`
//!
//! Two inputs with the same stem therefore claim the same output
//! (`a.jpg` and `sub/a.png` both become `a.png`). This is detected by
//! [`find_collisions`] and reported, but never renamed away.

use crate::types::ImageTask;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Output path for one input file.
pub fn output_path(input: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{extension}"))
}

/// Pair each input with its output, preserving input order.
pub fn map_tasks(inputs: &[PathBuf], output_dir: &Path, extension: &str) -> Vec<ImageTask> {
    inputs
        .iter()
        .map(|input| ImageTask {
            input: input.clone(),
            output: output_path(input, output_dir, extension),
        })
        .collect()
}

/// An output path claimed by more than one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub output: PathBuf,
    pub inputs: Vec<PathBuf>,
}

/// All output paths shared by two or more tasks, sorted by output path.
pub fn find_collisions(tasks: &[ImageTask]) -> Vec<Collision> {
    let mut by_output: BTreeMap<&Path, Vec<PathBuf>> = BTreeMap::new();
    for task in tasks {
        by_output
            .entry(task.output.as_path())
            .or_default()
            .push(task.input.clone());
    }
    by_output
        .into_iter()
        .filter(|(_, inputs)| inputs.len() > 1)
        .map(|(output, inputs)| Collision {
            output: output.to_path_buf(),
            inputs,
        })
        .collect()
}
