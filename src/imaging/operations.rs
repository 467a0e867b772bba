//! High-level image operations.
//!
//! These functions combine calculations with backend execution: identify the
//! source, compute the plan for the configured mode, and hand it to the
//! backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{ResizePlan, plan_pad_to_square, plan_stretch};
use super::params::RenderParams;
use crate::config::{ResizeConfig, ResizeMode};
use crate::types::ImageTask;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// What was done to one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOutcome {
    /// Source dimensions (width, height).
    pub source: (u32, u32),
    pub plan: ResizePlan,
}

/// Compute the plan for a source of the given size.
pub fn plan_for(source: (u32, u32), config: &ResizeConfig) -> ResizePlan {
    match config.mode {
        ResizeMode::Stretch => plan_stretch(config.side_length),
        ResizeMode::PadToSquare => plan_pad_to_square(source, config.side_length),
    }
}

/// Resize one task's input into its output.
pub fn transform(
    backend: &impl ImageBackend,
    task: &ImageTask,
    config: &ResizeConfig,
) -> Result<ResizeOutcome> {
    let dims = backend.identify(&task.input)?;
    let source = (dims.width, dims.height);
    let plan = plan_for(source, config);

    backend.render(&RenderParams {
        source: task.input.clone(),
        output: task.output.clone(),
        plan,
        pad_color: config.pad_color,
    })?;

    Ok(ResizeOutcome { source, plan })
}
