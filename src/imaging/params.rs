//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between [`operations`](super::operations), which decides the
//! geometry, and the [`backend`](super::backend), which does the pixel work.
//!
//! ## Types
//!
//! - [`PixelFormat`]: Channel layout of a decoded raster, carried explicitly.
//! - [`Filter`]: Resampling kernel, area averaging or cubic.
//! - [`RenderParams`]: Everything one render needs (source, output, plan, pad colour).

use super::calculations::ResizePlan;
use crate::config::PadColor;
use std::path::PathBuf;

/// Channel layout of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One luma channel.
    Grayscale,
    /// Three channels, RGB order.
    Color,
}

/// Resampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Box kernel scaled to the resize factor: averages every source pixel
    /// that falls under a destination pixel.
    Area,
    /// Catmull-Rom cubic interpolation, used for enlarging.
    Cubic,
}

/// Parameters for rendering one output image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub plan: ResizePlan,
    pub pad_color: PadColor,
}
