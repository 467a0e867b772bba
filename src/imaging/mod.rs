//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Resample** | `fast_image_resize` (box for area averaging, Catmull-Rom for cubic) |
//! | **Pad** | `image::imageops::replace` onto a solid canvas |
//! | **Encode** | `image`, format chosen by output extension |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for square geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{Padding, ResizePlan};
pub use operations::{ResizeOutcome, plan_for, transform};
pub use params::{Filter, PixelFormat, RenderParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
