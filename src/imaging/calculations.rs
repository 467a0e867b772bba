//! Pure calculation functions for square output geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Filter;

/// Border widths added around the scaled image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Padding {
    pub fn is_empty(&self) -> bool {
        self.top == 0 && self.bottom == 0 && self.left == 0 && self.right == 0
    }
}

/// Geometry for one image: resample to `width × height` with `filter`, then
/// add `padding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    /// Scaled content width, before padding.
    pub width: u32,
    /// Scaled content height, before padding.
    pub height: u32,
    pub filter: Filter,
    pub padding: Padding,
}

impl ResizePlan {
    /// Final canvas size after padding.
    pub fn output_dimensions(&self) -> (u32, u32) {
        (
            self.width + self.padding.left + self.padding.right,
            self.height + self.padding.top + self.padding.bottom,
        )
    }
}

/// Area averaging when shrinking in either dimension, cubic otherwise.
pub fn choose_filter(source: (u32, u32), side: u32) -> Filter {
    let (w, h) = source;
    if h > side || w > side {
        Filter::Area
    } else {
        Filter::Cubic
    }
}

/// Resample straight to the square; always area averaging, never padding.
pub fn plan_stretch(side: u32) -> ResizePlan {
    ResizePlan {
        width: side,
        height: side,
        filter: Filter::Area,
        padding: Padding::default(),
    }
}

/// Scale so the longer edge equals `side`, then pad the shorter edge.
///
/// The shorter scaled edge is `round(side / aspect)` (landscape) or
/// `round(side * aspect)` (portrait), rounding half to even, and never less
/// than one pixel. Odd padding puts the extra pixel bottom/right.
///
/// # Examples
/// ```
/// # use resquare::imaging::calculations::plan_pad_to_square;
/// // 400x200 into 256: content 256x128, 64 rows above and below
/// let plan = plan_pad_to_square((400, 200), 256);
/// assert_eq!((plan.width, plan.height), (256, 128));
/// assert_eq!((plan.padding.top, plan.padding.bottom), (64, 64));
/// ```
pub fn plan_pad_to_square(source: (u32, u32), side: u32) -> ResizePlan {
    let (src_w, src_h) = source;
    let filter = choose_filter(source, side);
    let aspect = src_w as f64 / src_h as f64;

    let (width, height, padding) = if aspect > 1.0 {
        // Landscape: width fills, pad top and bottom
        let h = scaled_edge(side as f64 / aspect, side);
        let (top, bottom) = split_padding(side - h);
        (
            side,
            h,
            Padding {
                top,
                bottom,
                ..Padding::default()
            },
        )
    } else if aspect < 1.0 {
        // Portrait: height fills, pad left and right
        let w = scaled_edge(side as f64 * aspect, side);
        let (left, right) = split_padding(side - w);
        (
            w,
            side,
            Padding {
                left,
                right,
                ..Padding::default()
            },
        )
    } else {
        (side, side, Padding::default())
    };

    ResizePlan {
        width,
        height,
        filter,
        padding,
    }
}

fn scaled_edge(exact: f64, side: u32) -> u32 {
    (exact.round_ties_even() as u32).clamp(1, side)
}

/// Split a total into `(floor(total/2), ceil(total/2))`.
fn split_padding(total: u32) -> (u32, u32) {
    let first = total / 2;
    (first, total - first)
}
