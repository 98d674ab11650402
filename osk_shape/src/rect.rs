// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle helpers shared by transforms, paths, and the layout tree.

use kurbo::Rect;

/// Axis along which a container distributes its children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right, along x.
    #[default]
    Horizontal,
    /// Top to bottom, along y.
    Vertical,
}

impl Axis {
    /// The other axis.
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Layout-oriented operations on [`kurbo::Rect`].
///
/// None of these normalize the rectangle: deflating past zero size leaves
/// `x0 > x1`, which [`RectExt::is_degenerate`] then reports.
pub trait RectExt {
    /// True if the rectangle has no area: `width <= 0` or `height <= 0`.
    fn is_degenerate(&self) -> bool;

    /// Shrink by `dx` on the left and right and by `dy` on the top and bottom.
    fn deflate_by(&self, dx: f64, dy: f64) -> Rect;

    /// Grow by `dx` on the left and right and by `dy` on the top and bottom.
    fn inflate_by(&self, dx: f64, dy: f64) -> Rect;

    /// Start coordinate along `axis`.
    fn start(&self, axis: Axis) -> f64;

    /// Width for [`Axis::Horizontal`], height for [`Axis::Vertical`].
    fn extent(&self, axis: Axis) -> f64;

    /// Copy of `self` with the span along `axis` replaced by `start..start + length`.
    fn with_span(&self, axis: Axis, start: f64, length: f64) -> Rect;
}

impl RectExt for Rect {
    #[inline]
    fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    #[inline]
    fn deflate_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x0 + dx, self.y0 + dy, self.x1 - dx, self.y1 - dy)
    }

    #[inline]
    fn inflate_by(&self, dx: f64, dy: f64) -> Rect {
        self.deflate_by(-dx, -dy)
    }

    #[inline]
    fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x0,
            Axis::Vertical => self.y0,
        }
    }

    #[inline]
    fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width(),
            Axis::Vertical => self.height(),
        }
    }

    fn with_span(&self, axis: Axis, start: f64, length: f64) -> Rect {
        match axis {
            Axis::Horizontal => Rect::new(start, self.y0, start + length, self.y1),
            Axis::Vertical => Rect::new(self.x0, start, self.x1, start + length),
        }
    }
}

/// `numerator / denominator`, or zero when the denominator has no extent.
#[inline]
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
