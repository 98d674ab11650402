// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between a layout's logical space and canvas (pixel) space.

use kurbo::{Point, Rect, Vec2};

use crate::path::KeyPath;
use crate::rect::{RectExt, ratio};

const UNIT_RECT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

/// Axis-aligned affine map from a logical rectangle onto a canvas rectangle.
///
/// Every layout item owns one. The logical rectangle is recomputed bottom-up
/// before a fit; the canvas rectangle is assigned top-down during the fit.
///
/// Degenerate rectangles never cause a division by zero: an axis whose
/// denominator has no extent scales by `0.0`, collapsing onto the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransform {
    initial_log_rect: Rect,
    log_rect: Rect,
    canvas_rect: Rect,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            initial_log_rect: UNIT_RECT,
            log_rect: UNIT_RECT,
            canvas_rect: UNIT_RECT,
        }
    }
}

impl CoordinateTransform {
    /// Create a transform whose initial and current logical rects are `log_rect`.
    ///
    /// The canvas rect starts out as the unit rectangle.
    pub fn new(log_rect: Rect) -> Self {
        Self {
            initial_log_rect: log_rect,
            log_rect,
            canvas_rect: UNIT_RECT,
        }
    }

    /// Create a transform mapping `log_rect` onto `canvas_rect`.
    pub fn from_rects(log_rect: Rect, canvas_rect: Rect) -> Self {
        Self {
            initial_log_rect: log_rect,
            log_rect,
            canvas_rect,
        }
    }

    /// Logical rect as loaded, before any recomputation.
    pub fn initial_log_rect(&self) -> Rect {
        self.initial_log_rect
    }

    /// Current logical bounding box.
    pub fn log_rect(&self) -> Rect {
        self.log_rect
    }

    /// Current canvas bounding box.
    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    /// Replace the current logical rect.
    pub fn set_log_rect(&mut self, rect: Rect) {
        self.log_rect = rect;
    }

    /// Replace the current canvas rect.
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Replace the initial logical rect.
    ///
    /// Only loaders should need this, while a tree is still being assembled.
    pub fn set_initial_log_rect(&mut self, rect: Rect) {
        self.initial_log_rect = rect;
    }

    #[inline]
    fn log_to_canvas_scale(&self) -> Vec2 {
        Vec2::new(
            ratio(self.canvas_rect.width(), self.log_rect.width()),
            ratio(self.canvas_rect.height(), self.log_rect.height()),
        )
    }

    #[inline]
    fn canvas_to_log_scale(&self) -> Vec2 {
        Vec2::new(
            ratio(self.log_rect.width(), self.canvas_rect.width()),
            ratio(self.log_rect.height(), self.canvas_rect.height()),
        )
    }

    /// Map a logical x coordinate to canvas space.
    pub fn log_to_canvas_x(&self, x: f64) -> f64 {
        self.canvas_rect.x0 + (x - self.log_rect.x0) * self.log_to_canvas_scale().x
    }

    /// Map a logical y coordinate to canvas space.
    pub fn log_to_canvas_y(&self, y: f64) -> f64 {
        self.canvas_rect.y0 + (y - self.log_rect.y0) * self.log_to_canvas_scale().y
    }

    /// Map a canvas x coordinate to logical space.
    pub fn canvas_to_log_x(&self, x: f64) -> f64 {
        self.log_rect.x0 + (x - self.canvas_rect.x0) * self.canvas_to_log_scale().x
    }

    /// Map a canvas y coordinate to logical space.
    pub fn canvas_to_log_y(&self, y: f64) -> f64 {
        self.log_rect.y0 + (y - self.canvas_rect.y0) * self.canvas_to_log_scale().y
    }

    /// Map a logical point to canvas space.
    pub fn log_to_canvas(&self, p: Point) -> Point {
        Point::new(self.log_to_canvas_x(p.x), self.log_to_canvas_y(p.y))
    }

    /// Map a canvas point to logical space.
    pub fn canvas_to_log(&self, p: Point) -> Point {
        Point::new(self.canvas_to_log_x(p.x), self.canvas_to_log_y(p.y))
    }

    /// Scale a logical distance to canvas units, ignoring translation.
    pub fn scale_log_to_canvas(&self, v: Vec2) -> Vec2 {
        let s = self.log_to_canvas_scale();
        Vec2::new(v.x * s.x, v.y * s.y)
    }

    /// Scale a canvas distance to logical units, ignoring translation.
    pub fn scale_canvas_to_log(&self, v: Vec2) -> Vec2 {
        let s = self.canvas_to_log_scale();
        Vec2::new(v.x * s.x, v.y * s.y)
    }

    /// Map a logical rect to canvas space.
    ///
    /// Returns [`Rect::ZERO`] if `rect` has no area.
    pub fn log_to_canvas_rect(&self, rect: Rect) -> Rect {
        if rect.is_degenerate() {
            return Rect::ZERO;
        }
        let origin = self.log_to_canvas(rect.origin());
        let size = self.scale_log_to_canvas(Vec2::new(rect.width(), rect.height()));
        Rect::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    /// Map a canvas rect to logical space.
    ///
    /// Returns [`Rect::ZERO`] if `rect` has no area.
    pub fn canvas_to_log_rect(&self, rect: Rect) -> Rect {
        if rect.is_degenerate() {
            return Rect::ZERO;
        }
        let origin = self.canvas_to_log(rect.origin());
        let size = self.scale_canvas_to_log(Vec2::new(rect.width(), rect.height()));
        Rect::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    /// Map every point of a logical path to canvas space.
    pub fn log_to_canvas_path(&self, path: &KeyPath) -> KeyPath {
        path.map_points(|p| self.log_to_canvas(p))
    }
}
