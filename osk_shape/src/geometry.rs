// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resizable key silhouettes.

use kurbo::{Rect, Vec2};

use crate::error::ShapeError;
use crate::path::KeyPath;
use crate::rect::RectExt;

/// Outline of a key at full size, optionally paired with an authored half-size outline.
///
/// Key size runs from `0.5` (half size) to `1.0` (full size). With a half-size
/// path, intermediate sizes interpolate point by point between the two. Without
/// one, the full path is fitted into a rectangle shrinking towards a synthetic
/// half-size rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyGeometry {
    full: KeyPath,
    half: Option<KeyPath>,
}

impl KeyGeometry {
    /// Build a geometry from a full-size path and an optional half-size path.
    ///
    /// The two paths must have the same number of segments, with the same
    /// operation and number of points in each, otherwise they cannot be interpolated.
    pub fn from_paths(full: KeyPath, half: Option<KeyPath>) -> Result<Self, ShapeError> {
        if let Some(half) = &half {
            if let Err(err) = full.check_compatible(half) {
                #[cfg(feature = "tracing")]
                tracing::warn!(%err, "rejecting key geometry");
                return Err(err);
            }
        }
        Ok(Self { full, half })
    }

    /// Rectangular geometry without a half-size path.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            full: KeyPath::from_rect(rect),
            half: None,
        }
    }

    /// The authored full-size outline.
    pub fn full_size_path(&self) -> &KeyPath {
        &self.full
    }

    /// The authored half-size outline, if any.
    pub fn half_size_path(&self) -> Option<&KeyPath> {
        self.half.as_ref()
    }

    /// Bounds at size `1.0`.
    pub fn full_size_bounds(&self) -> Rect {
        self.full.bounds()
    }

    /// Bounds at size `0.5`.
    ///
    /// Without an authored half-size path this is the full-size bounds deflated
    /// on every side by a quarter of the shorter dimension.
    pub fn half_size_bounds(&self) -> Rect {
        if let Some(half) = &self.half {
            return half.bounds();
        }
        let r = self.full.bounds();
        let d = r.width().min(r.height()) * 0.25;
        r.deflate_by(d, d)
    }

    /// Outline at `size` (per axis, `0.5..=1.0`), translated by `offset`.
    ///
    /// Everything is in logical coordinates.
    pub fn transformed_path(&self, offset: Vec2, size: Vec2) -> KeyPath {
        if let Some(half) = &self.half {
            let pos = Vec2::new((1.0 - size.x) * 2.0, (1.0 - size.y) * 2.0);
            return self.full.linint_unchecked(half, pos, offset);
        }
        let r0 = self.full_size_bounds();
        let r1 = self.half_size_bounds();
        let rect = r1.inflate_by(
            (size.x - 0.5) * (r0.width() - r1.width()),
            (size.y - 0.5) * (r0.height() - r1.height()),
        ) + offset;
        self.full.fit_in_rect(rect)
    }

    fn size_span(&self) -> Vec2 {
        let r0 = self.full_size_bounds();
        let r1 = self.half_size_bounds();
        Vec2::new(
            (r0.width() - r1.width()) * 2.0,
            (r0.height() - r1.height()) * 2.0,
        )
    }

    /// Convert logical distances into key-size fractions.
    ///
    /// An axis on which both sizes have the same extent converts to `0.0`.
    pub fn scale_log_to_size(&self, v: Vec2) -> Vec2 {
        let span = self.size_span();
        let div = |a: f64, b: f64| if b == 0.0 { 0.0 } else { a / b };
        Vec2::new(div(v.x, span.x), div(v.y, span.y))
    }

    /// Convert key-size fractions into logical distances.
    pub fn scale_size_to_log(&self, v: Vec2) -> Vec2 {
        let span = self.size_span();
        Vec2::new(v.x * span.x, v.y * span.y)
    }
}
