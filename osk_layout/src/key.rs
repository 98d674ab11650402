// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key outlines at the current theme key size.

use kurbo::{Rect, Vec2};
use osk_shape::{KeyPath, RectExt};

use crate::tree::Item;

/// Shrink a key rect to `key_size` percent of its size.
///
/// Both axes lose the same absolute amount, taken from the shorter side:
/// wide keys like space shrink as much horizontally as a square key of the
/// same height. `horizontal` forces the choice; by default a rect wider than
/// tall counts as horizontal.
pub fn apply_key_size(rect: Rect, key_size: f64, horizontal: Option<bool>) -> Rect {
    let scale = (1.0 - key_size / 100.0) * 0.5;
    let mut bx = rect.width() * scale;
    let mut by = rect.height() * scale;
    if horizontal.unwrap_or(rect.height() < rect.width()) {
        bx = by;
    } else {
        by = bx;
    }
    rect.deflate_by(bx, by)
}

impl Item<'_> {
    /// Logical key rect at `key_size` percent.
    ///
    /// Key classes that ignore the theme key size, and containers, return
    /// their [`rect`](Item::rect) unchanged.
    pub fn sized_rect(&self, key_size: f64) -> Rect {
        let rect = self.rect();
        match self.key() {
            Some(key) if key.class.honors_key_size() => apply_key_size(rect, key_size, None),
            _ => rect,
        }
    }

    /// The authored full-size outline, border included, in logical units.
    pub fn border_path(&self) -> Option<&KeyPath> {
        self.geometry().map(|g| g.full_size_path())
    }

    /// Logical outline of a key at `key_size` percent. `None` for containers.
    ///
    /// Keys without a geometry are the outline of their
    /// [`sized_rect`](Item::sized_rect).
    pub fn key_path(&self, key_size: f64) -> Option<KeyPath> {
        let key = self.key()?;
        Some(match &key.geometry {
            Some(geometry) => {
                let size = if key.class.honors_key_size() {
                    key_size / 100.0
                } else {
                    1.0
                };
                geometry.transformed_path(Vec2::ZERO, Vec2::new(size, size))
            }
            None => KeyPath::from_rect(self.sized_rect(key_size)),
        })
    }

    /// [`border_path`](Item::border_path) in canvas units.
    pub fn canvas_border_path(&self) -> Option<KeyPath> {
        self.border_path()
            .map(|p| self.transform().log_to_canvas_path(p))
    }

    /// [`key_path`](Item::key_path) in canvas units.
    pub fn canvas_key_path(&self, key_size: f64) -> Option<KeyPath> {
        self.key_path(key_size)
            .map(|p| self.transform().log_to_canvas_path(&p))
    }

    /// Canvas outline used for precise hit testing of shaped keys.
    pub fn hit_path(&self) -> Option<KeyPath> {
        self.canvas_border_path()
    }

    /// Maximum size of the rounded corners, in logical units. `None` for containers.
    ///
    /// Falls back to half the shorter side of the outline's bounds, or of
    /// the key rect for keys without a geometry.
    pub fn chamfer_size(&self) -> Option<f64> {
        let key = self.key()?;
        if let Some(size) = key.chamfer_size {
            return Some(size);
        }
        let rect = match &key.geometry {
            Some(g) => g.full_size_path().bounds(),
            None => self.rect(),
        };
        Some(rect.width().min(rect.height()) * 0.5)
    }
}
