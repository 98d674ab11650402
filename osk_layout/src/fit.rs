// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two-phase fit pass: logical bounds bottom-up, canvas rects top-down.

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};
use osk_shape::{Axis, CoordinateTransform, RectExt};

use crate::tree::LayoutTree;
use crate::types::{BoxConfig, ItemId, ItemKind};

/// One child of a box as seen by the distribution pass.
struct Slot {
    id: ItemId,
    border_rect: Rect,
    expand: bool,
    has_visible_key: bool,
}

impl LayoutTree {
    /// Recompute logical bounds, then place the subtree at `root` inside `canvas_border_rect`.
    ///
    /// The bottom-up pass completes before any canvas rect is assigned.
    pub fn fit_inside_canvas(&mut self, root: ItemId, canvas_border_rect: Rect) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "fit_inside_canvas",
            width = canvas_border_rect.width(),
            height = canvas_border_rect.height()
        )
        .entered();
        self.update_log_rect(root);
        self.do_fit_inside_canvas(root, canvas_border_rect);
    }

    /// Recompute the logical border rect of every container below `root`, children first.
    ///
    /// Keys keep the rects they were given.
    pub fn update_log_rect(&mut self, root: ItemId) {
        for id in self.depth_first(root) {
            let is_container = self
                .data(id)
                .is_some_and(|d| !d.kind.is_key());
            if is_container {
                let bounds = self.calc_bounds(id);
                self.set_border_rect(id, bounds);
            }
        }
    }

    /// Union of the children's non-empty border rects.
    ///
    /// Compact containers ignore hidden children. A panel whose children are
    /// all hidden, and any container without children, is empty.
    pub(crate) fn calc_bounds(&self, id: ItemId) -> Rect {
        let Some(data) = self.data(id) else {
            return Rect::ZERO;
        };
        let compact = match &data.kind {
            ItemKind::Box(b) => b.compact,
            ItemKind::Panel(p) => {
                let all_hidden = data.children.iter().all(|c| {
                    self.item(*c).is_none_or(|i| !i.is_visible())
                });
                if all_hidden {
                    return Rect::ZERO;
                }
                p.compact
            }
            ItemKind::Key(_) => return data.transform.log_rect(),
        };
        data.children
            .iter()
            .filter_map(|c| self.item(*c))
            .filter(|c| !compact || c.is_visible())
            .map(|c| c.border_rect())
            .filter(|r| !r.is_degenerate())
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }

    /// Place the subtree at `id` inside `canvas_border_rect` using the current logical rects.
    pub fn do_fit_inside_canvas(&mut self, id: ItemId, canvas_border_rect: Rect) {
        let Some(data) = self.data_mut(id) else {
            return;
        };
        data.transform.set_canvas_rect(canvas_border_rect);
        match data.kind {
            ItemKind::Box(config) => self.fit_box(id, config),
            ItemKind::Panel(_) => self.fit_panel(id),
            ItemKind::Key(_) => {}
        }
    }

    /// Distribute the box's canvas extent among its children along its axis.
    ///
    /// A first scale fits all children, hidden ones included, into the box.
    /// Children without a visible key then collapse to zero length, and a
    /// second scale stretches the expanding children over the freed space.
    fn fit_box(&mut self, id: ItemId, config: BoxConfig) {
        let Some(item) = self.item(id) else {
            return;
        };
        let BoxConfig { axis, spacing, .. } = config;
        let canvas_rect = item.canvas_rect();
        let canvas_extent = canvas_rect.extent(axis);
        let slots: Vec<Slot> = item
            .children()
            .iter()
            .filter_map(|c| self.item(*c))
            .map(|c| Slot {
                id: c.id(),
                border_rect: c.border_rect(),
                expand: c.expands(),
                has_visible_key: self.has_visible_key(c.id()),
            })
            .collect();

        // Logical length of all children, hidden ones included.
        let mut length = 0.0;
        for (i, slot) in slots.iter().enumerate() {
            if !slot.border_rect.is_degenerate() {
                if i > 0 {
                    length += spacing;
                }
                length += slot.border_rect.extent(axis);
            }
        }
        let fully_visible_scale = if length != 0.0 {
            canvas_extent / length
        } else {
            1.0
        };
        let canvas_spacing = fully_visible_scale * spacing;

        let mut length_expandables = 0.0;
        let mut num_expandables = 0_usize;
        let mut length_nonexpandables = 0.0;
        let mut num_nonexpandables = 0_usize;
        for slot in &slots {
            let len = slot.border_rect.extent(axis);
            if len != 0.0 && slot.has_visible_key {
                if slot.expand {
                    length_expandables += len * fully_visible_scale;
                    num_expandables += 1;
                } else {
                    length_nonexpandables += len * fully_visible_scale;
                    num_nonexpandables += 1;
                }
            }
        }
        let gaps = (num_expandables + num_nonexpandables) as f64 - 1.0;
        let length_target = canvas_extent - length_nonexpandables - canvas_spacing * gaps;
        let expandable_scale = if length_expandables != 0.0 {
            length_target / length_expandables
        } else {
            1.0
        };

        let origin = canvas_rect.start(axis);
        let mut position = 0.0;
        for slot in slots {
            let (len, gap) = if slot.has_visible_key {
                (slot.border_rect.extent(axis), canvas_spacing)
            } else {
                (0.0, 0.0)
            };
            let scale = if slot.expand {
                fully_visible_scale * expandable_scale
            } else {
                fully_visible_scale
            };
            let canvas_length = len * scale;
            let r = canvas_rect.with_span(axis, origin + position, canvas_length);
            self.do_fit_inside_canvas(slot.id, r);
            position += canvas_length + gap;
        }
    }

    /// Map each child's logical rect from the panel's border rect onto the panel's canvas rect.
    fn fit_panel(&mut self, id: ItemId) {
        let Some(item) = self.item(id) else {
            return;
        };
        let border_rect = item.border_rect();
        let children = item.children().to_vec();
        if border_rect.is_degenerate() {
            // Nothing visible to place; children are cleared, not fitted.
            for child in children {
                if let Some(d) = self.data_mut(child) {
                    d.transform.set_canvas_rect(Rect::ZERO);
                }
            }
            return;
        }
        let panel = CoordinateTransform::from_rects(border_rect, item.canvas_rect());
        for child in children {
            let Some(log_rect) = self.item(child).map(|c| c.border_rect()) else {
                continue;
            };
            self.do_fit_inside_canvas(child, panel.log_to_canvas_rect(log_rect));
        }
    }

    /// Logical size of the subtree at `id`.
    ///
    /// For a box, the children's extents are summed along its axis, starting
    /// from the first child's size; other items report their border rect size.
    pub fn log_extents(&self, id: ItemId) -> Vec2 {
        let Some(item) = self.item(id) else {
            return Vec2::ZERO;
        };
        let own = item.border_rect().size().to_vec2();
        let ItemKind::Box(config) = item.kind() else {
            return own;
        };
        let mut rects = item
            .children()
            .iter()
            .filter_map(|c| self.item(*c))
            .map(|c| c.border_rect());
        let Some(first) = rects.next() else {
            return own;
        };
        let mut size = first.size().to_vec2();
        for r in rects {
            match config.axis {
                Axis::Horizontal => size.x += r.width(),
                Axis::Vertical => size.y += r.height(),
            }
        }
        size
    }

    /// Width over height of [`LayoutTree::log_extents`], or `0.0` without height.
    pub fn log_aspect_ratio(&self, id: ItemId) -> f64 {
        let size = self.log_extents(id);
        if size.y != 0.0 { size.x / size.y } else { 0.0 }
    }

    /// [`LayoutTree::log_extents`] scaled to canvas units.
    pub fn canvas_extents(&self, id: ItemId) -> Vec2 {
        let extents = self.log_extents(id);
        self.item(id)
            .map(|i| i.transform().scale_log_to_canvas(extents))
            .unwrap_or(Vec2::ZERO)
    }
}
