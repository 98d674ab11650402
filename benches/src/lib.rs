// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic keyboards and pointer positions shared by the benchmarks.

use kurbo::{Point, Rect};
use osk_layout::{BoxConfig, ItemConfig, ItemId, ItemKind, KeyConfig, LayoutTree, PanelConfig};
use osk_shape::{Axis, KeyGeometry, KeyPath};

/// Build a keyboard of `layers` layer panels, each `rows` rows of `cols` keys,
/// plus a layerless row of function keys at the bottom.
///
/// Every fourth key is shaped (an L outline) so hit tests exercise the path test.
pub fn keyboard(layers: usize, rows: usize, cols: usize) -> (LayoutTree, ItemId) {
    let mut tree = LayoutTree::new();
    let root = tree
        .insert(
            None,
            ItemConfig::default(),
            ItemKind::Box(BoxConfig {
                axis: Axis::Vertical,
                ..Default::default()
            }),
        )
        .unwrap();
    let pages = tree
        .insert(Some(root), ItemConfig::default(), ItemKind::Panel(PanelConfig::default()))
        .unwrap();
    for layer in 0..layers {
        let page = tree
            .insert(
                Some(pages),
                ItemConfig {
                    layer_id: Some(format!("layer{layer}")),
                    ..Default::default()
                },
                ItemKind::Box(BoxConfig {
                    axis: Axis::Vertical,
                    ..Default::default()
                }),
            )
            .unwrap();
        for r in 0..rows {
            add_row(&mut tree, page, r as f64 * 11.0, cols);
        }
    }
    add_row(&mut tree, root, rows as f64 * 11.0, cols / 2 + 1);
    (tree, root)
}

fn add_row(tree: &mut LayoutTree, parent: ItemId, y: f64, cols: usize) {
    let row = tree
        .insert(Some(parent), ItemConfig::default(), ItemKind::Box(BoxConfig::default()))
        .unwrap();
    for c in 0..cols {
        let x = c as f64 * 11.0;
        let border_rect = Rect::new(x, y, x + 10.0, y + 10.0);
        let geometry = (c % 4 == 3).then(|| {
            let outline = KeyPath::from_polygon(&[
                Point::new(x, y),
                Point::new(x + 10.0, y),
                Point::new(x + 10.0, y + 10.0),
                Point::new(x + 5.0, y + 10.0),
                Point::new(x + 5.0, y + 5.0),
                Point::new(x, y + 5.0),
            ]);
            KeyGeometry::from_paths(outline, None).unwrap()
        });
        tree.insert(
            Some(row),
            ItemConfig {
                border_rect,
                ..Default::default()
            },
            ItemKind::Key(KeyConfig {
                geometry,
                ..Default::default()
            }),
        )
        .unwrap();
    }
}

/// Tiny xorshift generator, so pointer positions repeat across runs.
#[derive(Clone, Debug)]
pub struct Rng(u64);

impl Rng {
    /// Start from a non-zero `seed`.
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next uniform value in `0.0..1.0`.
    pub fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// `count` pointer positions spread over a `w` by `h` canvas.
pub fn pointer_positions(count: usize, w: f64, h: f64) -> Vec<Point> {
    let mut rng = Rng::new(0x05C0_FFEE_1234_5678);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * w, rng.next_f64() * h))
        .collect()
}
