// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit test keys.
//!
//! Build a row with an L-shaped return key overlapping a plain key, fit it,
//! and probe a few canvas points. Points in the return key's notch fall
//! through to the key below it.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p osk_demos --example hit_test_keys`

use std::error::Error;

use kurbo::{Point, Rect};
use osk_layout::{ItemConfig, ItemKind, KeyConfig, LayoutRoot, LayoutTree, PanelConfig};
use osk_shape::{KeyGeometry, KeyPath, PathCommand};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = LayoutTree::new();
    let root = tree.insert(None, ItemConfig::default(), ItemKind::Panel(PanelConfig::default()))?;
    let named = |name: &str, rect: Rect| ItemConfig {
        id: Some(name.into()),
        border_rect: rect,
        ..Default::default()
    };
    tree.insert(
        Some(root),
        named("quote", Rect::new(0.0, 10.0, 10.0, 20.0)),
        ItemKind::Key(KeyConfig::default()),
    )?;

    // The return key outline as a layout file would author it: "m 0,0 20,0 0,20 -10,0 0,-10 -10,0 z".
    let mut outline = KeyPath::new();
    let steps = [
        (0.0, 0.0),
        (20.0, 0.0),
        (0.0, 20.0),
        (-10.0, 0.0),
        (0.0, -10.0),
        (-10.0, 0.0),
    ];
    let points: Vec<Point> = steps.iter().map(|&(x, y)| Point::new(x, y)).collect();
    outline.append_command(PathCommand::MoveToRelative, &points)?;
    outline.append_command(PathCommand::ClosePath, &[])?;
    let geometry = KeyGeometry::from_paths(outline, None)?;
    tree.insert(
        Some(root),
        named("return", geometry.full_size_bounds()),
        ItemKind::Key(KeyConfig {
            geometry: Some(geometry),
            ..Default::default()
        }),
    )?;

    let mut layout = LayoutRoot::new(tree, root)?;
    layout.fit_inside_canvas(Rect::new(0.0, 0.0, 200.0, 200.0));

    for p in [
        Point::new(150.0, 50.0),
        Point::new(150.0, 150.0),
        Point::new(50.0, 150.0),
        Point::new(50.0, 150.0),
        Point::new(250.0, 50.0),
    ] {
        let hit = layout
            .key_at(p, None)
            .and_then(|id| layout.item(id))
            .and_then(|item| item.name());
        println!("{p:?} -> {hit:?}");
    }

    if let Some(id) = layout.keys(None).last().copied() {
        if let Some(path) = layout.item(id).and_then(|i| i.canvas_key_path(90.0)) {
            println!("return key at 90%: {:?}", path.to_bez_path());
        }
    }
    Ok(())
}
