// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fit a small keyboard.
//!
//! Build two layers of letter rows plus a layerless control row, fit them into
//! two window sizes, switch layers, and print the resulting canvas rects.
//!
//! Run:
//! - `RUST_LOG=osk_layout=trace cargo run -p osk_demos --example fit_keyboard`

use kurbo::Rect;
use osk_layout::{
    BoxConfig, ItemConfig, ItemFlags, ItemId, ItemKind, KeyClass, KeyConfig, LayoutError,
    LayoutRoot, LayoutTree, PanelConfig,
};
use osk_shape::Axis;
use tracing_subscriber::EnvFilter;

fn key(name: &str, x: f64, y: f64, w: f64) -> ItemConfig {
    ItemConfig {
        id: Some(name.into()),
        group: Some(if name.len() == 1 { "letters" } else { "controls" }.into()),
        border_rect: Rect::new(x, y, x + w, y + 10.0),
        ..Default::default()
    }
}

fn row(tree: &mut LayoutTree, parent: ItemId, y: f64, names: &[&str]) -> Result<(), LayoutError> {
    let row = tree.insert(Some(parent), ItemConfig::default(), ItemKind::Box(BoxConfig::default()))?;
    for (i, name) in names.iter().enumerate() {
        let x = i as f64 * 11.0;
        tree.insert(Some(row), key(name, x, y, 10.0), ItemKind::Key(KeyConfig::default()))?;
    }
    Ok(())
}

fn build() -> Result<LayoutRoot, LayoutError> {
    let mut tree = LayoutTree::new();
    let vertical = ItemKind::Box(BoxConfig {
        axis: Axis::Vertical,
        ..Default::default()
    });
    let root = tree.insert(None, ItemConfig::default(), vertical.clone())?;
    let pages = tree.insert(Some(root), ItemConfig::default(), ItemKind::Panel(PanelConfig::default()))?;

    for (layer, rows) in [
        ("alpha", [["q", "w", "e", "r", "t"], ["a", "s", "d", "f", "g"]]),
        ("digits", [["1", "2", "3", "4", "5"], ["6", "7", "8", "9", "0"]]),
    ] {
        let config = ItemConfig {
            id: Some(layer.into()),
            layer_id: Some(layer.into()),
            ..Default::default()
        };
        let page = tree.insert(Some(pages), config, vertical.clone())?;
        for (r, names) in rows.iter().enumerate() {
            row(&mut tree, page, r as f64 * 11.0, names)?;
        }
    }

    // Control row: the space bar absorbs leftover width, the layer switch does not.
    let controls = tree.insert(Some(root), ItemConfig::default(), ItemKind::Box(BoxConfig::default()))?;
    let fixed = ItemConfig {
        flags: ItemFlags::default() - ItemFlags::EXPAND,
        ..key("switch", 0.0, 22.0, 10.0)
    };
    tree.insert(
        Some(controls),
        fixed,
        ItemKind::Key(KeyConfig {
            class: KeyClass::FullSize,
            ..Default::default()
        }),
    )?;
    tree.insert(Some(controls), key("space", 11.0, 22.0, 43.0), ItemKind::Key(KeyConfig::default()))?;

    LayoutRoot::new(tree, root)
}

fn print_keys(layout: &mut LayoutRoot) {
    for id in layout.visible_items().iter().copied() {
        let Some(item) = layout.item(id).filter(|i| i.is_key()) else {
            continue;
        };
        let r = item.canvas_border_rect();
        println!(
            "  {:>6}  x={:7.1} y={:6.1} w={:6.1} h={:5.1}  chamfer={:?}",
            item.name().unwrap_or("?"),
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            item.chamfer_size(),
        );
    }
}

fn main() -> Result<(), LayoutError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut layout = build()?;
    println!("{}", layout.tree().dump(layout.root()));
    println!("layers: {:?}", layout.layer_ids());

    layout.set_visible_layers(&["alpha"]);
    for canvas in [Rect::new(0.0, 0.0, 600.0, 200.0), Rect::new(0.0, 0.0, 1200.0, 300.0)] {
        layout.fit_inside_canvas(canvas);
        println!("alpha in {}x{}:", canvas.width(), canvas.height());
        print_keys(&mut layout);
    }

    layout.set_visible_layers(&["digits"]);
    layout.fit_inside_canvas(Rect::new(0.0, 0.0, 600.0, 200.0));
    println!("digits in 600x200:");
    print_keys(&mut layout);

    for group in layout.key_groups().iter() {
        println!("group {:?}: {} keys", group.name, group.keys.len());
    }
    Ok(())
}
