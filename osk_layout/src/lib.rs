// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Osk Layout: the layout tree of an on-screen keyboard.
//!
//! A layout is a tree of boxes, panels, and keys authored in logical units.
//! Fitting it into a canvas rectangle gives every item a
//! [`CoordinateTransform`](osk_shape::CoordinateTransform) from its logical
//! rect to its canvas rect, which renderers and input handling then query.
//!
//! - Boxes line their children up along one axis. Each child is scaled to fill
//!   the box, and space of children without a visible key goes to the
//!   expanding siblings.
//! - Panels keep their children's relative logical positions, scaled as a whole.
//! - Keys are leaves. They may carry a [`KeyGeometry`](osk_shape::KeyGeometry)
//!   outline and follow the theme's key size.
//!
//! Items can belong to a layer, such as a letters page or a number pad. Showing one
//! layer hides the containers of all others.
//!
//! ## API overview
//!
//! - [`LayoutTree`]: arena of items, with insertion, fitting, traversals, and the
//!   per-item view [`Item`].
//! - [`ItemConfig`], [`BoxConfig`], [`PanelConfig`], [`KeyConfig`]: explicit item settings,
//!   validated on [`LayoutTree::insert`].
//! - [`ItemId`]: generational handle of an item.
//! - [`LayoutRoot`]: owns a tree and its root, caches traversals as shared
//!   snapshots, and finds the key under a canvas point with [`LayoutRoot::key_at`].
//!
//! Fitting runs in two passes. [`LayoutTree::update_log_rect`] recomputes the
//! logical bounds of every container from its children, bottom-up. Then
//! [`LayoutTree::do_fit_inside_canvas`] hands canvas rects down from the root.
//! [`LayoutTree::fit_inside_canvas`] does both.
//!
//! ### Minimal usage
//!
//! ```
//! use kurbo::{Point, Rect};
//! use osk_layout::{BoxConfig, ItemConfig, ItemKind, KeyConfig, LayoutRoot, LayoutTree};
//!
//! let mut tree = LayoutTree::new();
//! let row = tree.insert(None, ItemConfig::default(), ItemKind::Box(BoxConfig::default()))?;
//! let mut keys = Vec::new();
//! for (i, name) in ["q", "w", "e"].into_iter().enumerate() {
//!     let x = i as f64 * 11.0;
//!     let config = ItemConfig {
//!         id: Some(name.into()),
//!         border_rect: Rect::new(x, 0.0, x + 10.0, 10.0),
//!         ..Default::default()
//!     };
//!     keys.push(tree.insert(Some(row), config, ItemKind::Key(KeyConfig::default()))?);
//! }
//!
//! let mut layout = LayoutRoot::new(tree, row)?;
//! layout.fit_inside_canvas(Rect::new(0.0, 0.0, 320.0, 100.0));
//! assert_eq!(layout.key_at(Point::new(300.0, 50.0), None), Some(keys[2]));
//!
//! // Hidden keys give their space to the others.
//! layout.set_item_visible(keys[1], false);
//! layout.fit_inside_canvas(Rect::new(0.0, 0.0, 320.0, 100.0));
//! let q = layout.item(keys[0]).unwrap().canvas_border_rect();
//! assert!(q.width() > 150.0);
//! # Ok::<(), osk_layout::LayoutError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod fit;
mod key;
mod root;
mod traverse;
mod tree;
mod types;

pub use error::LayoutError;
pub use key::apply_key_size;
pub use root::LayoutRoot;
pub use traverse::Items;
pub use tree::{Ancestors, Item, LayoutTree};
pub use types::{
    BoxConfig, ItemConfig, ItemFlags, ItemId, ItemKind, KeyClass, KeyConfig, KeyGroup, PanelConfig,
};
