// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Osk Shape: Kurbo-native geometry primitives for on-screen keyboard layouts.
//!
//! - [`CoordinateTransform`]: axis-aligned map between a logical rectangle and a canvas rectangle.
//! - [`KeyPath`]: straight-edged key outline with cached bounds, fitting, interpolation,
//!   and an even-odd point-in-polygon test.
//! - [`KeyGeometry`]: a full-size outline plus an optional half-size outline, producing the
//!   key's silhouette at any size in between.
//! - [`RectExt`] and [`Axis`]: the small set of rectangle operations layout code needs.
//!
//! Logical coordinates are the layout's authoring units and never change with window size.
//! Canvas coordinates are pixels of the current render target.
//!
//! Degenerate rectangles are not errors. Mapping or fitting against a rectangle without
//! area collapses the affected axis instead of dividing by zero. The only fallible
//! operations are those that build outlines: appending a command without coordinates,
//! and pairing two paths that cannot be interpolated ([`ShapeError`]).
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use osk_shape::{CoordinateTransform, KeyGeometry, KeyPath, PathCommand};
//!
//! // A right triangle authored with relative coordinates: m 0,0 10,0 0,10 z
//! let mut full = KeyPath::new();
//! full.append_command(
//!     PathCommand::MoveToRelative,
//!     &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)],
//! )?;
//! full.append_command(PathCommand::ClosePath, &[])?;
//! assert_eq!(full.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
//!
//! // Shrink it to three quarters of its size.
//! let geometry = KeyGeometry::from_paths(full, None)?;
//! let smaller = geometry.transformed_path(Vec2::ZERO, Vec2::new(0.75, 0.75));
//! assert!(smaller.bounds().width() < 10.0);
//!
//! // Map it onto a 100x100 pixel canvas and hit test it.
//! let transform = CoordinateTransform::from_rects(
//!     Rect::new(0.0, 0.0, 10.0, 10.0),
//!     Rect::new(0.0, 0.0, 100.0, 100.0),
//! );
//! let on_canvas = transform.log_to_canvas_path(geometry.full_size_path());
//! assert!(on_canvas.contains(Point::new(80.0, 20.0)));
//! assert!(!on_canvas.contains(Point::new(20.0, 80.0)));
//! # Ok::<(), osk_shape::ShapeError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod geometry;
mod path;
mod rect;
mod transform;

pub use error::ShapeError;
pub use geometry::KeyGeometry;
pub use path::{KeyPath, PathCommand, PathOp, Polygons, Segment, is_point_in_polygon};
pub use rect::{Axis, RectExt};
pub use transform::CoordinateTransform;
