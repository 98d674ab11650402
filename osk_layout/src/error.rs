// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use osk_shape::ShapeError;

use crate::types::ItemId;

/// Errors raised while assembling a layout tree.
///
/// Fitting, traversal, and hit testing never fail; everything that can go
/// wrong is rejected when an item is inserted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutError {
    /// A parent or owner handle is stale or belongs to a cleared tree.
    UnknownItem(ItemId),
    /// A border is negative or not finite.
    InvalidBorder(f64),
    /// A box spacing is negative or not finite.
    InvalidSpacing(f64),
    /// A border rect has a non-finite coordinate.
    InvalidBorderRect,
    /// A key outline could not be built.
    Shape(ShapeError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "unknown layout item {id:?}"),
            Self::InvalidBorder(border) => write!(f, "invalid border {border}"),
            Self::InvalidSpacing(spacing) => write!(f, "invalid spacing {spacing}"),
            Self::InvalidBorderRect => f.write_str("border rect is not finite"),
            Self::Shape(err) => write!(f, "invalid key geometry: {err}"),
        }
    }
}

impl core::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Shape(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShapeError> for LayoutError {
    fn from(err: ShapeError) -> Self {
        Self::Shape(err)
    }
}
