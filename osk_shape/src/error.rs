// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::path::PathOp;

/// Errors raised while building key outlines.
///
/// These are construction-time errors: once a [`KeyGeometry`](crate::KeyGeometry)
/// exists, resizing it never fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// Two paths meant for interpolation have a different number of segments.
    SegmentCountMismatch {
        /// Segments in the full-size path.
        full: usize,
        /// Segments in the half-size path.
        half: usize,
    },
    /// Two paths meant for interpolation disagree on a segment's operation.
    OperationMismatch {
        /// Index of the first differing segment.
        segment: usize,
        /// Operation in the full-size path.
        full: PathOp,
        /// Operation in the half-size path.
        half: PathOp,
    },
    /// Two paths meant for interpolation disagree on a segment's point count.
    PointCountMismatch {
        /// Index of the first differing segment.
        segment: usize,
        /// Points in the full-size segment.
        full: usize,
        /// Points in the half-size segment.
        half: usize,
    },
    /// A move-to or line-to command arrived without coordinates.
    MissingCoordinates(PathOp),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentCountMismatch { full, half } => write!(
                f,
                "paths to interpolate differ in number of segments ({full} vs. {half})"
            ),
            Self::OperationMismatch {
                segment,
                full,
                half,
            } => write!(
                f,
                "paths to interpolate have different operations at segment {segment} ({full:?} vs. {half:?})"
            ),
            Self::PointCountMismatch {
                segment,
                full,
                half,
            } => write!(
                f,
                "paths to interpolate have different point counts at segment {segment} ({full} vs. {half})"
            ),
            Self::MissingCoordinates(op) => write!(f, "{op:?} command without coordinates"),
        }
    }
}

impl core::error::Error for ShapeError {}
