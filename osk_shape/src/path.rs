// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight-edged key outlines.
//!
//! A [`KeyPath`] stores its segments with absolute coordinates. Relative
//! commands are resolved when they are appended, so every later operation
//! (bounds, fitting, interpolation, hit testing) can treat points uniformly.

use alloc::vec::Vec;
use core::cell::OnceCell;

use kurbo::{BezPath, Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::error::ShapeError;
use crate::rect::{RectExt, ratio};

/// Operation of a single path segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathOp {
    /// Start a new sub-path at a single point.
    MoveTo,
    /// Straight lines through one or more points.
    LineTo,
    /// Close the current sub-path.
    ClosePath,
}

/// A path segment: an operation and its absolute points.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    op: PathOp,
    points: SmallVec<[Point; 4]>,
}

impl Segment {
    /// The segment's operation.
    pub fn op(&self) -> PathOp {
        self.op
    }

    /// The segment's points, in absolute coordinates. Empty for [`PathOp::ClosePath`].
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// A command from an authored outline, before relative coordinates are resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathCommand {
    /// `M`: move to absolute coordinates.
    MoveTo,
    /// `m`: move relative to the current position.
    MoveToRelative,
    /// `L`: line to absolute coordinates.
    LineTo,
    /// `l`: line relative to the current position.
    LineToRelative,
    /// `Z` or `z`.
    ClosePath,
}

impl PathCommand {
    /// Map an SVG path command letter to a command.
    ///
    /// Only the straight-line subset is understood; curves and arcs return `None`.
    pub fn from_svg_letter(letter: char) -> Option<Self> {
        Some(match letter {
            'M' => Self::MoveTo,
            'm' => Self::MoveToRelative,
            'L' => Self::LineTo,
            'l' => Self::LineToRelative,
            'Z' | 'z' => Self::ClosePath,
            _ => return None,
        })
    }

    /// The segment operation this command produces.
    pub fn op(self) -> PathOp {
        match self {
            Self::MoveTo | Self::MoveToRelative => PathOp::MoveTo,
            Self::LineTo | Self::LineToRelative => PathOp::LineTo,
            Self::ClosePath => PathOp::ClosePath,
        }
    }

    /// True for the lowercase, relative variants.
    pub fn is_relative(self) -> bool {
        matches!(self, Self::MoveToRelative | Self::LineToRelative)
    }
}

/// Outline of a non-rectangular key, in a layout's logical coordinates.
///
/// Every transforming operation returns a new path; a path's cached bounds
/// therefore stay valid for as long as the path exists.
#[derive(Clone, Debug, Default)]
pub struct KeyPath {
    segments: Vec<Segment>,
    last_abs_pos: Point,
    bounds: OnceCell<Rect>,
}

impl PartialEq for KeyPath {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl KeyPath {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed rectangular outline: top-left, top-right, bottom-right, bottom-left.
    pub fn from_rect(rect: Rect) -> Self {
        let mut path = Self::new();
        path.push(PathOp::MoveTo, [Point::new(rect.x0, rect.y0)].into_iter().collect());
        path.push(
            PathOp::LineTo,
            [
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
                Point::new(rect.x0, rect.y1),
            ]
            .into_iter()
            .collect(),
        );
        path.push(PathOp::ClosePath, SmallVec::new());
        path.last_abs_pos = Point::new(rect.x0, rect.y1);
        path
    }

    /// Closed polygon through `vertices`. An empty slice gives an empty path.
    pub fn from_polygon(vertices: &[Point]) -> Self {
        let mut path = Self::new();
        let Some((&first, rest)) = vertices.split_first() else {
            return path;
        };
        path.push(PathOp::MoveTo, [first].into_iter().collect());
        if !rest.is_empty() {
            path.push(PathOp::LineTo, rest.iter().copied().collect());
        }
        path.push(PathOp::ClosePath, SmallVec::new());
        path.last_abs_pos = rest.last().copied().unwrap_or(first);
        path
    }

    fn push(&mut self, op: PathOp, points: SmallVec<[Point; 4]>) {
        self.segments.push(Segment { op, points });
        self.bounds = OnceCell::new();
    }

    /// The path's segments, with absolute coordinates.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append an authored command, resolving relative coordinates.
    ///
    /// Relative points are offsets from the previous point, starting at the
    /// last absolute position of the path. The very first point of an empty
    /// path is taken as absolute. A move-to carrying several points is stored
    /// as a move-to followed by a line-to through the remaining points.
    ///
    /// Move-to and line-to commands need at least one point.
    pub fn append_command(
        &mut self,
        command: PathCommand,
        coords: &[Point],
    ) -> Result<(), ShapeError> {
        let op = command.op();
        if op == PathOp::ClosePath {
            self.push(op, SmallVec::new());
            return Ok(());
        }

        let mut points: SmallVec<[Point; 4]> = coords.iter().copied().collect();
        if points.is_empty() {
            return Err(ShapeError::MissingCoordinates(op));
        }

        if command.is_relative() {
            let (mut pos, start) = if self.segments.is_empty() {
                (points[0], 1)
            } else {
                (self.last_abs_pos, 0)
            };
            for p in &mut points[start..] {
                pos += p.to_vec2();
                *p = pos;
            }
        }

        if let Some(&last) = points.last() {
            self.last_abs_pos = last;
        }

        if op == PathOp::MoveTo && points.len() > 1 {
            let rest: SmallVec<[Point; 4]> = points.drain(1..).collect();
            self.push(PathOp::MoveTo, points);
            self.push(PathOp::LineTo, rest);
        } else {
            self.push(op, points);
        }
        Ok(())
    }

    /// Axis-aligned bounds of every point, or [`Rect::ZERO`] for a path without points.
    ///
    /// Computed on first use and cached.
    pub fn bounds(&self) -> Rect {
        *self.bounds.get_or_init(|| {
            let mut points = self.points();
            let Some(first) = points.next() else {
                return Rect::ZERO;
            };
            points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p))
        })
    }

    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments.iter().flat_map(|s| s.points.iter().copied())
    }

    /// New path with every point passed through `f`.
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|s| Segment {
                    op: s.op,
                    points: s.points.iter().map(|&p| f(p)).collect(),
                })
                .collect(),
            last_abs_pos: f(self.last_abs_pos),
            bounds: OnceCell::new(),
        }
    }

    /// New path grown by `dx` and `dy` on every side of its bounds.
    pub fn inflate(&self, dx: f64, dy: f64) -> Self {
        self.fit_in_rect(self.bounds().inflate_by(dx, dy))
    }

    /// New path scaled and translated so that `rect` becomes its bounds.
    ///
    /// An axis on which the current bounds have no extent scales by zero.
    pub fn fit_in_rect(&self, rect: Rect) -> Self {
        let b = self.bounds();
        let sx = ratio(rect.width(), b.width());
        let sy = ratio(rect.height(), b.height());
        self.map_points(|p| {
            Point::new(rect.x0 + (p.x - b.x0) * sx, rect.y0 + (p.y - b.y0) * sy)
        })
    }

    /// Check that `other` has the same segment count, operations and point counts as `self`.
    pub fn check_compatible(&self, other: &Self) -> Result<(), ShapeError> {
        if self.segments.len() != other.segments.len() {
            return Err(ShapeError::SegmentCountMismatch {
                full: self.segments.len(),
                half: other.segments.len(),
            });
        }
        for (segment, (a, b)) in self.segments.iter().zip(&other.segments).enumerate() {
            if a.op != b.op {
                return Err(ShapeError::OperationMismatch {
                    segment,
                    full: a.op,
                    half: b.op,
                });
            }
            if a.points.len() != b.points.len() {
                return Err(ShapeError::PointCountMismatch {
                    segment,
                    full: a.points.len(),
                    half: b.points.len(),
                });
            }
        }
        Ok(())
    }

    /// Interpolate towards `other` and translate the result by `offset`.
    ///
    /// Each coordinate becomes `c + pos * (c_other - c) + offset`, per axis:
    /// `pos = 0` reproduces `self`, `pos = 1` reproduces `other`.
    pub fn linint(&self, other: &Self, pos: Vec2, offset: Vec2) -> Result<Self, ShapeError> {
        self.check_compatible(other)?;
        Ok(self.linint_unchecked(other, pos, offset))
    }

    /// [`KeyPath::linint`] for paths already known to be compatible.
    pub(crate) fn linint_unchecked(&self, other: &Self, pos: Vec2, offset: Vec2) -> Self {
        let segments = self
            .segments
            .iter()
            .zip(&other.segments)
            .map(|(a, b)| Segment {
                op: a.op,
                points: a
                    .points
                    .iter()
                    .zip(&b.points)
                    .map(|(&p, &q)| {
                        Point::new(
                            p.x + pos.x * (q.x - p.x) + offset.x,
                            p.y + pos.y * (q.y - p.y) + offset.y,
                        )
                    })
                    .collect(),
            })
            .collect();
        Self {
            segments,
            last_abs_pos: self.last_abs_pos + offset,
            bounds: OnceCell::new(),
        }
    }

    /// Iterate the closed polygons of the path.
    pub fn polygons(&self) -> Polygons<'_> {
        Polygons {
            segments: self.segments.iter(),
            current: Vec::new(),
        }
    }

    /// True if `point` lies inside any closed polygon of the path.
    ///
    /// Uses the even-odd rule with the boundary convention of
    /// [`is_point_in_polygon`].
    pub fn contains(&self, point: Point) -> bool {
        self.polygons().any(|poly| is_point_in_polygon(&poly, point))
    }

    /// Convert to a [`BezPath`] for rendering.
    pub fn to_bez_path(&self) -> BezPath {
        let mut bez = BezPath::new();
        for segment in &self.segments {
            match segment.op {
                PathOp::MoveTo => {
                    let mut points = segment.points.iter().copied();
                    if let Some(p) = points.next() {
                        bez.move_to(p);
                    }
                    for p in points {
                        bez.line_to(p);
                    }
                }
                PathOp::LineTo => {
                    for &p in &segment.points {
                        bez.line_to(p);
                    }
                }
                PathOp::ClosePath => bez.close_path(),
            }
        }
        bez
    }
}

/// Iterator over the closed polygons of a [`KeyPath`].
///
/// A move-to starts a new vertex list, line-tos extend it, and each close
/// yields the vertices accumulated so far.
#[derive(Clone, Debug)]
pub struct Polygons<'a> {
    segments: core::slice::Iter<'a, Segment>,
    current: Vec<Point>,
}

impl Iterator for Polygons<'_> {
    type Item = Vec<Point>;

    fn next(&mut self) -> Option<Self::Item> {
        for segment in self.segments.by_ref() {
            match segment.op {
                PathOp::MoveTo => {
                    self.current.clear();
                    self.current.extend_from_slice(&segment.points);
                }
                PathOp::LineTo => self.current.extend_from_slice(&segment.points),
                PathOp::ClosePath => return Some(self.current.clone()),
            }
        }
        None
    }
}

/// Even-odd crossing test of `point` against a polygon.
///
/// Edges are half-open in y: a point on an edge at the polygon's minimum y
/// is inside, one at its maximum y is outside. Likewise in x, the left edge
/// is inside and the right edge is outside. This matches the half-open
/// rectangle test used for hit rects, so adjacent keys never both claim a
/// shared edge.
pub fn is_point_in_polygon(vertices: &[Point], point: Point) -> bool {
    let Some(&last) = vertices.last() else {
        return false;
    };
    let (x, y) = (point.x, point.y);
    let mut inside = false;
    let mut prev = last;
    for &v in vertices {
        let straddles = (v.y <= y && y < prev.y) || (prev.y <= y && y < v.y);
        if straddles && x < (prev.x - v.x) * (y - v.y) / (prev.y - v.y) + v.x {
            inside = !inside;
        }
        prev = v;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::PathEl;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn point_in_unit_square() {
        let sq = square();
        assert!(is_point_in_polygon(&sq, Point::new(5.0, 5.0)), "center is inside");
        assert!(!is_point_in_polygon(&sq, Point::new(15.0, 5.0)), "right of square");
        assert!(is_point_in_polygon(&sq, Point::new(5.0, 0.0)), "top edge is inside");
        assert!(!is_point_in_polygon(&sq, Point::new(5.0, 10.0)), "bottom edge is outside");
        assert!(is_point_in_polygon(&sq, Point::new(0.0, 5.0)), "left edge is inside");
        assert!(!is_point_in_polygon(&sq, Point::new(10.0, 5.0)), "right edge is outside");
        assert!(!is_point_in_polygon(&[], Point::new(0.0, 0.0)), "no vertices");
    }

    #[test]
    fn concave_polygon() {
        // An L shape: the notch at the top right is outside.
        let l = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(is_point_in_polygon(&l, Point::new(2.0, 2.0)), "upper arm");
        assert!(is_point_in_polygon(&l, Point::new(8.0, 8.0)), "lower arm");
        assert!(!is_point_in_polygon(&l, Point::new(8.0, 2.0)), "notch");
    }

    #[test]
    fn from_rect_layout() {
        let p = KeyPath::from_rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        let ops: Vec<_> = p.segments().iter().map(Segment::op).collect();
        assert_eq!(ops, [PathOp::MoveTo, PathOp::LineTo, PathOp::ClosePath]);
        assert_eq!(p.segments()[0].points(), &[Point::new(1.0, 2.0)]);
        assert_eq!(
            p.segments()[1].points(),
            &[Point::new(3.0, 2.0), Point::new(3.0, 4.0), Point::new(1.0, 4.0)]
        );
        assert_eq!(p.bounds(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn relative_commands_resolve_to_absolute() {
        // m 100,200 10,-10 z
        let mut p = KeyPath::new();
        p.append_command(
            PathCommand::MoveToRelative,
            &[Point::new(100.0, 200.0), Point::new(10.0, -10.0)],
        )
        .unwrap();
        p.append_command(PathCommand::ClosePath, &[]).unwrap();
        assert_eq!(p.segments().len(), 3, "move-to with extra points splits");
        assert_eq!(p.segments()[0].points(), &[Point::new(100.0, 200.0)]);
        assert_eq!(p.segments()[1].op(), PathOp::LineTo);
        assert_eq!(p.segments()[1].points(), &[Point::new(110.0, 190.0)]);
        assert_eq!(p.bounds(), Rect::new(100.0, 190.0, 110.0, 200.0));
    }

    #[test]
    fn relative_continues_from_last_position() {
        let mut p = KeyPath::new();
        p.append_command(PathCommand::MoveTo, &[Point::new(10.0, 10.0)])
            .unwrap();
        p.append_command(
            PathCommand::LineToRelative,
            &[Point::new(5.0, 0.0), Point::new(0.0, 5.0)],
        )
        .unwrap();
        p.append_command(PathCommand::LineTo, &[Point::new(0.0, 0.0)])
            .unwrap();
        p.append_command(PathCommand::LineToRelative, &[Point::new(1.0, 1.0)])
            .unwrap();
        assert_eq!(
            p.segments()[1].points(),
            &[Point::new(15.0, 10.0), Point::new(15.0, 15.0)]
        );
        assert_eq!(p.segments()[3].points(), &[Point::new(1.0, 1.0)]);
    }

    #[test]
    fn missing_coordinates_rejected() {
        let mut p = KeyPath::new();
        assert_eq!(
            p.append_command(PathCommand::LineTo, &[]),
            Err(ShapeError::MissingCoordinates(PathOp::LineTo))
        );
        assert!(p.is_empty(), "rejected command leaves the path untouched");
    }

    #[test]
    fn svg_letters() {
        assert_eq!(PathCommand::from_svg_letter('m'), Some(PathCommand::MoveToRelative));
        assert_eq!(PathCommand::from_svg_letter('z'), Some(PathCommand::ClosePath));
        assert_eq!(PathCommand::from_svg_letter('C'), None);
        assert!(PathCommand::LineToRelative.is_relative());
        assert_eq!(PathCommand::MoveToRelative.op(), PathOp::MoveTo);
    }

    #[test]
    fn empty_path_has_zero_bounds() {
        assert_eq!(KeyPath::new().bounds(), Rect::ZERO);
        assert!(!KeyPath::new().contains(Point::ZERO));
    }

    #[test]
    fn fit_and_inflate() {
        let p = KeyPath::from_polygon(&square());
        let fitted = p.fit_in_rect(Rect::new(100.0, 100.0, 120.0, 105.0));
        assert_eq!(fitted.bounds(), Rect::new(100.0, 100.0, 120.0, 105.0));
        let grown = p.inflate(1.0, 2.0).bounds();
        let expected = Rect::new(-1.0, -2.0, 11.0, 12.0);
        assert!(
            (grown.x0 - expected.x0).abs() < 1e-9
                && (grown.y0 - expected.y0).abs() < 1e-9
                && (grown.x1 - expected.x1).abs() < 1e-9
                && (grown.y1 - expected.y1).abs() < 1e-9,
            "got {grown:?}"
        );
        // The source path keeps its own bounds.
        assert_eq!(p.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn fit_degenerate_bounds_collapses() {
        let line = KeyPath::from_polygon(&[Point::new(0.0, 5.0), Point::new(10.0, 5.0)]);
        let fitted = line.fit_in_rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        for s in fitted.segments() {
            for p in s.points() {
                assert!(p.y == 0.0 && p.x.is_finite(), "collapsed onto top edge: {p:?}");
            }
        }
    }

    #[test]
    fn linint_endpoints_and_midpoint() {
        let a = KeyPath::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = KeyPath::from_rect(Rect::new(2.0, 2.0, 8.0, 8.0));
        assert_eq!(a.linint(&b, Vec2::ZERO, Vec2::ZERO).unwrap(), a);
        assert_eq!(a.linint(&b, Vec2::new(1.0, 1.0), Vec2::ZERO).unwrap(), b);
        let mid = a.linint(&b, Vec2::new(0.5, 0.5), Vec2::new(100.0, 0.0)).unwrap();
        assert_eq!(mid.bounds(), Rect::new(101.0, 1.0, 109.0, 9.0));
    }

    #[test]
    fn linint_rejects_incompatible_paths() {
        let a = KeyPath::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut b = KeyPath::new();
        b.append_command(PathCommand::MoveTo, &[Point::ZERO]).unwrap();
        assert_eq!(
            a.linint(&b, Vec2::ZERO, Vec2::ZERO),
            Err(ShapeError::SegmentCountMismatch { full: 3, half: 1 })
        );
        let mut c = KeyPath::new();
        c.append_command(PathCommand::MoveTo, &[Point::ZERO]).unwrap();
        c.append_command(PathCommand::LineTo, &[Point::new(1.0, 1.0)])
            .unwrap();
        c.append_command(PathCommand::LineTo, &[Point::new(1.0, 0.0)])
            .unwrap();
        assert_eq!(
            a.check_compatible(&c),
            Err(ShapeError::OperationMismatch {
                segment: 2,
                full: PathOp::ClosePath,
                half: PathOp::LineTo,
            })
        );
    }

    #[test]
    fn check_compatible_compares_point_counts() {
        let quad = KeyPath::from_polygon(&[
            Point::ZERO,
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let triangle =
            KeyPath::from_polygon(&[Point::ZERO, Point::new(8.0, 2.0), Point::new(5.0, 8.0)]);
        assert_eq!(
            quad.check_compatible(&triangle),
            Err(ShapeError::PointCountMismatch {
                segment: 1,
                full: 3,
                half: 2,
            })
        );
        assert!(quad.linint(&triangle, Vec2::new(0.5, 0.5), Vec2::ZERO).is_err());
    }

    #[test]
    fn polygons_and_contains() {
        let mut p = KeyPath::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let second = KeyPath::from_rect(Rect::new(20.0, 0.0, 30.0, 10.0));
        p.segments.extend(second.segments.iter().cloned());
        assert_eq!(p.polygons().count(), 2);
        assert!(p.contains(Point::new(25.0, 5.0)), "inside second polygon");
        assert!(!p.contains(Point::new(15.0, 5.0)), "between polygons");
    }

    #[test]
    fn unclosed_polygon_is_ignored() {
        let mut p = KeyPath::new();
        p.append_command(
            PathCommand::MoveTo,
            &[Point::ZERO, Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
        )
        .unwrap();
        assert_eq!(p.polygons().count(), 0);
        assert!(!p.contains(Point::new(8.0, 2.0)), "open paths have no inside");
    }

    #[test]
    fn bez_path_elements() {
        let bez = KeyPath::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)).to_bez_path();
        let els = bez.elements();
        assert_eq!(els.len(), 5);
        assert_eq!(els[0], PathEl::MoveTo(Point::ZERO));
        assert_eq!(els[4], PathEl::ClosePath);
    }
}
