// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Progressive (spatially varying) effect descriptors and band partitioning.
//!
//! A [`LinearGradient`] maps every point of a node to an intensity in
//! `0.0..=1.0` by projecting it onto the `start → end` axis, easing the
//! normalized position, and interpolating between the two anchor
//! intensities. Outside the segment the intensity is clamped to the nearer
//! anchor.
//!
//! Compositing does not evaluate the gradient per pixel. Instead
//! [`LinearGradient::bands_into`] splits the node's bounds into a fixed
//! number of bands perpendicular to the axis, each with the intensity sampled
//! at its midpoint:
//!
//! ```text
//!   start ──────────── axis ────────────► end
//!   ┌──────┬──────┬──────┬──────┬──────┐
//!   │ 0.02 │ 0.13 │ 0.32 │ 0.55 │ 0.84 │   (EaseIn, 0 → 1, 5 bands)
//!   └──────┴──────┴──────┴──────┴──────┘
//! ```
//!
//! Bands tile the bounds exactly: no gaps, no overlaps. Axis-aligned gradients
//! produce rectangles; diagonal gradients produce convex polygons.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Point, Rect, Size, Vec2};

/// A monotonic curve mapping `0.0..=1.0` onto `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    /// Identity.
    Linear,
    /// `cubic-bezier(0.42, 0, 1, 1)`.
    #[default]
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// `cubic-bezier(0.4, 0, 0.2, 1)`.
    FastOutSlowIn,
    /// A custom cubic bezier through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`.
    CubicBezier {
        /// First control point x, expected in `0.0..=1.0`.
        x1: f32,
        /// First control point y.
        y1: f32,
        /// Second control point x, expected in `0.0..=1.0`.
        x2: f32,
        /// Second control point y.
        y2: f32,
    },
}

impl Easing {
    /// Evaluates the curve at `x`, which is clamped to `0.0..=1.0` first.
    #[must_use]
    pub fn transform(self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        let (x1, y1, x2, y2) = match self {
            Self::Linear => return x,
            Self::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Self::FastOutSlowIn => (0.4, 0.0, 0.2, 1.0),
            Self::CubicBezier { x1, y1, x2, y2 } => (x1, y1, x2, y2),
        };
        if x <= 0.0 || x >= 1.0 {
            return x;
        }
        let t = solve_bezier_t(x, x1, x2);
        bezier(t, y1, y2)
    }
}

fn bezier(t: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn bezier_slope(t: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Finds `t` with `bezier(t, x1, x2) == x`.
///
/// Newton iteration first, bisection when the slope flattens out.
fn solve_bezier_t(x: f32, x1: f32, x2: f32) -> f32 {
    const EPSILON: f32 = 1e-6;
    let mut t = x;
    for _ in 0..8 {
        let err = bezier(t, x1, x2) - x;
        if err.abs() < EPSILON {
            return t;
        }
        let slope = bezier_slope(t, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        t -= err / slope;
    }
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    t = x;
    for _ in 0..32 {
        let v = bezier(t, x1, x2);
        if (v - x).abs() < EPSILON {
            break;
        }
        if v < x {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }
    t
}

/// Parameters of a progressive effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progressive {
    /// Intensity varies linearly along an axis.
    LinearGradient(LinearGradient),
}

impl Progressive {
    /// A top-to-bottom gradient between `start_y` and `end_y`.
    ///
    /// Pass `f64::INFINITY` for `end_y` to end at the bottom of the node.
    #[must_use]
    pub fn vertical_gradient(
        easing: Easing,
        start_y: f64,
        start_intensity: f32,
        end_y: f64,
        end_intensity: f32,
    ) -> Self {
        Self::LinearGradient(LinearGradient {
            easing,
            start: Point::new(0.0, start_y),
            start_intensity,
            end: Point::new(0.0, end_y),
            end_intensity,
        })
    }

    /// A left-to-right gradient between `start_x` and `end_x`.
    ///
    /// Pass `f64::INFINITY` for `end_x` to end at the right edge of the node.
    #[must_use]
    pub fn horizontal_gradient(
        easing: Easing,
        start_x: f64,
        start_intensity: f32,
        end_x: f64,
        end_intensity: f32,
    ) -> Self {
        Self::LinearGradient(LinearGradient {
            easing,
            start: Point::new(start_x, 0.0),
            start_intensity,
            end: Point::new(end_x, 0.0),
            end_intensity,
        })
    }
}

impl From<LinearGradient> for Progressive {
    fn from(gradient: LinearGradient) -> Self {
        Self::LinearGradient(gradient)
    }
}

/// A linear intensity gradient in node coordinates.
///
/// Infinite coordinates resolve against the node bounds: positive infinity is
/// the right or bottom edge, negative infinity the left or top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    /// Curve applied to the normalized axis position.
    pub easing: Easing,
    /// Where `start_intensity` applies.
    pub start: Point,
    /// Intensity at and before `start`.
    pub start_intensity: f32,
    /// Where `end_intensity` applies.
    pub end: Point,
    /// Intensity at and after `end`.
    pub end_intensity: f32,
}

impl Default for LinearGradient {
    /// Top-left to bottom-right, `EaseIn`, from no effect to full effect.
    fn default() -> Self {
        Self {
            easing: Easing::EaseIn,
            start: Point::ZERO,
            start_intensity: 0.0,
            end: Point::new(f64::INFINITY, f64::INFINITY),
            end_intensity: 1.0,
        }
    }
}

impl LinearGradient {
    /// Returns the gradient with a different easing curve.
    #[must_use]
    pub fn with_easing(self, easing: Easing) -> Self {
        Self { easing, ..self }
    }

    /// Returns the gradient with different anchor points.
    #[must_use]
    pub fn with_points(self, start: Point, end: Point) -> Self {
        Self { start, end, ..self }
    }

    /// Returns the gradient with different anchor intensities.
    #[must_use]
    pub fn with_intensities(self, start_intensity: f32, end_intensity: f32) -> Self {
        Self {
            start_intensity,
            end_intensity,
            ..self
        }
    }

    /// Anchor points with infinities replaced by the edges of `size`.
    #[must_use]
    pub fn resolve_points(&self, size: Size) -> (Point, Point) {
        let resolve = |v: f64, extent: f64| {
            if v == f64::INFINITY {
                extent
            } else if v == f64::NEG_INFINITY {
                0.0
            } else {
                v
            }
        };
        let point = |p: Point| Point::new(resolve(p.x, size.width), resolve(p.y, size.height));
        (point(self.start), point(self.end))
    }

    /// Intensity at normalized axis position `t` (0 at start, 1 at end).
    #[must_use]
    pub fn intensity_at_t(&self, t: f64) -> f32 {
        let intensity = if t <= 0.0 {
            self.start_intensity
        } else if t >= 1.0 {
            self.end_intensity
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "axis position only needs f32 precision"
            )]
            let eased = self.easing.transform(t as f32);
            self.start_intensity + (self.end_intensity - self.start_intensity) * eased
        };
        intensity.clamp(0.0, 1.0)
    }

    /// Intensity at `p` for a node of the given size.
    ///
    /// A zero-length axis yields `end_intensity` everywhere.
    #[must_use]
    pub fn intensity_at(&self, p: Point, size: Size) -> f32 {
        let (start, end) = self.resolve_points(size);
        let axis = end - start;
        let len2 = axis.hypot2();
        if !is_usable_axis(len2) {
            return self.end_intensity.clamp(0.0, 1.0);
        }
        self.intensity_at_t((p - start).dot(axis) / len2)
    }

    /// Partitions a node of the given size into `count` bands, written into
    /// `out` (which is cleared first).
    ///
    /// `count` is clamped to at least 1. Bands are ordered from `start`
    /// towards `end`.
    pub fn bands_into(&self, size: Size, count: usize, out: &mut Vec<Band>) {
        out.clear();
        let bounds = Rect::from_origin_size(Point::ZERO, size);
        let (start, end) = self.resolve_points(size);
        let axis = end - start;
        let len2 = axis.hypot2();
        if !is_usable_axis(len2) {
            out.push(Band {
                shape: BandShape::Rect(bounds),
                intensity: self.end_intensity.clamp(0.0, 1.0),
            });
            return;
        }

        let count = count.max(1);
        let t_of = |p: Point| (p - start).dot(axis) / len2;
        let corners = [
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1, bounds.y0),
            Point::new(bounds.x1, bounds.y1),
            Point::new(bounds.x0, bounds.y1),
        ];
        let (t_min, t_max) = corners
            .iter()
            .map(|&c| t_of(c))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
                (lo.min(t), hi.max(t))
            });
        let step = (t_max - t_min) / count as f64;
        let boundary = |k: usize| {
            if k == count {
                t_max
            } else {
                t_min + step * k as f64
            }
        };

        for k in 0..count {
            let (t0, t1) = (boundary(k), boundary(k + 1));
            let intensity = self.intensity_at_t(0.5 * (t0 + t1));
            let shape = if axis.x == 0.0 {
                let edge = |k: usize, t: f64| match k {
                    0 if axis.y > 0.0 => bounds.y0,
                    0 => bounds.y1,
                    k if k == count && axis.y > 0.0 => bounds.y1,
                    k if k == count => bounds.y0,
                    _ => start.y + t * axis.y,
                };
                let (a, b) = (edge(k, t0), edge(k + 1, t1));
                BandShape::Rect(Rect::new(bounds.x0, a.min(b), bounds.x1, a.max(b)))
            } else if axis.y == 0.0 {
                let edge = |k: usize, t: f64| match k {
                    0 if axis.x > 0.0 => bounds.x0,
                    0 => bounds.x1,
                    k if k == count && axis.x > 0.0 => bounds.x1,
                    k if k == count => bounds.x0,
                    _ => start.x + t * axis.x,
                };
                let (a, b) = (edge(k, t0), edge(k + 1, t1));
                BandShape::Rect(Rect::new(a.min(b), bounds.y0, a.max(b), bounds.y1))
            } else {
                let lower = (k > 0).then_some(t0);
                let upper = (k + 1 < count).then_some(t1);
                match BandPolygon::clip(&corners, lower, upper, &t_of) {
                    Some(polygon) => BandShape::Polygon(polygon),
                    None => continue,
                }
            };
            out.push(Band { shape, intensity });
        }
    }
}

fn is_usable_axis(len2: f64) -> bool {
    len2.is_finite() && len2 > 1e-12
}

/// One band of a partitioned progressive effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Region covered, in node coordinates.
    pub shape: BandShape,
    /// Effect intensity for the whole band, `0.0..=1.0`.
    pub intensity: f32,
}

/// Region covered by a [`Band`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BandShape {
    /// Axis-aligned rectangle (vertical or horizontal gradients).
    Rect(Rect),
    /// Convex polygon (diagonal gradients).
    Polygon(BandPolygon),
}

impl BandShape {
    /// Area covered.
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Self::Rect(rect) => rect.area(),
            Self::Polygon(polygon) => polygon.area(),
        }
    }

    /// Smallest rectangle containing the band.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Rect(rect) => *rect,
            Self::Polygon(polygon) => polygon.bounding_box(),
        }
    }
}

/// A convex polygon of at most eight points.
///
/// Clipping a rectangle by two parallel half-planes never yields more than
/// six.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandPolygon {
    points: [Point; 8],
    len: u8,
}

impl BandPolygon {
    /// Polygon vertices in order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points[..usize::from(self.len)]
    }

    /// Area (shoelace formula).
    #[must_use]
    pub fn area(&self) -> f64 {
        let pts = self.points();
        let mut twice = 0.0;
        for (i, p) in pts.iter().enumerate() {
            let q = pts[(i + 1) % pts.len()];
            twice += p.x * q.y - q.x * p.y;
        }
        (twice * 0.5).abs()
    }

    /// Smallest rectangle containing the polygon.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        let pts = self.points();
        let first = Rect::from_points(pts[0], pts[0]);
        pts.iter().fold(first, |r, &p| r.union_pt(p))
    }

    /// Appends the polygon, moved by `offset`, as a closed subpath.
    pub fn append_to(&self, path: &mut BezPath, offset: Vec2) {
        for (i, &p) in self.points().iter().enumerate() {
            if i == 0 {
                path.move_to(p + offset);
            } else {
                path.line_to(p + offset);
            }
        }
        path.close_path();
    }

    /// Clips `poly` to `lower <= t(p) <= upper`; absent bounds are open.
    ///
    /// Returns `None` if fewer than three points remain.
    fn clip(
        poly: &[Point; 4],
        lower: Option<f64>,
        upper: Option<f64>,
        t_of: &impl Fn(Point) -> f64,
    ) -> Option<Self> {
        let mut a = Self {
            points: [Point::ZERO; 8],
            len: 4,
        };
        a.points[..4].copy_from_slice(poly);
        if let Some(lo) = lower {
            a = a.clip_half_plane(|p| t_of(p) - lo);
        }
        if let Some(hi) = upper {
            a = a.clip_half_plane(|p| hi - t_of(p));
        }
        (a.len >= 3).then_some(a)
    }

    /// Sutherland–Hodgman step keeping points where `side(p) >= 0`.
    fn clip_half_plane(&self, side: impl Fn(Point) -> f64) -> Self {
        let mut out = Self {
            points: [Point::ZERO; 8],
            len: 0,
        };
        let mut push = |p: Point| {
            if usize::from(out.len) < out.points.len() {
                out.points[usize::from(out.len)] = p;
                out.len += 1;
            }
        };
        let pts = self.points();
        for (i, &cur) in pts.iter().enumerate() {
            let prev = pts[(i + pts.len() - 1) % pts.len()];
            let (dc, dp) = (side(cur), side(prev));
            if dc >= 0.0 {
                if dp < 0.0 {
                    push(prev.lerp(cur, dp / (dp - dc)));
                }
                push(cur);
            } else if dp >= 0.0 {
                push(prev.lerp(cur, dp / (dp - dc)));
            }
        }
        out
    }
}
