// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brushes used for masks and masked scrims.
//!
//! A brush is sampled per point. When used as a mask only its alpha matters:
//! the effect is kept where the brush is opaque and dropped where it is
//! transparent.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::color::Color;

/// A color stop in a [`Brush::LinearGradient`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient axis in `0.0..=1.0`.
    pub offset: f32,
    /// Color at this stop.
    pub color: Color,
}

impl ColorStop {
    /// Creates a color stop.
    #[inline]
    #[must_use]
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// A paint source sampled in the coordinate space of the node it is set on.
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    /// A single color everywhere.
    Solid(Color),
    /// A linear gradient between two points.
    ///
    /// Points before `start` take the first stop's color and points past `end`
    /// take the last. Stops are expected in ascending offset order.
    LinearGradient {
        /// Where offset `0.0` lies.
        start: Point,
        /// Where offset `1.0` lies.
        end: Point,
        /// Color stops.
        stops: Vec<ColorStop>,
    },
}

impl Brush {
    /// Creates a linear gradient brush.
    #[must_use]
    pub fn linear_gradient(start: Point, end: Point, stops: impl Into<Vec<ColorStop>>) -> Self {
        Self::LinearGradient {
            start,
            end,
            stops: stops.into(),
        }
    }

    /// Creates a top-to-bottom gradient from `top` at `y = 0` to `bottom` at
    /// `y = height`.
    #[must_use]
    pub fn vertical_fade(top: Color, bottom: Color, height: f64) -> Self {
        Self::linear_gradient(
            Point::ZERO,
            Point::new(0.0, height),
            [ColorStop::new(0.0, top), ColorStop::new(1.0, bottom)],
        )
    }

    /// Samples the brush at `p`.
    #[must_use]
    pub fn color_at(&self, p: Point) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::LinearGradient { start, end, stops } => {
                let axis = *end - *start;
                let len2 = axis.hypot2();
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "gradient positions only need f32 precision"
                )]
                let t = if len2 > 0.0 {
                    ((p - *start).dot(axis) / len2) as f32
                } else {
                    1.0
                };
                sample_stops(stops, t)
            }
        }
    }

    /// Samples only the alpha of the brush at `p`.
    #[inline]
    #[must_use]
    pub fn alpha_at(&self, p: Point) -> f32 {
        self.color_at(p).a
    }

    /// Returns the brush with its geometry moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        match self {
            Self::Solid(color) => Self::Solid(*color),
            Self::LinearGradient { start, end, stops } => Self::LinearGradient {
                start: *start + offset,
                end: *end + offset,
                stops: stops.clone(),
            },
        }
    }
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let u = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return lerp_color(a.color, b.color, u);
        }
    }
    last.color
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}
