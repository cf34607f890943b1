// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lengths, placement, and the derived layer geometry of an effect node.
//!
//! An effect node renders its backdrop through a layer that is larger than
//! the node itself: the content box is inflated by the blur radius on every
//! side so the blur kernel samples real backdrop pixels at the content edges.
//!
//! ```text
//!   ┌──────────── layer_size ────────────┐
//!   │            blur_radius_px          │
//!   │    ┌──── content_size ───────┐     │
//!   │    │                         │     │
//!   │    └─────────────────────────┘     │
//!   └────────────────────────────────────┘
//!        ▲ content_offset = (layer - content) / 2
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};

/// A density-independent length.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Dp(pub f64);

impl Dp {
    /// Zero length.
    pub const ZERO: Self = Self(0.0);

    /// Converts to device pixels at the given display density.
    #[inline]
    #[must_use]
    pub fn to_px(self, density: f64) -> f64 {
        self.0 * density
    }
}

/// A layout placement reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Top-left of the node in window coordinates.
    pub position_in_window: Point,
    /// Correction from window coordinates to screen coordinates, for hosts
    /// whose windows are not placed at the screen origin.
    pub window_offset: Vec2,
    /// Size of the node's layout box.
    pub size: Size,
}

impl Placement {
    /// Creates a placement with no window offset.
    #[inline]
    #[must_use]
    pub const fn new(position_in_window: Point, size: Size) -> Self {
        Self {
            position_in_window,
            window_offset: Vec2::ZERO,
            size,
        }
    }

    /// Returns the placement with a window offset correction.
    #[inline]
    #[must_use]
    pub const fn with_window_offset(self, window_offset: Vec2) -> Self {
        Self {
            window_offset,
            ..self
        }
    }

    /// Position of the node relative to a source region whose top-left is
    /// at `source_on_screen`.
    #[inline]
    #[must_use]
    pub fn position_in_content(&self, source_on_screen: Point) -> Point {
        self.position_in_window + self.window_offset - source_on_screen.to_vec2()
    }
}

/// Geometry derived from the latest placement and the resolved blur radius.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    /// Node position in source-region coordinates.
    pub position_in_content: Point,
    /// The node's own layout size, `None` until first placement.
    pub content_size: Option<Size>,
    /// `content_size` inflated by the blur radius on every side.
    pub layer_size: Option<Size>,
    /// Resolved blur radius in pixels.
    pub blur_radius_px: f64,
}

impl Geometry {
    /// Inflates `content` by `blur_radius_px` on every side.
    #[inline]
    #[must_use]
    pub fn inflate(content: Size, blur_radius_px: f64) -> Size {
        let pad = 2.0 * blur_radius_px.max(0.0);
        Size::new(content.width + pad, content.height + pad)
    }

    /// Top-left of the real content within the inflated layer.
    ///
    /// Zero until both sizes are known.
    #[must_use]
    pub fn content_offset(&self) -> Vec2 {
        match (self.content_size, self.layer_size) {
            (Some(content), Some(layer)) => Vec2::new(
                (layer.width - content.width) / 2.0,
                (layer.height - content.height) / 2.0,
            ),
            _ => Vec2::ZERO,
        }
    }

    /// The node's own bounds in node coordinates.
    #[must_use]
    pub fn content_rect(&self) -> Option<Rect> {
        self.content_size
            .map(|size| Rect::from_origin_size(Point::ZERO, size))
    }

    /// Whether compositing can be attempted.
    ///
    /// Both sizes must be known, finite, and non-empty.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let usable = |s: Option<Size>| {
            s.is_some_and(|s| s.is_finite() && s.width > 0.0 && s.height > 0.0)
        };
        usable(self.content_size) && usable(self.layer_size)
    }
}

/// An integer pixel size used to allocate offscreen layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Creates a pixel size.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rounds a fractional size to the nearest whole pixels.
    #[must_use]
    pub fn round(size: Size) -> Self {
        Self::new(round_dim(size.width), round_dim(size.height))
    }

    /// Returns the size as a kurbo [`Size`].
    #[inline]
    #[must_use]
    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Number of pixels covered.
    #[inline]
    #[must_use]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "clamped to the u32 range before casting"
)]
fn round_dim(v: f64) -> u32 {
    if v.is_finite() {
        v.round().clamp(0.0, f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_in_content_subtracts_source_origin() {
        let placement = Placement::new(Point::new(70.0, 90.0), Size::new(10.0, 10.0))
            .with_window_offset(Vec2::new(5.0, 0.0));
        let pos = placement.position_in_content(Point::new(20.0, 40.0));
        assert_eq!(pos, Point::new(55.0, 50.0));
    }

    #[test]
    fn layer_inflates_by_twice_the_radius() {
        for radius in [0.0, 0.5, 10.0, 33.25] {
            let layer = Geometry::inflate(Size::new(100.0, 40.0), radius);
            assert_eq!(layer.width, 100.0 + 2.0 * radius);
            assert_eq!(layer.height, 40.0 + 2.0 * radius);
        }
    }

    #[test]
    fn content_offset_is_half_the_inflation() {
        let geometry = Geometry {
            content_size: Some(Size::new(100.0, 100.0)),
            layer_size: Some(Size::new(120.0, 120.0)),
            ..Geometry::default()
        };
        assert_eq!(geometry.content_offset(), Vec2::new(10.0, 10.0));
        assert_eq!(Geometry::default().content_offset(), Vec2::ZERO);
    }

    #[test]
    fn validity_requires_both_sizes() {
        let mut geometry = Geometry::default();
        assert!(!geometry.is_valid());
        geometry.content_size = Some(Size::new(10.0, 10.0));
        assert!(!geometry.is_valid());
        geometry.layer_size = Some(Size::new(10.0, 10.0));
        assert!(geometry.is_valid());
        geometry.content_size = Some(Size::new(0.0, 10.0));
        assert!(!geometry.is_valid());
    }

    #[test]
    fn pixel_size_rounds() {
        assert_eq!(PixelSize::round(Size::new(119.6, 0.4)), PixelSize::new(120, 0));
        assert_eq!(PixelSize::round(Size::new(-3.0, f64::NAN)), PixelSize::new(0, 0));
    }
}
