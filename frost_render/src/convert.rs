// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between frost types and the `vello_cpu` rendering stack.
//!
//! `vello_cpu` re-exports its own `kurbo` and `peniko`; geometry is rebuilt
//! through those so the two crates never have to agree on a `kurbo` version.

use std::sync::Arc;

use frost_core::color::{BlendMode, Color};
use kurbo::{BezPath, PathEl, Rect, Vec2};
use vello_cpu::peniko::color::PremulRgba8;
use vello_cpu::peniko::{self, Compose, Mix};
use vello_cpu::{Image, ImageSource, Pixmap, kurbo as vk};

pub(crate) fn color(color: Color) -> peniko::Color {
    peniko::Color::new([color.r, color.g, color.b, color.a])
}

pub(crate) fn blend_mode(mode: BlendMode) -> peniko::BlendMode {
    let mix = match mode {
        BlendMode::SourceOver => Mix::Normal,
        BlendMode::Multiply => Mix::Multiply,
        BlendMode::Screen => Mix::Screen,
        BlendMode::Overlay => Mix::Overlay,
        BlendMode::Darken => Mix::Darken,
        BlendMode::Lighten => Mix::Lighten,
        BlendMode::ColorDodge => Mix::ColorDodge,
        BlendMode::ColorBurn => Mix::ColorBurn,
        BlendMode::HardLight => Mix::HardLight,
        BlendMode::SoftLight => Mix::SoftLight,
        BlendMode::Difference => Mix::Difference,
        BlendMode::Exclusion => Mix::Exclusion,
    };
    peniko::BlendMode::new(mix, Compose::SrcOver)
}

pub(crate) fn rect(rect: Rect) -> vk::Rect {
    vk::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1)
}

pub(crate) fn translate(offset: Vec2) -> vk::Affine {
    vk::Affine::translate((offset.x, offset.y))
}

pub(crate) fn path(path: &BezPath) -> vk::BezPath {
    let point = |p: kurbo::Point| vk::Point::new(p.x, p.y);
    let mut out = vk::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(point(p)),
            PathEl::LineTo(p) => out.line_to(point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point(p1), point(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(point(p1), point(p2), point(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// An image paint sampling `pixmap` with its top-left at the origin.
pub(crate) fn image(pixmap: Pixmap) -> Image {
    Image {
        image: ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: peniko::ImageSampler::default(),
    }
}

/// A premultiplied pixel as `0.0..=1.0` channels.
#[inline]
pub(crate) fn unit(pixel: PremulRgba8) -> [f32; 4] {
    [pixel.r, pixel.g, pixel.b, pixel.a].map(|c| f32::from(c) / 255.0)
}

/// Quantizes premultiplied `0.0..=1.0` channels.
#[inline]
pub(crate) fn premul8(pixel: [f32; 4]) -> PremulRgba8 {
    let [r, g, b, a] = pixel.map(channel8);
    PremulRgba8 { r, g, b, a }
}

#[inline]
pub(crate) fn channel8(value: f32) -> u8 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "clamped into 0..=255 first"
    )]
    let byte = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    byte
}

/// Clamps a pixel dimension into what `vello_cpu` can address.
#[inline]
pub(crate) fn dimension(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use kurbo::{Circle, Shape};
    use vello_cpu::kurbo::Shape as _;

    use super::*;

    #[test]
    fn quantization_rounds_and_clamps() {
        assert_eq!(channel8(0.5), 128);
        assert_eq!(channel8(1.7), 255);
        assert_eq!(channel8(-0.2), 0);
        let pixel = premul8([0.25, 0.5, 0.75, 1.0]);
        assert_eq!((pixel.r, pixel.g, pixel.b, pixel.a), (64, 128, 191, 255));
    }

    #[test]
    fn paths_keep_every_element() {
        let circle = Circle::new((3.0, 4.0), 2.0).to_path(0.1);
        let converted = path(&circle);
        assert_eq!(converted.elements().len(), circle.elements().len());
        assert_eq!(
            (converted.bounding_box().x0, converted.bounding_box().y1),
            (circle.bounding_box().x0, circle.bounding_box().y1)
        );
    }

    #[test]
    fn oversized_dimensions_saturate() {
        assert_eq!(dimension(300), 300);
        assert_eq!(dimension(70_000), u16::MAX);
    }
}
