// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software implementations of [`RenderEffect`] stages.
//!
//! Stages run over `vello_cpu` pixmaps. Blur, noise and masking work on the
//! pixel data directly; tints are composited by `vello_cpu` itself.

use core::mem;

use frost_core::brush::Brush;
use frost_core::color::{BlendMode, Color};
use frost_core::effect::{EffectStage, RenderEffect};
use kurbo::{Point, Vec2};
use vello_cpu::{Pixmap, RenderContext};

use crate::convert;

/// Converts a blur radius in pixels to a gaussian standard deviation.
///
/// Uses the `0.57735 * r + 0.5` mapping common to platform blur filters;
/// radii at or below zero map to zero.
#[must_use]
pub fn radius_to_sigma(radius_px: f64) -> f32 {
    if radius_px <= 0.0 {
        return 0.0;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "blur radii only need f32 precision"
    )]
    let sigma = (0.577_35 * radius_px + 0.5) as f32;
    sigma
}

/// 1D gaussian weights for separable convolution, normalized to sum to 1.
///
/// The kernel has `2 * ceil(3σ) + 1` taps; a non-positive `sigma` yields
/// the identity kernel.
#[must_use]
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "kernel radius is small and positive"
    )]
    let radius = (3.0 * sigma).ceil() as usize;
    let denominator = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / denominator).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Blurs `pixmap` in place, clamping samples at the edges.
///
/// The convolution runs on `f32` channels and is quantized once at the end.
pub fn gaussian_blur(pixmap: &mut Pixmap, radius_px: f64) {
    let sigma = radius_to_sigma(radius_px);
    if sigma <= 0.0 || pixmap.data().is_empty() {
        return;
    }
    let kernel = gaussian_kernel(sigma);
    let width = usize::from(pixmap.width());
    let height = usize::from(pixmap.height());
    let mut pixels: Vec<[f32; 4]> = pixmap.data().iter().map(|&p| convert::unit(p)).collect();
    let mut scratch = vec![[0.0_f32; 4]; pixels.len()];
    convolve(&pixels, &mut scratch, width, height, &kernel, Axis::X);
    convolve(&scratch, &mut pixels, width, height, &kernel, Axis::Y);
    for (dst, src) in pixmap.data_mut().iter_mut().zip(pixels) {
        *dst = convert::premul8(src);
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn convolve(
    src: &[[f32; 4]],
    dst: &mut [[f32; 4]],
    width: usize,
    height: usize,
    kernel: &[f32],
    axis: Axis,
) {
    let radius = isize::try_from(kernel.len() / 2).unwrap_or(0);
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0_f32; 4];
            for (tap, &weight) in (-radius..).zip(kernel) {
                let (sx, sy) = match axis {
                    Axis::X => (x.saturating_add_signed(tap).min(width - 1), y),
                    Axis::Y => (x, y.saturating_add_signed(tap).min(height - 1)),
                };
                for (a, s) in acc.iter_mut().zip(src[sy * width + sx]) {
                    *a += s * weight;
                }
            }
            dst[y * width + x] = acc;
        }
    }
}

/// Overlays `color` on every pixel with `blend_mode`.
pub fn tint(pixmap: &mut Pixmap, color: Color, blend_mode: BlendMode) {
    let (width, height) = (pixmap.width(), pixmap.height());
    if width == 0 || height == 0 {
        return;
    }
    let bounds = vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
    let input = mem::replace(pixmap, Pixmap::new(width, height));
    let mut ctx = RenderContext::new(width, height);
    ctx.set_paint(convert::image(input));
    ctx.fill_rect(&bounds);
    ctx.set_blend_mode(convert::blend_mode(blend_mode));
    ctx.set_paint(convert::color(color));
    ctx.fill_rect(&bounds);
    ctx.flush();
    ctx.render_to_pixmap(pixmap);
}

/// Darkens each pixel by up to `factor` using a fixed per-pixel hash.
///
/// The pattern depends only on pixel coordinates, so repeated frames are
/// stable.
pub fn noise(pixmap: &mut Pixmap, factor: f32) {
    let factor = factor.clamp(0.0, 1.0);
    if factor <= 0.0 {
        return;
    }
    let width = usize::from(pixmap.width());
    for (i, pixel) in pixmap.data_mut().iter_mut().enumerate() {
        let grain = hash_unit(i % width, i / width);
        let [r, g, b, a] = convert::unit(*pixel);
        let keep = 1.0 - factor * grain;
        *pixel = convert::premul8([r * keep, g * keep, b * keep, a]);
    }
}

/// Multiplies each pixel by the alpha of `brush`.
///
/// `offset` is the brush origin within the pixmap.
pub fn mask(pixmap: &mut Pixmap, brush: &Brush, offset: Vec2) {
    let width = usize::from(pixmap.width());
    for (i, pixel) in pixmap.data_mut().iter_mut().enumerate() {
        let center = pixel_center(i % width, i / width) - offset;
        let coverage = brush.alpha_at(center).clamp(0.0, 1.0);
        *pixel = convert::premul8(convert::unit(*pixel).map(|c| c * coverage));
    }
}

/// Runs every stage of `effect` over `pixmap`, in order.
pub fn apply_effect(pixmap: &mut Pixmap, effect: &RenderEffect) {
    for stage in effect.stages() {
        match stage {
            EffectStage::Blur { radius_px } => gaussian_blur(pixmap, *radius_px),
            EffectStage::Tint { color, blend_mode } => tint(pixmap, *color, *blend_mode),
            EffectStage::Noise { factor } => noise(pixmap, *factor),
            EffectStage::Mask { brush, offset, .. } => mask(pixmap, brush, *offset),
        }
    }
}

/// Center of pixel `(x, y)`.
#[inline]
pub(crate) fn pixel_center(x: usize, y: usize) -> Point {
    Point::new(x as f64 + 0.5, y as f64 + 0.5)
}

/// A hash of `(x, y)` mapped to `0.0..1.0`.
fn hash_unit(x: usize, y: usize) -> f32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "only the low bits feed the hash"
    )]
    let (x, y) = (x as u32, y as u32);
    let mut h = x.wrapping_mul(0x9e37_79b1) ^ y.wrapping_mul(0x85eb_ca77);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2c1b_3c6d);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297a_2d39);
    h ^= h >> 15;
    (h >> 8) as f32 / (1_u32 << 24) as f32
}
