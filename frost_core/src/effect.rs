// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-effect descriptions and the effect builder.
//!
//! A [`RenderEffect`] is an ordered pipeline applied to a layer when it is
//! drawn with [`DrawTarget::draw_layer`]. Stages run in this order:
//!
//! 1. gaussian blur (skipped when the radius is zero),
//! 2. one color overlay per tint, in list order,
//! 3. multiplicative noise (skipped when the factor is zero),
//! 4. an optional mask restricting where the result is visible.
//!
//! The description is backend-neutral; draw targets map it onto native
//! filters or software implementations.

use alloc::vec::Vec;

use kurbo::{Size, Vec2};

use crate::brush::Brush;
use crate::color::{BlendMode, Color};
use crate::geometry::PixelSize;
use crate::host::DrawTarget;
use crate::style::Tint;

/// Radii below this are treated as no blur.
const MIN_BLUR_RADIUS: f64 = 0.005;

/// Noise factors below this are treated as no noise.
const MIN_NOISE_FACTOR: f32 = 0.005;

/// One stage of a [`RenderEffect`].
#[derive(Clone, Debug, PartialEq)]
pub enum EffectStage {
    /// Gaussian blur with clamped edges.
    Blur {
        /// Blur radius in pixels.
        radius_px: f64,
    },
    /// Color overlay.
    Tint {
        /// Overlay color.
        color: Color,
        /// How the overlay combines with the stage input.
        blend_mode: BlendMode,
    },
    /// Multiplicative procedural noise.
    Noise {
        /// Noise strength, `0.0..=1.0`.
        factor: f32,
    },
    /// Multiplies the result by the alpha of `brush`.
    ///
    /// The brush is in node coordinates; `offset` maps them into the layer
    /// (it is the content offset within the inflated layer).
    Mask {
        /// Brush whose alpha is used.
        brush: Brush,
        /// Node origin within the layer.
        offset: Vec2,
        /// Node size.
        size: Size,
    },
}

/// An ordered effect pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderEffect {
    stages: Vec<EffectStage>,
}

impl RenderEffect {
    /// Stages in application order.
    #[must_use]
    pub fn stages(&self) -> &[EffectStage] {
        &self.stages
    }

    /// Blur radius of the blur stage, or zero.
    #[must_use]
    pub fn blur_radius_px(&self) -> f64 {
        self.stages
            .iter()
            .find_map(|stage| match stage {
                EffectStage::Blur { radius_px } => Some(*radius_px),
                _ => None,
            })
            .unwrap_or(0.0)
    }
}

/// Inputs to [`create_render_effect`].
#[derive(Clone, Copy, Debug)]
pub struct EffectParams<'a> {
    /// Blur radius in pixels.
    pub blur_radius_px: f64,
    /// Noise factor.
    pub noise_factor: f32,
    /// Resolved tints.
    pub tints: &'a [Tint],
    /// Multiplier applied to every tint's alpha.
    pub tint_alpha_modulate: f32,
    /// Node size.
    pub content_size: Size,
    /// Node origin within the layer.
    pub content_offset: Vec2,
    /// Inflated layer size.
    pub layer_size: Size,
    /// Optional mask brush in node coordinates.
    pub mask: Option<&'a Brush>,
}

/// Builds the effect pipeline for the given parameters.
///
/// Returns `None` when there is nothing to apply: no blur, no noise, and no
/// visible tint. A mask on its own does not produce an effect.
#[must_use]
pub fn create_render_effect(params: &EffectParams<'_>) -> Option<RenderEffect> {
    let mut stages = Vec::new();
    if params.blur_radius_px >= MIN_BLUR_RADIUS {
        stages.push(EffectStage::Blur {
            radius_px: params.blur_radius_px,
        });
    }
    for tint in params.tints {
        let tint = tint.with_alpha_modulate(params.tint_alpha_modulate);
        if !tint.color.is_transparent() {
            stages.push(EffectStage::Tint {
                color: tint.color,
                blend_mode: tint.blend_mode,
            });
        }
    }
    if params.noise_factor >= MIN_NOISE_FACTOR {
        stages.push(EffectStage::Noise {
            factor: params.noise_factor.min(1.0),
        });
    }
    if stages.is_empty() {
        return None;
    }
    if let Some(brush) = params.mask {
        stages.push(EffectStage::Mask {
            brush: brush.clone(),
            offset: params.content_offset,
            size: params.content_size,
        });
    }
    Some(RenderEffect { stages })
}

/// Releases a scratch layer when dropped, including during unwinding.
struct ScratchLayer<'a, T: DrawTarget + ?Sized> {
    target: &'a mut T,
    layer: T::Layer,
}

impl<T: DrawTarget + ?Sized> Drop for ScratchLayer<'_, T> {
    fn drop(&mut self) {
        self.target.release_layer(self.layer);
    }
}

/// Allocates a scratch layer, runs `f` with it, and releases it on every exit
/// path.
pub fn with_scratch_layer<T, R>(
    target: &mut T,
    size: PixelSize,
    f: impl FnOnce(&mut T, T::Layer) -> R,
) -> R
where
    T: DrawTarget + ?Sized,
{
    let layer = target.create_layer(size);
    let mut guard = ScratchLayer { target, layer };
    f(&mut *guard.target, layer)
}
