// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node effect configuration and change classification.
//!
//! A node keeps the last applied [`EffectConfig`]. Applying a new one diffs
//! the two per logical group and yields the [`DirtyFlags`] to raise:
//!
//! | Fields | Flag |
//! |---|---|
//! | `style`, `blur_radius`, `noise_factor`, `mask`, `background_color`, `tints`, `fallback_tint` | `RENDER_EFFECT` |
//! | `alpha`, `shape` | `DRAW_PARAMETERS` |
//! | `progressive` | `PROGRESSIVE` |

use alloc::vec::Vec;

use crate::brush::Brush;
use crate::clip::ClipShape;
use crate::color::Color;
use crate::dirty::DirtyFlags;
use crate::geometry::Dp;
use crate::progressive::Progressive;
use crate::style::{Style, Tint};

/// Settings for one effect node.
///
/// Unset (`None` or empty) style fields fall through to [`style`](Self::style)
/// and then to the ambient style; see [`Resolver`](crate::style::Resolver).
#[derive(Clone, Debug, PartialEq)]
pub struct EffectConfig {
    /// Style object consulted after the node's own fields.
    pub style: Style,
    /// Blur radius.
    pub blur_radius: Option<Dp>,
    /// Noise factor.
    pub noise_factor: Option<f32>,
    /// Restricts where the effect is visible by the brush alpha.
    pub mask: Option<Brush>,
    /// Opaque base for the inflated border.
    pub background_color: Option<Color>,
    /// Tints applied after the blur.
    pub tints: Vec<Tint>,
    /// Tint used when real blur is unavailable.
    pub fallback_tint: Option<Tint>,
    /// Opacity of the whole effect, `0.0..=1.0`.
    pub alpha: f32,
    /// Spatially varying intensity, if any.
    pub progressive: Option<Progressive>,
    /// Clip applied instead of the node bounds.
    pub shape: Option<ClipShape>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            style: Style::UNSPECIFIED,
            blur_radius: None,
            noise_factor: None,
            mask: None,
            background_color: None,
            tints: Vec::new(),
            fallback_tint: None,
            alpha: 1.0,
            progressive: None,
            shape: None,
        }
    }
}

impl EffectConfig {
    /// Classifies the changes between `old` and `new`.
    #[must_use]
    pub fn diff(old: &Self, new: &Self) -> DirtyFlags {
        let mut dirty = DirtyFlags::empty();
        if old.style != new.style
            || old.blur_radius != new.blur_radius
            || old.noise_factor != new.noise_factor
            || old.mask != new.mask
            || old.background_color != new.background_color
            || old.tints != new.tints
            || old.fallback_tint != new.fallback_tint
        {
            dirty |= DirtyFlags::RENDER_EFFECT;
        }
        if old.alpha != new.alpha || old.shape != new.shape {
            dirty |= DirtyFlags::DRAW_PARAMETERS;
        }
        if old.progressive != new.progressive {
            dirty |= DirtyFlags::PROGRESSIVE;
        }
        dirty
    }
}
