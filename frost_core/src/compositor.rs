// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositing strategies.
//!
//! A node draws its effect with one of two strategies, chosen once from the
//! target's [`Capabilities`]:
//!
//! - [`LayerCompositor`]: the backdrop is copied into an inflated scratch
//!   layer and drawn back through a [`RenderEffect`]. Progressive effects
//!   draw the scratch layer once per band, each band clipped and drawn through
//!   the effect for its intensity.
//! - [`ScrimCompositor`]: no offscreen layers or effects are available, so a
//!   single translucent tint approximates the blurred backdrop.
//!
//! Layer path, in node coordinates:
//!
//! ```text
//!   scratch = create_layer(round(layer_size))
//!   record(scratch):
//!       fill(background)
//!       translate(content_offset - position_in_content)
//!       draw_layer(source)
//!   clip(0, 0, content_size)
//!   translate(-content_offset)
//!   draw_layer(scratch, effect, alpha)        // or once per band
//!   release_layer(scratch)
//! ```

use alloc::vec::Vec;
use core::mem;

use kurbo::{Point, Rect, Vec2};

use crate::clip::{PathPool, clip_band, clip_shape};
use crate::color::BlendMode;
use crate::config::EffectConfig;
use crate::dirty::DirtyFlags;
use crate::effect::{EffectParams, RenderEffect, create_render_effect, with_scratch_layer};
use crate::geometry::{Dp, Geometry, PixelSize};
use crate::host::DrawTarget;
use crate::progressive::{Band, LinearGradient, Progressive};
use crate::source::SourceState;
use crate::style::Resolver;

const MISSING_BACKGROUND: &str = "background color not specified; set one on the node, \
    its style, or the ambient style";

/// What the draw target can do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Offscreen layers can be allocated and recorded into.
    pub graphics_layers: bool,
    /// Layers can be drawn through a [`RenderEffect`].
    pub render_effects: bool,
}

impl Capabilities {
    /// Offscreen layers and render effects.
    pub const FULL: Self = Self {
        graphics_layers: true,
        render_effects: true,
    };

    /// Neither offscreen layers nor render effects.
    pub const NONE: Self = Self {
        graphics_layers: false,
        render_effects: false,
    };

    /// Whether the layer strategy can be used.
    #[inline]
    #[must_use]
    pub const fn supports_layer_effects(self) -> bool {
        self.graphics_layers && self.render_effects
    }
}

/// How a draw pass rendered the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawPath {
    /// Own content only: the node was detached or its geometry invalid.
    Unmodified,
    /// Own content only: the source region has not been captured yet.
    NoSource,
    /// Scratch layer drawn through a single effect.
    Layer,
    /// Scratch layer drawn once per progressive band.
    Progressive,
    /// Flat tint approximation.
    Scrim,
}

/// Everything a strategy needs for one draw.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame<'a> {
    pub(crate) config: &'a EffectConfig,
    pub(crate) resolver: Resolver<'a>,
    pub(crate) geometry: &'a Geometry,
    pub(crate) dirty: DirtyFlags,
}

impl Frame<'_> {
    fn effect_params(&self, intensity: f32) -> EffectParams<'_> {
        let geometry = self.geometry;
        EffectParams {
            blur_radius_px: geometry.blur_radius_px * f64::from(intensity),
            noise_factor: self.resolver.noise_factor(),
            tints: self.resolver.tints(),
            tint_alpha_modulate: intensity,
            content_size: geometry.content_size.unwrap_or_default(),
            content_offset: geometry.content_offset(),
            layer_size: geometry.layer_size.unwrap_or_default(),
            mask: self.config.mask.as_ref(),
        }
    }

    fn content_rect(&self) -> Rect {
        self.geometry.content_rect().unwrap_or(Rect::ZERO)
    }

    /// Overall opacity, clamped to `0..=1`.
    fn alpha(&self) -> f32 {
        self.config.alpha.clamp(0.0, 1.0)
    }
}

/// Result of a strategy draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) path: DrawPath,
    pub(crate) effects_built: u32,
    pub(crate) bands: u32,
    /// The render effect now matches the configuration.
    pub(crate) rebuilt: bool,
}

impl Outcome {
    const fn skipped(path: DrawPath) -> Self {
        Self {
            path,
            effects_built: 0,
            bands: 0,
            rebuilt: false,
        }
    }
}

/// The strategy a node composites with.
#[derive(Debug)]
pub enum Compositor {
    /// Offscreen layers with render effects.
    Layers(LayerCompositor),
    /// Flat tint fallback.
    Scrim(ScrimCompositor),
}

impl Compositor {
    /// Picks the best strategy the capabilities allow.
    #[must_use]
    pub fn for_capabilities(capabilities: Capabilities) -> Self {
        if capabilities.supports_layer_effects() {
            Self::Layers(LayerCompositor::new())
        } else {
            Self::Scrim(ScrimCompositor::new())
        }
    }

    /// Drops cached effects.
    pub fn reset(&mut self) {
        match self {
            Self::Layers(layers) => layers.reset(),
            Self::Scrim(_) => {}
        }
    }

    pub(crate) fn draw<T: DrawTarget + ?Sized>(
        &mut self,
        frame: &Frame<'_>,
        source: &SourceState<T::Layer>,
        target: &mut T,
    ) -> Outcome {
        match self {
            Self::Layers(layers) => layers.draw(frame, source, target),
            Self::Scrim(scrim) => scrim.draw(frame, target),
        }
    }
}

impl From<LayerCompositor> for Compositor {
    fn from(layers: LayerCompositor) -> Self {
        Self::Layers(layers)
    }
}

impl From<ScrimCompositor> for Compositor {
    fn from(scrim: ScrimCompositor) -> Self {
        Self::Scrim(scrim)
    }
}

#[derive(Debug, Default)]
enum EffectCache {
    #[default]
    Empty,
    Uniform(Option<RenderEffect>),
    Banded(Vec<BandEffect>),
}

/// An effect built for one band intensity.
#[derive(Debug)]
struct BandEffect {
    /// `f32::to_bits` of the intensity.
    key: u32,
    effect: Option<RenderEffect>,
    used: bool,
}

/// Composites through an inflated scratch layer and render effects.
#[derive(Debug)]
pub struct LayerCompositor {
    band_count: usize,
    cache: EffectCache,
    bands: Vec<Band>,
    paths: PathPool,
}

impl Default for LayerCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerCompositor {
    /// Bands used for progressive effects unless configured otherwise.
    pub const DEFAULT_BAND_COUNT: usize = 10;

    /// Creates a compositor with the default band count.
    #[must_use]
    pub fn new() -> Self {
        Self {
            band_count: Self::DEFAULT_BAND_COUNT,
            cache: EffectCache::Empty,
            bands: Vec::new(),
            paths: PathPool::new(),
        }
    }

    /// Returns the compositor with a different band count (at least 1).
    ///
    /// More bands give smoother progressive effects at the cost of one layer
    /// draw per band.
    #[must_use]
    pub fn with_band_count(mut self, band_count: usize) -> Self {
        self.band_count = band_count.max(1);
        self
    }

    /// Bands used for progressive effects.
    #[must_use]
    pub fn band_count(&self) -> usize {
        self.band_count
    }

    /// Bands of the most recent progressive draw.
    #[must_use]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Number of render effects currently cached.
    #[must_use]
    pub fn cached_effects(&self) -> usize {
        match &self.cache {
            EffectCache::Empty => 0,
            EffectCache::Uniform(_) => 1,
            EffectCache::Banded(entries) => entries.len(),
        }
    }

    /// Drops cached effects and bands.
    pub fn reset(&mut self) {
        self.cache = EffectCache::Empty;
        self.bands.clear();
    }

    fn draw<T: DrawTarget + ?Sized>(
        &mut self,
        frame: &Frame<'_>,
        source: &SourceState<T::Layer>,
        target: &mut T,
    ) -> Outcome {
        let Some(layer_size) = frame.geometry.layer_size else {
            return Outcome::skipped(DrawPath::Unmodified);
        };
        let Some(source_layer) = source.content_layer() else {
            return Outcome::skipped(DrawPath::NoSource);
        };
        let content_offset = frame.geometry.content_offset();
        let capture_offset = content_offset - frame.geometry.position_in_content.to_vec2();
        let layer_rect = Rect::from_origin_size(Point::ZERO, layer_size);

        with_scratch_layer(target, PixelSize::round(layer_size), |target, scratch| {
            let Some(background) = frame.resolver.background_color() else {
                panic!("{MISSING_BACKGROUND}");
            };
            target.record(scratch, &mut |t| {
                t.fill_rect(layer_rect, background, BlendMode::SourceOver);
                t.save();
                t.translate(capture_offset);
                t.draw_layer(source_layer, None, 1.0);
                t.restore();
            });

            target.save();
            target.clip_rect(frame.content_rect());
            if let Some(shape) = &frame.config.shape {
                clip_shape(target, shape, Vec2::ZERO, &mut self.paths);
            }
            target.translate(-content_offset);
            let outcome = match &frame.config.progressive {
                Some(Progressive::LinearGradient(gradient)) => {
                    self.draw_bands(frame, gradient, target, scratch)
                }
                None => self.draw_uniform(frame, target, scratch),
            };
            target.restore();
            outcome
        })
    }

    fn draw_uniform<T: DrawTarget + ?Sized>(
        &mut self,
        frame: &Frame<'_>,
        target: &mut T,
        scratch: T::Layer,
    ) -> Outcome {
        let rebuild = frame.dirty.contains(DirtyFlags::RENDER_EFFECT)
            || !matches!(self.cache, EffectCache::Uniform(_));
        if rebuild {
            self.cache = EffectCache::Uniform(create_render_effect(&frame.effect_params(1.0)));
        }
        let effect = match &self.cache {
            EffectCache::Uniform(effect) => effect.as_ref(),
            _ => None,
        };
        target.draw_layer(scratch, effect, frame.alpha());
        Outcome {
            path: DrawPath::Layer,
            effects_built: u32::from(rebuild),
            bands: 0,
            rebuilt: rebuild,
        }
    }

    fn draw_bands<T: DrawTarget + ?Sized>(
        &mut self,
        frame: &Frame<'_>,
        gradient: &LinearGradient,
        target: &mut T,
        scratch: T::Layer,
    ) -> Outcome {
        let content_size = frame.geometry.content_size.unwrap_or_default();
        let content_offset = frame.geometry.content_offset();
        gradient.bands_into(content_size, self.band_count, &mut self.bands);

        let rebuild = frame.dirty.contains(DirtyFlags::RENDER_EFFECT)
            || !matches!(self.cache, EffectCache::Banded(_));
        let mut entries = match mem::take(&mut self.cache) {
            EffectCache::Banded(entries) if !rebuild => entries,
            _ => Vec::new(),
        };
        for entry in &mut entries {
            entry.used = false;
        }

        let mut built = 0_u32;
        for band in &self.bands {
            let key = band.intensity.to_bits();
            let idx = match entries.iter().position(|e| e.key == key) {
                Some(idx) => idx,
                None => {
                    entries.push(BandEffect {
                        key,
                        effect: create_render_effect(&frame.effect_params(band.intensity)),
                        used: false,
                    });
                    built += 1;
                    entries.len() - 1
                }
            };
            entries[idx].used = true;

            target.save();
            clip_band(target, &band.shape, content_offset, &mut self.paths);
            target.draw_layer(scratch, entries[idx].effect.as_ref(), frame.alpha());
            target.restore();
        }
        entries.retain(|e| e.used);
        self.cache = EffectCache::Banded(entries);

        #[expect(
            clippy::cast_possible_truncation,
            reason = "band count is a small configured value"
        )]
        let bands = self.bands.len() as u32;
        Outcome {
            path: DrawPath::Progressive,
            effects_built: built,
            bands,
            rebuilt: rebuild,
        }
    }
}

/// Approximates the effect with one translucent tint.
#[derive(Debug, Default)]
pub struct ScrimCompositor {
    paths: PathPool,
}

impl ScrimCompositor {
    /// Creates a scrim compositor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn draw<T: DrawTarget + ?Sized>(&mut self, frame: &Frame<'_>, target: &mut T) -> Outcome {
        let resolver = frame.resolver;
        let tint = resolver.fallback_tint().or_else(|| {
            let radius = resolver.blur_radius().unwrap_or(Dp::ZERO);
            resolver
                .tints()
                .first()
                .map(|tint| tint.boost_for_fallback(radius))
        });
        let outcome = Outcome {
            path: DrawPath::Scrim,
            effects_built: 0,
            bands: 0,
            rebuilt: true,
        };
        let Some(tint) = tint.filter(|t| !t.color.is_transparent()) else {
            return outcome;
        };

        let bounds = frame.content_rect();
        let alpha = frame.alpha();
        let grouped = alpha < 1.0;
        target.save();
        if let Some(shape) = &frame.config.shape {
            clip_shape(target, shape, Vec2::ZERO, &mut self.paths);
        }
        if grouped {
            target.push_opacity_layer(bounds, alpha);
        }
        match &frame.config.mask {
            Some(mask) => target.fill_rect_masked(bounds, mask, tint.color, tint.blend_mode),
            None => target.fill_rect(bounds, tint.color, tint.blend_mode),
        }
        if grouped {
            target.pop_opacity_layer();
        }
        target.restore();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Size;

    use super::*;
    use crate::color::Color;
    use crate::geometry::Dp;
    use crate::progressive::Easing;
    use crate::style::{Style, Tint};
    use crate::testing::{Op, RecordingTarget};

    fn geometry() -> Geometry {
        Geometry {
            position_in_content: Point::new(20.0, 30.0),
            content_size: Some(Size::new(80.0, 40.0)),
            layer_size: Some(Size::new(96.0, 56.0)),
            blur_radius_px: 8.0,
        }
    }

    fn config() -> EffectConfig {
        EffectConfig {
            blur_radius: Some(Dp(8.0)),
            background_color: Some(Color::BLACK),
            tints: vec![Tint::new(Color::WHITE.with_alpha(0.2))],
            ..EffectConfig::default()
        }
    }

    fn draw(
        compositor: &mut Compositor,
        config: &EffectConfig,
        dirty: DirtyFlags,
        target: &mut RecordingTarget,
    ) -> Outcome {
        let ambient = Style::UNSPECIFIED;
        let geometry = geometry();
        let frame = Frame {
            config,
            resolver: Resolver::new(config, &ambient),
            geometry: &geometry,
            dirty,
        };
        let mut source = SourceState::new(Point::ZERO);
        source.set_content_layer(Some(7));
        compositor.draw(&frame, &source, target)
    }

    #[test]
    fn capabilities_pick_the_strategy() {
        assert!(matches!(
            Compositor::for_capabilities(Capabilities::FULL),
            Compositor::Layers(_)
        ));
        assert!(matches!(
            Compositor::for_capabilities(Capabilities::NONE),
            Compositor::Scrim(_)
        ));
        let layers_only = Capabilities {
            graphics_layers: true,
            render_effects: false,
        };
        assert!(matches!(
            Compositor::for_capabilities(layers_only),
            Compositor::Scrim(_)
        ));
    }

    #[test]
    fn band_count_is_at_least_one() {
        assert_eq!(LayerCompositor::new().band_count(), 10);
        assert_eq!(LayerCompositor::new().with_band_count(0).band_count(), 1);
    }

    #[test]
    fn uniform_effect_is_cached_until_dirty() {
        let mut compositor = Compositor::from(LayerCompositor::new());
        let config = config();
        let mut target = RecordingTarget::default();

        let first = draw(&mut compositor, &config, DirtyFlags::ALL, &mut target);
        assert_eq!((first.effects_built, first.rebuilt), (1, true));
        let second = draw(&mut compositor, &config, DirtyFlags::POSITION, &mut target);
        assert_eq!((second.effects_built, second.rebuilt), (0, false));
        let third = draw(&mut compositor, &config, DirtyFlags::RENDER_EFFECT, &mut target);
        assert_eq!(third.effects_built, 1);

        assert_eq!(target.live_layers(), 0);
        assert_eq!(target.count(|op| matches!(op, Op::CreateLayer(..))), 3);
        assert!(target.ops.contains(&Op::Translate(Vec2::new(-12.0, -22.0))));
    }

    #[test]
    fn switching_to_bands_drops_the_uniform_cache() {
        let mut compositor: Compositor = LayerCompositor::new().with_band_count(3).into();
        let mut config = config();
        let mut target = RecordingTarget::default();
        draw(&mut compositor, &config, DirtyFlags::ALL, &mut target);

        config.progressive = Some(Progressive::horizontal_gradient(
            Easing::Linear,
            0.0,
            0.0,
            f64::INFINITY,
            1.0,
        ));
        let outcome = draw(&mut compositor, &config, DirtyFlags::PROGRESSIVE, &mut target);
        assert_eq!(outcome.path, DrawPath::Progressive);
        assert_eq!((outcome.bands, outcome.effects_built), (3, 3));
        assert!(outcome.rebuilt);

        let Compositor::Layers(layers) = &mut compositor else {
            panic!("expected layer compositor");
        };
        assert_eq!(layers.cached_effects(), 3);
        assert_eq!(layers.bands().len(), 3);
        layers.reset();
        assert_eq!(layers.cached_effects(), 0);
        assert!(layers.bands().is_empty());
    }

    #[test]
    fn diagonal_bands_clip_through_one_pooled_path() {
        let mut compositor = Compositor::from(LayerCompositor::new());
        let config = EffectConfig {
            progressive: Some(Progressive::LinearGradient(LinearGradient::default())),
            ..config()
        };
        let mut target = RecordingTarget::default();
        let outcome = draw(&mut compositor, &config, DirtyFlags::ALL, &mut target);
        assert_eq!(outcome.path, DrawPath::Progressive);
        assert_eq!(outcome.bands, 10);
        assert_eq!(
            target.count(|op| matches!(op, Op::ClipPath(_))),
            10,
            "every diagonal band clips to its polygon"
        );

        draw(&mut compositor, &config, DirtyFlags::POSITION, &mut target);
        assert_eq!(target.count(|op| matches!(op, Op::ClipPath(_))), 20);
        let Compositor::Layers(layers) = &compositor else {
            panic!("expected layer compositor");
        };
        assert_eq!(layers.paths.idle(), 1, "band paths are recycled");
    }

    #[test]
    fn shape_clips_inside_the_content_rect() {
        let mut compositor = Compositor::from(LayerCompositor::new());
        let config = EffectConfig {
            shape: Some(crate::clip::ClipShape::Rect(Rect::new(5.0, 5.0, 20.0, 20.0))),
            ..config()
        };
        let mut target = RecordingTarget::default();
        draw(&mut compositor, &config, DirtyFlags::ALL, &mut target);
        let clips: vec::Vec<_> = target
            .ops
            .iter()
            .filter(|op| matches!(op, Op::ClipRect(_) | Op::ClipPath(_)))
            .collect();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0], &Op::ClipRect(Rect::new(0.0, 0.0, 80.0, 40.0)));
    }

    #[test]
    fn transparent_scrim_draws_nothing() {
        let mut compositor = Compositor::for_capabilities(Capabilities::NONE);
        let config = EffectConfig {
            tints: vec![Tint::new(Color::TRANSPARENT)],
            ..config()
        };
        let mut target = RecordingTarget::default();
        let outcome = draw(&mut compositor, &config, DirtyFlags::ALL, &mut target);
        assert_eq!(outcome.path, DrawPath::Scrim);
        assert!(outcome.rebuilt);
        assert!(target.ops.is_empty());
    }
}
