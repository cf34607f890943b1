// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tints, styles, and layered style resolution.
//!
//! Every visual parameter is resolved from three levels, first specified value
//! wins:
//!
//! 1. the value set directly on the node's [`EffectConfig`],
//! 2. the node's own [`Style`] object ([`EffectConfig::style`]),
//! 3. the ambient style supplied by the host.
//!
//! Tint lists are resolved as a whole: the first non-empty list wins and lists
//! are never merged.

use alloc::vec;
use alloc::vec::Vec;

use crate::color::{BlendMode, Color};
use crate::config::EffectConfig;
use crate::geometry::Dp;

/// A color overlay applied after the blur.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tint {
    /// Overlay color.
    pub color: Color,
    /// How the overlay combines with the blurred backdrop.
    pub blend_mode: BlendMode,
}

impl Tint {
    /// A source-over tint of the given color.
    #[inline]
    #[must_use]
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            blend_mode: BlendMode::SourceOver,
        }
    }

    /// Returns the tint with a different blend mode.
    #[inline]
    #[must_use]
    pub const fn with_blend_mode(self, blend_mode: BlendMode) -> Self {
        Self { blend_mode, ..self }
    }

    /// Strengthens the tint for use as a flat scrim without real blur.
    ///
    /// Alpha grows linearly with the blur radius; a 72 dp radius doubles it.
    /// The result never exceeds full opacity.
    #[must_use]
    pub fn boost_for_fallback(self, blur_radius: Dp) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "radius in dp comfortably fits f32"
        )]
        let factor = 1.0 + (blur_radius.0.max(0.0) / 72.0) as f32;
        Self {
            color: self.color.with_alpha((self.color.a * factor).min(1.0)),
            ..self
        }
    }

    /// Scales the tint alpha, used to fade tints with progressive intensity.
    #[inline]
    #[must_use]
    pub fn with_alpha_modulate(self, modulate: f32) -> Self {
        Self {
            color: self.color.multiply_alpha(modulate),
            ..self
        }
    }
}

/// A set of optional visual parameters.
///
/// `None` (or an empty tint list) means "not specified here, ask the next
/// level".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Opaque base painted under the backdrop in the inflated border.
    pub background_color: Option<Color>,
    /// Tints applied in order after the blur.
    pub tints: Vec<Tint>,
    /// Blur radius.
    pub blur_radius: Option<Dp>,
    /// Strength of the multiplicative noise, `0.0..=1.0`.
    pub noise_factor: Option<f32>,
    /// Tint used when real blur is unavailable.
    pub fallback_tint: Option<Tint>,
}

impl Style {
    /// A style with nothing specified.
    pub const UNSPECIFIED: Self = Self {
        background_color: None,
        tints: Vec::new(),
        blur_radius: None,
        noise_factor: None,
        fallback_tint: None,
    };

    /// The default style for a backdrop of the given color.
    ///
    /// See [`StyleDefaults`] for the values used.
    #[must_use]
    pub fn from_background(background_color: Color) -> Self {
        Self {
            background_color: Some(background_color),
            tints: vec![StyleDefaults::tint(background_color)],
            blur_radius: Some(StyleDefaults::BLUR_RADIUS),
            noise_factor: Some(StyleDefaults::NOISE_FACTOR),
            fallback_tint: None,
        }
    }
}

/// Default values used by [`Style::from_background`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StyleDefaults;

impl StyleDefaults {
    /// Default blur radius.
    pub const BLUR_RADIUS: Dp = Dp(20.0);
    /// Default noise factor.
    pub const NOISE_FACTOR: f32 = 0.15;
    /// Alpha given to the default tint.
    pub const TINT_ALPHA: f32 = 0.7;

    /// The default tint for a backdrop color.
    #[inline]
    #[must_use]
    pub fn tint(color: Color) -> Tint {
        Tint::new(color.with_alpha(Self::TINT_ALPHA))
    }
}

/// Resolves parameters across node config, node style, and ambient style.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    config: &'a EffectConfig,
    ambient: &'a Style,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over a node configuration and the ambient style.
    #[inline]
    #[must_use]
    pub const fn new(config: &'a EffectConfig, ambient: &'a Style) -> Self {
        Self { config, ambient }
    }

    /// Resolved blur radius, if any level specifies one.
    #[must_use]
    pub fn blur_radius(&self) -> Option<Dp> {
        first_specified([
            self.config.blur_radius,
            self.config.style.blur_radius,
            self.ambient.blur_radius,
        ])
    }

    /// Resolved noise factor, zero when unspecified.
    #[must_use]
    pub fn noise_factor(&self) -> f32 {
        first_specified([
            self.config.noise_factor,
            self.config.style.noise_factor,
            self.ambient.noise_factor,
        ])
        .unwrap_or(0.0)
    }

    /// Resolved background color.
    #[must_use]
    pub fn background_color(&self) -> Option<Color> {
        first_specified([
            self.config.background_color,
            self.config.style.background_color,
            self.ambient.background_color,
        ])
    }

    /// Resolved fallback tint.
    #[must_use]
    pub fn fallback_tint(&self) -> Option<Tint> {
        first_specified([
            self.config.fallback_tint,
            self.config.style.fallback_tint,
            self.ambient.fallback_tint,
        ])
    }

    /// Resolved tint list: the first non-empty list, else empty.
    #[must_use]
    pub fn tints(&self) -> &'a [Tint] {
        let (config, ambient) = (self.config, self.ambient);
        [&config.tints, &config.style.tints, &ambient.tints]
            .into_iter()
            .find(|tints| !tints.is_empty())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn first_specified<T: Copy>(levels: [Option<T>; 3]) -> Option<T> {
    levels.into_iter().flatten().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_style(style: Style) -> EffectConfig {
        EffectConfig {
            style,
            ..EffectConfig::default()
        }
    }

    #[test]
    fn style_object_beats_ambient() {
        let config = config_with_style(Style {
            blur_radius: Some(Dp(8.0)),
            ..Style::UNSPECIFIED
        });
        let ambient = Style {
            blur_radius: Some(Dp(20.0)),
            ..Style::UNSPECIFIED
        };
        assert_eq!(Resolver::new(&config, &ambient).blur_radius(), Some(Dp(8.0)));
    }

    #[test]
    fn local_value_beats_everything() {
        let mut config = config_with_style(Style {
            noise_factor: Some(0.5),
            background_color: Some(Color::WHITE),
            ..Style::UNSPECIFIED
        });
        config.noise_factor = Some(0.1);
        config.background_color = Some(Color::BLACK);
        let ambient = Style::from_background(Color::WHITE);
        let resolver = Resolver::new(&config, &ambient);
        assert_eq!(resolver.noise_factor(), 0.1);
        assert_eq!(resolver.background_color(), Some(Color::BLACK));
    }

    #[test]
    fn all_unspecified_yields_defaults() {
        let config = EffectConfig::default();
        let ambient = Style::UNSPECIFIED;
        let resolver = Resolver::new(&config, &ambient);
        assert_eq!(resolver.blur_radius(), None);
        assert_eq!(resolver.noise_factor(), 0.0);
        assert_eq!(resolver.background_color(), None);
        assert_eq!(resolver.fallback_tint(), None);
        assert!(resolver.tints().is_empty());
    }

    #[test]
    fn tints_resolve_as_whole_lists() {
        let red = Tint::new(Color::new(1.0, 0.0, 0.0, 0.5));
        let blue = Tint::new(Color::new(0.0, 0.0, 1.0, 0.5));
        let green = Tint::new(Color::new(0.0, 1.0, 0.0, 0.5));
        let config = config_with_style(Style {
            tints: vec![red, blue],
            ..Style::UNSPECIFIED
        });
        let ambient = Style {
            tints: vec![green],
            ..Style::UNSPECIFIED
        };
        assert_eq!(Resolver::new(&config, &ambient).tints(), &[red, blue]);

        let empty = EffectConfig::default();
        assert_eq!(Resolver::new(&empty, &ambient).tints(), &[green]);
    }

    #[test]
    fn boost_scales_with_radius_and_caps() {
        let tint = Tint::new(Color::BLACK.with_alpha(0.3));
        assert_eq!(tint.boost_for_fallback(Dp::ZERO).color.a, 0.3);
        let boosted = tint.boost_for_fallback(Dp(72.0));
        assert!((boosted.color.a - 0.6).abs() < 1e-6, "got {}", boosted.color.a);
        assert_eq!(tint.boost_for_fallback(Dp(1000.0)).color.a, 1.0);
        assert_eq!(boosted.blend_mode, tint.blend_mode);
    }

    #[test]
    fn default_style_values() {
        let style = Style::from_background(Color::WHITE);
        assert_eq!(style.blur_radius, Some(Dp(20.0)));
        assert_eq!(style.noise_factor, Some(0.15));
        assert_eq!(style.tints.len(), 1);
        assert_eq!(style.tints[0].color.a, StyleDefaults::TINT_ALPHA);
    }
}
