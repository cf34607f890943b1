// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts between effect nodes and the host UI framework.
//!
//! Frost does not own a layout system, a reactive runtime, or a renderer. A
//! host integration supplies them through two traits:
//!
//! - [`Host`]: display density, the ambient style, observed reads, redraw
//!   requests, and an optional trace sink.
//! - [`DrawTarget`]: the canvas a node draws into during a frame, including
//!   offscreen layer allocation and effect application.
//!
//! # Frame pseudocode
//!
//! ```rust,ignore
//! // Layout: for every effect node whose placement changed.
//! node.on_placement_changed(&mut host, &source, placement);
//!
//! // Draw: the source region is captured first, then each child draws.
//! source.set_content_layer(Some(target.capture_source()));
//! let report = node.draw(&mut host, &source, &mut target);
//! ```

use kurbo::{BezPath, Rect, Vec2};

use crate::brush::Brush;
use crate::color::{BlendMode, Color};
use crate::effect::RenderEffect;
use crate::geometry::PixelSize;
use crate::style::Style;
use crate::trace::Tracer;

/// Services the host framework provides to effect nodes.
pub trait Host {
    /// Pixels per density-independent unit.
    fn density(&self) -> f64;

    /// The ambient style currently in effect for the node.
    fn ambient_style(&self) -> Style;

    /// Runs `reads` while recording which reactive values it reads, so that
    /// the host can re-run the node's update pass when any of them changes.
    ///
    /// Hosts without a reactive runtime simply call `reads(self)`.
    fn observe_reads(&mut self, reads: &mut dyn FnMut(&Self));

    /// Schedules another draw pass for the node.
    fn request_redraw(&mut self);

    /// Returns a tracer for diagnostics; discards events by default.
    fn tracer(&mut self) -> Tracer<'_> {
        Tracer::none()
    }
}

/// A canvas that effect nodes draw into.
///
/// Coordinates are in the current node's space, transformed by any active
/// [`translate`](Self::translate) calls and limited by active clips. Both are
/// scoped by [`save`](Self::save)/[`restore`](Self::restore).
pub trait DrawTarget {
    /// Handle to an offscreen layer owned by the target.
    type Layer: Copy;

    /// Pushes the current transform and clip.
    fn save(&mut self);

    /// Pops back to the state of the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Moves the origin by `offset`.
    fn translate(&mut self, offset: Vec2);

    /// Intersects the clip with a rectangle.
    fn clip_rect(&mut self, rect: Rect);

    /// Intersects the clip with a closed path (nonzero fill).
    fn clip_path(&mut self, path: &BezPath);

    /// Fills a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color, blend_mode: BlendMode);

    /// Fills a rectangle with `color`, with coverage modulated by the alpha of
    /// `mask` sampled in current coordinates.
    fn fill_rect_masked(&mut self, rect: Rect, mask: &Brush, color: Color, blend_mode: BlendMode);

    /// Starts a group whose result is composited with a uniform `alpha`.
    fn push_opacity_layer(&mut self, bounds: Rect, alpha: f32);

    /// Ends the group started by [`push_opacity_layer`](Self::push_opacity_layer).
    fn pop_opacity_layer(&mut self);

    /// Allocates an offscreen layer, cleared to transparent.
    fn create_layer(&mut self, size: PixelSize) -> Self::Layer;

    /// Frees a layer allocated by [`create_layer`](Self::create_layer).
    fn release_layer(&mut self, layer: Self::Layer);

    /// Redirects drawing into `layer` for the duration of `draw`.
    ///
    /// Inside `draw` the origin is the layer's top-left and no clip applies.
    fn record(&mut self, layer: Self::Layer, draw: &mut dyn FnMut(&mut Self));

    /// Draws `layer` at the current origin, through `effect` if given, with
    /// uniform `alpha`.
    fn draw_layer(&mut self, layer: Self::Layer, effect: Option<&RenderEffect>, alpha: f32);

    /// Draws the node's own content.
    fn draw_content(&mut self);
}
