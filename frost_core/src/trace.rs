// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for effect nodes.
//!
//! This module provides a [`TraceSink`] trait with one method per event that
//! effect nodes emit during their lifecycle, update, and draw passes. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching. Hosts hand
//! out tracers from [`Host::tracer`](crate::host::Host::tracer).
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`BandSample`] events for
//!   progressive draws plus the corresponding `TraceSink` method.

use kurbo::{Point, Size};

use crate::compositor::DrawPath;
use crate::dirty::DirtyFlags;
use crate::id::NodeId;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Attachment transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// The node joined the tree.
    Attach,
    /// The node left the tree.
    Detach,
}

/// Emitted when a node is attached or detached.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleEvent {
    /// The node.
    pub node: NodeId,
    /// What happened.
    pub kind: LifecycleKind,
}

/// Emitted after a placement callback updates a node's geometry.
#[derive(Clone, Copy, Debug)]
pub struct PlacementEvent {
    /// The node.
    pub node: NodeId,
    /// Position relative to the source region.
    pub position_in_content: Point,
    /// Node size.
    pub content_size: Size,
    /// Inflated layer size.
    pub layer_size: Size,
    /// Resolved blur radius in pixels.
    pub blur_radius_px: f64,
}

/// Emitted when a node requests a redraw.
#[derive(Clone, Copy, Debug)]
pub struct InvalidateEvent {
    /// The node.
    pub node: NodeId,
    /// Flags pending at the time of the request.
    pub dirty: DirtyFlags,
}

/// Emitted at the end of each draw pass.
#[derive(Clone, Copy, Debug)]
pub struct DrawEvent {
    /// The node.
    pub node: NodeId,
    /// How the node was drawn.
    pub path: DrawPath,
    /// Flags pending when the draw started.
    pub dirty: DirtyFlags,
    /// Render effects built during this draw.
    pub effects_built: u32,
    /// Progressive bands drawn (zero for uniform draws).
    pub bands: u32,
}

/// Intensity of one progressive band.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct BandSample {
    /// Band intensity.
    pub intensity: f32,
    /// Whether the band was drawn through an effect.
    pub has_effect: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from effect nodes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a node is attached or detached.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called after a node's geometry is recomputed from a placement.
    fn on_placement(&mut self, e: &PlacementEvent) {
        _ = e;
    }

    /// Called when a node requests a redraw.
    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        _ = e;
    }

    /// Called at the end of a draw pass.
    fn on_draw(&mut self, e: &DrawEvent) {
        _ = e;
    }

    /// Called with per-band intensities of a progressive draw (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_bands(&mut self, node: NodeId, bands: &[BandSample]) {
        _ = (node, bands);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`LifecycleEvent`].
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lifecycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PlacementEvent`].
    #[inline]
    pub fn placement(&mut self, e: &PlacementEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_placement(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`InvalidateEvent`].
    #[inline]
    pub fn invalidate(&mut self, e: &InvalidateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_invalidate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DrawEvent`].
    #[inline]
    pub fn draw(&mut self, e: &DrawEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_draw(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Returns `true` if events reach a sink.
    ///
    /// Lets callers skip building rich payloads nobody will see.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits per-band samples (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn bands(&mut self, node: NodeId, bands: &[BandSample]) {
        if let Some(s) = &mut self.sink {
            s.on_bands(node, bands);
        }
    }
}
