// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-region effect engine.
//!
//! A [`ChildEffectNode`] renders a blurred, tinted window of a shared source
//! region behind its own content. The host drives it through three entry
//! points:
//!
//! - [`attach`](ChildEffectNode::attach) / [`detach`](ChildEffectNode::detach)
//!   when the node joins or leaves the tree,
//! - [`on_placement_changed`](ChildEffectNode::on_placement_changed) whenever
//!   layout moves or resizes the node,
//! - [`draw`](ChildEffectNode::draw) once per frame.
//!
//! Configuration arrives either directly through
//! [`apply_config`](ChildEffectNode::apply_config) or from a closure installed
//! with [`set_configure`](ChildEffectNode::set_configure), which the update
//! pass re-runs under the host's read observation.

use alloc::boxed::Box;
#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;
use core::fmt;

use crate::compositor::{Compositor, DrawPath, Frame};
use crate::config::EffectConfig;
use crate::dirty::DirtyFlags;
use crate::geometry::{Dp, Geometry, Placement};
use crate::host::{DrawTarget, Host};
use crate::id::NodeId;
use crate::source::SourceState;
use crate::style::{Resolver, Style};
use crate::trace::{DrawEvent, InvalidateEvent, LifecycleEvent, LifecycleKind, PlacementEvent};

/// A user closure that edits the node's configuration in place.
pub type Configure = Box<dyn FnMut(&mut EffectConfig)>;

/// Where a node is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Not in the tree.
    Detached,
    /// Attached, waiting for the first placement.
    Placing,
    /// Placed, but sizes are unusable; draws own content only.
    Invalid,
    /// Placed with usable geometry.
    Valid,
}

/// Summary of one draw pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawReport {
    /// How the node was drawn.
    pub path: DrawPath,
    /// Render effects built during the pass.
    pub effects_built: u32,
    /// Progressive bands drawn.
    pub bands: u32,
}

/// Renders a blurred window of a source region behind its own content.
pub struct ChildEffectNode {
    id: NodeId,

    // -- Configuration --
    config: EffectConfig,
    configure: Option<Configure>,
    ambient: Style,

    // -- Layout --
    geometry: Geometry,
    density: f64,

    // -- Frame state --
    dirty: DirtyFlags,
    attached: bool,
    compositor: Compositor,
}

impl fmt::Debug for ChildEffectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildEffectNode")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("ambient", &self.ambient)
            .field("geometry", &self.geometry)
            .field("density", &self.density)
            .field("dirty", &self.dirty)
            .field("attached", &self.attached)
            .field("compositor", &self.compositor)
            .finish_non_exhaustive()
    }
}

impl ChildEffectNode {
    /// Creates a detached node using the given strategy.
    ///
    /// Every dirty flag starts raised.
    #[must_use]
    pub fn new(id: NodeId, compositor: impl Into<Compositor>) -> Self {
        Self {
            id,
            config: EffectConfig::default(),
            configure: None,
            ambient: Style::UNSPECIFIED,
            geometry: Geometry::default(),
            density: 1.0,
            dirty: DirtyFlags::ALL,
            attached: false,
            compositor: compositor.into(),
        }
    }

    /// Returns the node with an initial configuration.
    #[must_use]
    pub fn with_config(mut self, config: EffectConfig) -> Self {
        self.config = config;
        self
    }

    /// Installs the configuration closure run by every update pass.
    pub fn set_configure(&mut self, configure: impl FnMut(&mut EffectConfig) + 'static) {
        self.configure = Some(Box::new(configure));
    }

    /// Replaces the configuration and raises the flags its changes imply.
    ///
    /// Returns the flags raised by this change alone.
    pub fn apply_config(&mut self, config: EffectConfig) -> DirtyFlags {
        let changed = EffectConfig::diff(&self.config, &config);
        self.config = config;
        self.dirty |= changed;
        if changed.contains(DirtyFlags::RENDER_EFFECT) {
            self.refresh_layer_size();
        }
        changed
    }

    /// Joins the tree and runs the first update pass.
    pub fn attach<H: Host>(&mut self, host: &mut H) {
        self.attached = true;
        host.tracer().lifecycle(&LifecycleEvent {
            node: self.id,
            kind: LifecycleKind::Attach,
        });
        self.update(host);
    }

    /// Leaves the tree, dropping geometry and cached effects.
    pub fn detach<H: Host>(&mut self, host: &mut H) {
        self.attached = false;
        self.geometry = Geometry::default();
        self.dirty = DirtyFlags::ALL;
        self.compositor.reset();
        host.tracer().lifecycle(&LifecycleEvent {
            node: self.id,
            kind: LifecycleKind::Detach,
        });
    }

    /// Recomputes geometry after layout, then runs the update pass.
    pub fn on_placement_changed<H: Host, L: Copy>(
        &mut self,
        host: &mut H,
        source: &SourceState<L>,
        placement: Placement,
    ) {
        let position = placement.position_in_content(source.position_on_screen());
        if position != self.geometry.position_in_content {
            self.geometry.position_in_content = position;
            self.dirty |= DirtyFlags::POSITION;
        }
        if self.geometry.content_size != Some(placement.size) {
            self.geometry.content_size = Some(placement.size);
            self.dirty |= DirtyFlags::RENDER_EFFECT;
        }
        self.density = host.density();
        self.refresh_layer_size();

        host.tracer().placement(&PlacementEvent {
            node: self.id,
            position_in_content: self.geometry.position_in_content,
            content_size: placement.size,
            layer_size: self.geometry.layer_size.unwrap_or_default(),
            blur_radius_px: self.geometry.blur_radius_px,
        });
        self.update(host);
    }

    /// Re-runs the configuration closure and refreshes the ambient style
    /// under the host's read observation, then requests a redraw if anything
    /// is dirty.
    pub fn update<H: Host>(&mut self, host: &mut H) {
        let mut config = self.config.clone();
        let mut ambient = None;
        let configure = &mut self.configure;
        host.observe_reads(&mut |host: &H| {
            if let Some(configure) = configure.as_mut() {
                configure(&mut config);
            }
            ambient = Some(host.ambient_style());
        });

        self.apply_config(config);
        if let Some(ambient) = ambient
            && ambient != self.ambient
        {
            self.ambient = ambient;
            self.dirty |= DirtyFlags::RENDER_EFFECT;
        }
        self.density = host.density();
        self.refresh_layer_size();

        if !self.dirty.is_empty() {
            host.tracer().invalidate(&InvalidateEvent {
                node: self.id,
                dirty: self.dirty,
            });
            host.request_redraw();
        }
    }

    /// Draws the effect and then the node's own content.
    ///
    /// Per-frame flags are cleared afterwards; the render-effect flag only
    /// when the effect was actually rebuilt. Detached or invalid nodes draw
    /// their own content only and keep their flags.
    ///
    /// # Panics
    ///
    /// Panics if called while `source` is drawing its own content (the node
    /// would capture itself), if the node's content draws `source`, or if the layer strategy is active and no
    /// background color resolves.
    pub fn draw<H: Host, T: DrawTarget + ?Sized>(
        &mut self,
        host: &mut H,
        source: &SourceState<T::Layer>,
        target: &mut T,
    ) -> DrawReport {
        assert!(
            !source.is_content_drawing(),
            "effect children and their source region can not be descendants of each other"
        );
        let dirty = self.dirty;

        if self.state() != NodeState::Valid {
            source.draw_child(|| target.draw_content());
            let report = DrawReport {
                path: DrawPath::Unmodified,
                effects_built: 0,
                bands: 0,
            };
            self.trace_draw(host, dirty, report);
            return report;
        }

        let frame = Frame {
            config: &self.config,
            resolver: Resolver::new(&self.config, &self.ambient),
            geometry: &self.geometry,
            dirty,
        };
        let compositor = &mut self.compositor;
        let outcome = source.draw_child(|| {
            let outcome = compositor.draw(&frame, source, target);
            target.draw_content();
            outcome
        });

        if outcome.rebuilt {
            self.dirty.remove(DirtyFlags::RENDER_EFFECT);
        }
        self.dirty.remove(DirtyFlags::PER_FRAME);

        let report = DrawReport {
            path: outcome.path,
            effects_built: outcome.effects_built,
            bands: outcome.bands,
        };
        self.trace_draw(host, dirty, report);
        report
    }

    fn trace_draw<H: Host>(&self, host: &mut H, dirty: DirtyFlags, report: DrawReport) {
        let mut tracer = host.tracer();
        tracer.draw(&DrawEvent {
            node: self.id,
            path: report.path,
            dirty,
            effects_built: report.effects_built,
            bands: report.bands,
        });
        #[cfg(feature = "trace-rich")]
        if report.path == DrawPath::Progressive
            && tracer.is_active()
            && let Compositor::Layers(layers) = &self.compositor
        {
            let samples: Vec<_> = layers
                .bands()
                .iter()
                .map(|band| crate::trace::BandSample {
                    intensity: band.intensity,
                    has_effect: band.intensity > 0.0,
                })
                .collect();
            tracer.bands(self.id, &samples);
        }
    }

    /// Recomputes the blur radius in pixels and the inflated layer size.
    fn refresh_layer_size(&mut self) {
        let blur_radius_px = Resolver::new(&self.config, &self.ambient)
            .blur_radius()
            .unwrap_or(Dp::ZERO)
            .to_px(self.density)
            .max(0.0);
        let layer_size = self
            .geometry
            .content_size
            .map(|size| Geometry::inflate(size, blur_radius_px));
        if layer_size != self.geometry.layer_size
            || blur_radius_px != self.geometry.blur_radius_px
        {
            self.geometry.layer_size = layer_size;
            self.geometry.blur_radius_px = blur_radius_px;
            self.dirty |= DirtyFlags::RENDER_EFFECT;
        }
    }

    // -- Accessors --

    /// The node's identity.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> NodeState {
        if !self.attached {
            NodeState::Detached
        } else if self.geometry.content_size.is_none() {
            NodeState::Placing
        } else if !self.geometry.is_valid() {
            NodeState::Invalid
        } else {
            NodeState::Valid
        }
    }

    /// Pending dirty flags.
    #[must_use]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Current geometry.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Last applied configuration.
    #[must_use]
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Last observed ambient style.
    #[must_use]
    pub fn ambient_style(&self) -> &Style {
        &self.ambient
    }

    /// Resolver over the current configuration and ambient style.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.config, &self.ambient)
    }

    /// The compositing strategy.
    #[must_use]
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }
}
