// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Framework-independent backdrop blur ("frosted glass") composition.
//!
//! `frost_core` renders regions of a UI that show a blurred, tinted copy of
//! the content behind them. It is `no_std` compatible (with `alloc`) and owns
//! no renderer: hosts plug in through the [`Host`](host::Host) and
//! [`DrawTarget`](host::DrawTarget) traits.
//!
//! # Architecture
//!
//! One *source region* is captured into an offscreen layer each frame. Any
//! number of *effect children* ([`ChildEffectNode`](node::ChildEffectNode))
//! sample that layer at their own position:
//!
//! ```text
//!   host layout ──► on_placement_changed ──► Geometry (position, layer size)
//!                                                 │
//!   configure closure ─┐                          ▼
//!   ambient style ─────┴──► update ──► EffectConfig::diff ──► DirtyFlags
//!                                                                 │
//!                 ┌───────────────────────────────────────────────┘
//!                 ▼
//!   draw ──► Compositor ──► scratch layer ──► RenderEffect ──► draw_content
//!              (layers | scrim)                (per band if progressive)
//! ```
//!
//! **[`node`]**: The per-child engine (lifecycle, update pass, draw pass).
//!
//! **[`compositor`]**: Layer strategy (scratch layer + render effects, with
//! progressive bands) and scrim fallback, selected once from
//! [`Capabilities`](compositor::Capabilities).
//!
//! **[`style`]**: Tints, styles, defaults, and three-level resolution
//! (node value → node style → ambient style).
//!
//! **[`progressive`]**: Linear-gradient intensity descriptors, easing
//! curves, and band partitioning.
//!
//! **[`effect`]**: Backend-neutral [`RenderEffect`](effect::RenderEffect)
//! pipelines and the scoped scratch-layer helper.
//!
//! **[`config`]** and **[`dirty`]**: Per-node settings and the change
//! classification that drives invalidation.
//!
//! **[`geometry`]**, **[`clip`]**, **[`brush`]**, **[`color`]**: Value types
//! and clipping helpers.
//!
//! **[`source`]**: Shared state of a source region.
//!
//! **[`host`]**: Host and draw-target contracts.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-band
//!   intensity events for progressive draws.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod brush;
pub mod clip;
pub mod color;
pub mod compositor;
pub mod config;
pub mod dirty;
pub mod effect;
pub mod geometry;
pub mod host;
pub mod id;
pub mod node;
pub mod progressive;
pub mod source;
pub mod style;
pub mod trace;

#[cfg(test)]
mod testing;
