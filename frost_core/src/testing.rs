// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for the host and draw-target contracts.

use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::{BezPath, Rect, Vec2};

use crate::brush::Brush;
use crate::color::{BlendMode, Color};
use crate::effect::RenderEffect;
use crate::geometry::PixelSize;
use crate::host::{DrawTarget, Host};
use crate::source::SourceState;
use crate::style::Style;

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Save,
    Restore,
    Translate(Vec2),
    ClipRect(Rect),
    ClipPath(BezPath),
    FillRect(Rect, Color, BlendMode),
    FillRectMasked(Rect, Color, BlendMode),
    PushOpacity(Rect, f32),
    PopOpacity,
    CreateLayer(u32, PixelSize),
    ReleaseLayer(u32),
    BeginRecord(u32),
    EndRecord(u32),
    /// Layer, whether an effect was attached, alpha.
    DrawLayer(u32, bool, f32),
    DrawContent,
}

/// Records every call; layers are plain counters.
#[derive(Debug, Default)]
pub(crate) struct RecordingTarget {
    pub(crate) ops: Vec<Op>,
    pub(crate) effects: Vec<RenderEffect>,
    /// Source region drawn as part of the node's own content.
    pub(crate) nested_source: Option<Rc<SourceState<u32>>>,
    pub(crate) next_layer: u32,
    pub(crate) live: Vec<u32>,
}

impl RecordingTarget {
    pub(crate) fn live_layers(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl DrawTarget for RecordingTarget {
    type Layer = u32;

    fn save(&mut self) {
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.ops.push(Op::Translate(offset));
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ops.push(Op::ClipRect(rect));
    }

    fn clip_path(&mut self, path: &BezPath) {
        self.ops.push(Op::ClipPath(path.clone()));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, blend_mode: BlendMode) {
        self.ops.push(Op::FillRect(rect, color, blend_mode));
    }

    fn fill_rect_masked(&mut self, rect: Rect, _: &Brush, color: Color, blend_mode: BlendMode) {
        self.ops.push(Op::FillRectMasked(rect, color, blend_mode));
    }

    fn push_opacity_layer(&mut self, bounds: Rect, alpha: f32) {
        self.ops.push(Op::PushOpacity(bounds, alpha));
    }

    fn pop_opacity_layer(&mut self) {
        self.ops.push(Op::PopOpacity);
    }

    fn create_layer(&mut self, size: PixelSize) -> u32 {
        let layer = self.next_layer;
        self.next_layer += 1;
        self.live.push(layer);
        self.ops.push(Op::CreateLayer(layer, size));
        layer
    }

    fn release_layer(&mut self, layer: u32) {
        self.live.retain(|&l| l != layer);
        self.ops.push(Op::ReleaseLayer(layer));
    }

    fn record(&mut self, layer: u32, draw: &mut dyn FnMut(&mut Self)) {
        self.ops.push(Op::BeginRecord(layer));
        draw(self);
        self.ops.push(Op::EndRecord(layer));
    }

    fn draw_layer(&mut self, layer: u32, effect: Option<&RenderEffect>, alpha: f32) {
        if let Some(effect) = effect {
            self.effects.push(effect.clone());
        }
        self.ops.push(Op::DrawLayer(layer, effect.is_some(), alpha));
    }

    fn draw_content(&mut self) {
        self.ops.push(Op::DrawContent);
        if let Some(source) = &self.nested_source {
            source.draw_content(|| ());
        }
    }
}

/// A host without a reactive runtime.
#[derive(Debug)]
pub(crate) struct TestHost {
    pub(crate) density: f64,
    pub(crate) ambient: Style,
    pub(crate) redraws: u32,
    pub(crate) reads: u32,
}

impl Default for TestHost {
    fn default() -> Self {
        Self {
            density: 1.0,
            ambient: Style::UNSPECIFIED,
            redraws: 0,
            reads: 0,
        }
    }
}

impl Host for TestHost {
    fn density(&self) -> f64 {
        self.density
    }

    fn ambient_style(&self) -> Style {
        self.ambient.clone()
    }

    fn observe_reads(&mut self, reads: &mut dyn FnMut(&Self)) {
        self.reads += 1;
        reads(self);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}
