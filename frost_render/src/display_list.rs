// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display list: an ordered record of draw calls for one frame.

use frost_core::brush::Brush;
use frost_core::color::{BlendMode, Color};
use frost_core::compositor::Capabilities;
use frost_core::effect::RenderEffect;
use frost_core::geometry::PixelSize;
use frost_core::host::DrawTarget;
use kurbo::{BezPath, Rect, Vec2};
use slotmap::{SecondaryMap, SlotMap};

use crate::resource::LayerKey;

/// A single recorded draw call.
///
/// Ops between [`BeginRecord`](Self::BeginRecord) and the matching
/// [`EndRecord`](Self::EndRecord) were drawn into that layer.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Push transform and clip.
    Save,
    /// Pop transform and clip.
    Restore,
    /// Move the origin.
    Translate(Vec2),
    /// Intersect the clip with a rectangle.
    ClipRect(Rect),
    /// Intersect the clip with a path.
    ClipPath(BezPath),
    /// Fill a rectangle.
    FillRect {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: Color,
        /// Blend mode.
        blend_mode: BlendMode,
    },
    /// Fill a rectangle with coverage from a brush's alpha.
    FillRectMasked {
        /// Area to fill.
        rect: Rect,
        /// Coverage brush.
        mask: Brush,
        /// Fill color.
        color: Color,
        /// Blend mode.
        blend_mode: BlendMode,
    },
    /// Start an opacity group.
    PushOpacityLayer {
        /// Group bounds.
        bounds: Rect,
        /// Group alpha.
        alpha: f32,
    },
    /// End an opacity group.
    PopOpacityLayer,
    /// Allocate a layer.
    CreateLayer {
        /// Handle issued for the layer.
        layer: LayerKey,
        /// Size in pixels.
        size: PixelSize,
    },
    /// Free a layer.
    ReleaseLayer(LayerKey),
    /// Start drawing into a layer.
    BeginRecord(LayerKey),
    /// Stop drawing into a layer.
    EndRecord(LayerKey),
    /// Draw a layer through an optional effect.
    DrawLayer {
        /// Layer drawn.
        layer: LayerKey,
        /// Effect applied while drawing.
        effect: Option<RenderEffect>,
        /// Uniform alpha.
        alpha: f32,
    },
    /// Draw the node's own content.
    DrawContent,
}

/// A [`DrawTarget`] that records every call as a [`DrawOp`].
///
/// Lists can be inspected directly or [replayed](Self::replay) onto another
/// target.
#[derive(Debug, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
    layers: SlotMap<LayerKey, PixelSize>,
}

impl DisplayList {
    /// What this target supports.
    pub const CAPABILITIES: Capabilities = Capabilities::FULL;

    /// Creates an empty display list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded ops in call order.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of recorded ops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Layers created and not yet released.
    #[must_use]
    pub fn live_layers(&self) -> usize {
        self.layers.len()
    }

    /// Number of ops matching `pred`.
    #[must_use]
    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Clears the list for reuse. Live layers are forgotten.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.layers.clear();
    }

    /// Issues every recorded op against `target`.
    ///
    /// Layers are created on `target` as the list created them. Ops naming a
    /// layer the list never created are skipped, along with everything
    /// recorded into such a layer.
    pub fn replay<T: DrawTarget + ?Sized>(&self, target: &mut T) {
        let mut layers = SecondaryMap::new();
        let mut cursor = 0;
        replay_ops(&self.ops, &mut cursor, target, &mut layers);
    }
}

fn replay_ops<T: DrawTarget + ?Sized>(
    ops: &[DrawOp],
    cursor: &mut usize,
    target: &mut T,
    layers: &mut SecondaryMap<LayerKey, T::Layer>,
) {
    while let Some(op) = ops.get(*cursor) {
        *cursor += 1;
        match op {
            DrawOp::Save => target.save(),
            DrawOp::Restore => target.restore(),
            DrawOp::Translate(offset) => target.translate(*offset),
            DrawOp::ClipRect(rect) => target.clip_rect(*rect),
            DrawOp::ClipPath(path) => target.clip_path(path),
            DrawOp::FillRect {
                rect,
                color,
                blend_mode,
            } => target.fill_rect(*rect, *color, *blend_mode),
            DrawOp::FillRectMasked {
                rect,
                mask,
                color,
                blend_mode,
            } => target.fill_rect_masked(*rect, mask, *color, *blend_mode),
            DrawOp::PushOpacityLayer { bounds, alpha } => {
                target.push_opacity_layer(*bounds, *alpha);
            }
            DrawOp::PopOpacityLayer => target.pop_opacity_layer(),
            DrawOp::CreateLayer { layer, size } => {
                let created = target.create_layer(*size);
                layers.insert(*layer, created);
            }
            DrawOp::ReleaseLayer(layer) => {
                if let Some(layer) = layers.remove(*layer) {
                    target.release_layer(layer);
                }
            }
            DrawOp::BeginRecord(layer) => match layers.get(*layer).copied() {
                Some(mapped) => {
                    target.record(mapped, &mut |t: &mut T| replay_ops(ops, cursor, t, layers));
                }
                None => skip_record(ops, cursor),
            },
            DrawOp::EndRecord(_) => return,
            DrawOp::DrawLayer {
                layer,
                effect,
                alpha,
            } => {
                if let Some(&mapped) = layers.get(*layer) {
                    target.draw_layer(mapped, effect.as_ref(), *alpha);
                }
            }
            DrawOp::DrawContent => target.draw_content(),
        }
    }
}

/// Advances past the `EndRecord` matching an already consumed `BeginRecord`.
fn skip_record(ops: &[DrawOp], cursor: &mut usize) {
    let mut depth = 1_usize;
    while let Some(op) = ops.get(*cursor) {
        *cursor += 1;
        match op {
            DrawOp::BeginRecord(_) => depth += 1,
            DrawOp::EndRecord(_) => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

impl DrawTarget for DisplayList {
    type Layer = LayerKey;

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.ops.push(DrawOp::Translate(offset));
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::ClipRect(rect));
    }

    fn clip_path(&mut self, path: &BezPath) {
        self.ops.push(DrawOp::ClipPath(path.clone()));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, blend_mode: BlendMode) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color,
            blend_mode,
        });
    }

    fn fill_rect_masked(&mut self, rect: Rect, mask: &Brush, color: Color, blend_mode: BlendMode) {
        self.ops.push(DrawOp::FillRectMasked {
            rect,
            mask: mask.clone(),
            color,
            blend_mode,
        });
    }

    fn push_opacity_layer(&mut self, bounds: Rect, alpha: f32) {
        self.ops.push(DrawOp::PushOpacityLayer { bounds, alpha });
    }

    fn pop_opacity_layer(&mut self) {
        self.ops.push(DrawOp::PopOpacityLayer);
    }

    fn create_layer(&mut self, size: PixelSize) -> LayerKey {
        let layer = self.layers.insert(size);
        self.ops.push(DrawOp::CreateLayer { layer, size });
        layer
    }

    fn release_layer(&mut self, layer: LayerKey) {
        self.layers.remove(layer);
        self.ops.push(DrawOp::ReleaseLayer(layer));
    }

    fn record(&mut self, layer: LayerKey, draw: &mut dyn FnMut(&mut Self)) {
        self.ops.push(DrawOp::BeginRecord(layer));
        draw(self);
        self.ops.push(DrawOp::EndRecord(layer));
    }

    fn draw_layer(&mut self, layer: LayerKey, effect: Option<&RenderEffect>, alpha: f32) {
        self.ops.push(DrawOp::DrawLayer {
            layer,
            effect: effect.cloned(),
            alpha,
        });
    }

    fn draw_content(&mut self) {
        self.ops.push(DrawOp::DrawContent);
    }
}

#[cfg(test)]
mod tests {
    use frost_core::compositor::LayerCompositor;
    use frost_core::config::EffectConfig;
    use frost_core::geometry::{Dp, Placement};
    use frost_core::id::NodeId;
    use frost_core::node::ChildEffectNode;
    use frost_core::source::SourceState;
    use frost_core::style::Tint;
    use kurbo::{Point, Size};

    use super::*;
    use crate::cpu::CpuTarget;
    use crate::testing::{FixedHost, texel};

    /// Draws a two-tone backdrop and one glass node over it.
    fn scene<T: DrawTarget>(target: &mut T) {
        let backdrop = target.create_layer(PixelSize::new(60, 40));
        target.record(backdrop, &mut |t: &mut T| {
            t.fill_rect(Rect::new(0.0, 0.0, 30.0, 40.0), Color::BLACK, BlendMode::SourceOver);
            t.fill_rect(Rect::new(30.0, 0.0, 60.0, 40.0), Color::WHITE, BlendMode::SourceOver);
        });
        target.draw_layer(backdrop, None, 1.0);
        let mut source = SourceState::new(Point::ZERO);
        source.set_content_layer(Some(backdrop));

        let mut host = FixedHost;
        let mut node = ChildEffectNode::new(NodeId(9), LayerCompositor::new()).with_config(
            EffectConfig {
                blur_radius: Some(Dp(3.0)),
                background_color: Some(Color::WHITE),
                tints: vec![Tint::new(Color::new(0.0, 0.0, 1.0, 0.2))],
                ..EffectConfig::default()
            },
        );
        node.attach(&mut host);
        node.on_placement_changed(
            &mut host,
            &source,
            Placement::new(Point::new(10.0, 10.0), Size::new(40.0, 20.0)),
        );
        target.save();
        target.translate(Vec2::new(10.0, 10.0));
        node.draw(&mut host, &source, target);
        target.restore();
    }

    #[test]
    fn records_the_layer_composite() {
        let mut list = DisplayList::new();
        scene(&mut list);

        assert_eq!(list.live_layers(), 1, "scratch layer released");
        assert_eq!(list.count(|op| matches!(op, DrawOp::CreateLayer { .. })), 2);
        assert_eq!(list.count(|op| matches!(op, DrawOp::BeginRecord(_))), 2);
        let scratch = list.ops().iter().find_map(|op| match op {
            DrawOp::CreateLayer { layer, size } if *size == PixelSize::new(46, 26) => Some(*layer),
            _ => None,
        });
        let Some(scratch) = scratch else {
            panic!("no scratch layer in {:?}", list.ops());
        };
        let effect = list.ops().iter().find_map(|op| match op {
            DrawOp::DrawLayer {
                layer,
                effect: Some(effect),
                ..
            } if *layer == scratch => Some(effect),
            _ => None,
        });
        assert_eq!(effect.map(RenderEffect::blur_radius_px), Some(3.0));
        assert_eq!(list.ops().last(), Some(&DrawOp::Restore));
    }

    #[test]
    fn replay_matches_direct_drawing() {
        let mut direct = CpuTarget::new(60, 40);
        scene(&mut direct);
        let expected = direct.canvas().data().to_vec();

        let mut list = DisplayList::new();
        scene(&mut list);
        let mut replayed = CpuTarget::new(60, 40);
        list.replay(&mut replayed);

        assert_eq!(replayed.canvas().data(), expected.as_slice());
        assert_eq!(replayed.live_layers(), 1);
    }

    #[test]
    fn replay_skips_unknown_layers() {
        let mut list = DisplayList::new();
        let foreign = LayerKey::default();
        list.record(foreign, &mut |l: &mut DisplayList| {
            l.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE, BlendMode::SourceOver);
        });
        list.draw_layer(foreign, None, 1.0);
        list.fill_rect(Rect::new(1.0, 0.0, 2.0, 1.0), Color::BLACK, BlendMode::SourceOver);

        let mut target = CpuTarget::new(2, 1);
        list.replay(&mut target);
        assert_eq!(texel(target.canvas(), 0, 0), [0.0; 4]);
        assert_eq!(texel(target.canvas(), 1, 0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut list = DisplayList::new();
        let layer = list.create_layer(PixelSize::new(1, 1));
        list.draw_layer(layer, None, 1.0);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.live_layers(), 0);
    }
}
