// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A software [`DrawTarget`] built on `vello_cpu`.
//!
//! Fills, clips, opacity groups and blend modes are recorded into one
//! `vello_cpu` render context per surface. Offscreen layers are rendered to
//! pixmaps when their recording ends; effect stages run on a copy of that
//! pixmap, which is then drawn back as an image paint at a whole-pixel
//! offset.

use core::fmt;

use frost_core::brush::Brush;
use frost_core::color::{BlendMode, Color};
use frost_core::compositor::Capabilities;
use frost_core::effect::RenderEffect;
use frost_core::geometry::PixelSize;
use frost_core::host::DrawTarget;
use kurbo::{BezPath, Rect, Shape, Vec2};
use slotmap::SlotMap;
use vello_cpu::{PaintType, Pixmap, RenderContext};

use crate::convert;
use crate::filter::{apply_effect, pixel_center};
use crate::resource::LayerKey;

/// Paints a node's own content.
pub type ContentPainter = Box<dyn FnMut(&mut CpuTarget)>;

/// A layer pushed onto a surface's render context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pushed {
    Clip,
    Opacity,
}

#[derive(Clone, Copy, Debug)]
struct Saved {
    offset: Vec2,
    depth: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SurfaceKind {
    Canvas,
    Layer(LayerKey),
}

/// A render context and the transform and clip stack drawn through it.
struct Surface {
    kind: SurfaceKind,
    width: u16,
    height: u16,
    ctx: RenderContext,
    offset: Vec2,
    pushed: Vec<Pushed>,
    saved: Vec<Saved>,
}

impl Surface {
    fn new(kind: SurfaceKind, width: u16, height: u16) -> Self {
        Self {
            kind,
            width,
            height,
            ctx: RenderContext::new(width.max(1), height.max(1)),
            offset: Vec2::ZERO,
            pushed: Vec::new(),
            saved: Vec::new(),
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Fills `rect`, given in surface pixels offset by `at`.
    fn fill(&mut self, at: Vec2, rect: Rect, paint: impl Into<PaintType>, blend_mode: BlendMode) {
        self.ctx.set_transform(convert::translate(at));
        self.ctx.set_blend_mode(convert::blend_mode(blend_mode));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&convert::rect(rect));
    }

    fn push_clip(&mut self, path: &BezPath) {
        self.ctx.set_transform(convert::translate(self.offset));
        self.ctx.push_clip_layer(&convert::path(path));
        self.pushed.push(Pushed::Clip);
    }

    /// Draws `pixmap` with its top-left corner at `at`.
    fn draw_image(&mut self, pixmap: Pixmap, at: Vec2, alpha: f32) {
        let bounds = Rect::new(0.0, 0.0, f64::from(pixmap.width()), f64::from(pixmap.height()));
        if bounds.is_zero_area() || alpha <= 0.0 {
            return;
        }
        let grouped = alpha < 1.0;
        if grouped {
            self.ctx.push_opacity_layer(alpha);
        }
        self.fill(at, bounds, convert::image(pixmap), BlendMode::SourceOver);
        if grouped {
            self.ctx.pop_layer();
        }
    }

    fn pop_to(&mut self, depth: usize) {
        while self.pushed.len() > depth {
            self.pushed.pop();
            self.ctx.pop_layer();
        }
    }

    /// Closes any open layers and renders everything drawn so far.
    fn render(&mut self) -> Pixmap {
        self.pop_to(0);
        self.saved.clear();
        let mut pixmap = Pixmap::new(self.width, self.height);
        if self.width > 0 && self.height > 0 {
            self.ctx.flush();
            self.ctx.render_to_pixmap(&mut pixmap);
        }
        pixmap
    }
}

/// Software reference draw target.
///
/// Offscreen layers live in a slot map; [`LayerKey`]s of released layers are
/// ignored rather than aliasing newer layers.
pub struct CpuTarget {
    root: Surface,
    nested: Vec<Surface>,
    canvas: Pixmap,
    layers: SlotMap<LayerKey, Pixmap>,
    content: Option<ContentPainter>,
}

impl fmt::Debug for CpuTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuTarget")
            .field("width", &self.root.width)
            .field("height", &self.root.height)
            .field("nested", &self.nested.len())
            .field("live_layers", &self.layers.len())
            .field("has_content", &self.content.is_some())
            .finish_non_exhaustive()
    }
}

impl CpuTarget {
    /// What this target supports.
    pub const CAPABILITIES: Capabilities = Capabilities::FULL;

    /// Creates a target with a transparent canvas.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            root: Surface::new(SurfaceKind::Canvas, width, height),
            nested: Vec::new(),
            canvas: Pixmap::new(width, height),
            layers: SlotMap::with_key(),
            content: None,
        }
    }

    /// Installs the painter run by [`DrawTarget::draw_content`].
    pub fn set_content(&mut self, painter: impl FnMut(&mut Self) + 'static) {
        self.content = Some(Box::new(painter));
    }

    /// Removes the content painter.
    pub fn clear_content(&mut self) {
        self.content = None;
    }

    /// Renders everything drawn onto the canvas so far.
    ///
    /// Any clip or group still open on the canvas is closed first.
    pub fn canvas(&mut self) -> &Pixmap {
        self.canvas = self.root.render();
        &self.canvas
    }

    /// Consumes the target, returning the rendered canvas.
    #[must_use]
    pub fn into_canvas(mut self) -> Pixmap {
        self.root.render()
    }

    /// Contents of a live layer.
    #[must_use]
    pub fn layer(&self, layer: LayerKey) -> Option<&Pixmap> {
        self.layers.get(layer)
    }

    /// Number of layers allocated and not yet released.
    #[must_use]
    pub fn live_layers(&self) -> usize {
        self.layers.len()
    }

    fn top(&mut self) -> &mut Surface {
        match self.nested.last_mut() {
            Some(surface) => surface,
            None => &mut self.root,
        }
    }
}

impl DrawTarget for CpuTarget {
    type Layer = LayerKey;

    fn save(&mut self) {
        let surface = self.top();
        let saved = Saved {
            offset: surface.offset,
            depth: surface.pushed.len(),
        };
        surface.saved.push(saved);
    }

    fn restore(&mut self) {
        let surface = self.top();
        let restored = surface.saved.pop();
        debug_assert!(restored.is_some(), "restore without a matching save");
        if let Some(saved) = restored {
            surface.pop_to(saved.depth);
            surface.offset = saved.offset;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.top().offset += offset;
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.top().push_clip(&rect.to_path(0.1));
    }

    fn clip_path(&mut self, path: &BezPath) {
        self.top().push_clip(path);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, blend_mode: BlendMode) {
        let surface = self.top();
        let at = surface.offset;
        surface.fill(at, rect, convert::color(color), blend_mode);
    }

    fn fill_rect_masked(&mut self, rect: Rect, mask: &Brush, color: Color, blend_mode: BlendMode) {
        let surface = self.top();
        let offset = surface.offset;
        let area = (rect + offset).intersect(surface.bounds()).expand();
        if area.is_zero_area() {
            return;
        }
        let size = PixelSize::round(area.size());
        let (width, height) = (convert::dimension(size.width), convert::dimension(size.height));
        let origin = area.origin().to_vec2();
        let src = color.premultiply();
        let mut coverage = Vec::with_capacity(usize::from(width) * usize::from(height));
        for y in 0..usize::from(height) {
            for x in 0..usize::from(width) {
                let alpha = mask.alpha_at(pixel_center(x, y) + origin - offset);
                coverage.push(convert::premul8(src.map(|c| c * alpha.clamp(0.0, 1.0))));
            }
        }
        let paint = convert::image(Pixmap::from_parts(coverage, width, height));
        surface.fill(origin, rect + offset - origin, paint, blend_mode);
    }

    fn push_opacity_layer(&mut self, _bounds: Rect, alpha: f32) {
        let surface = self.top();
        surface.ctx.push_opacity_layer(alpha.clamp(0.0, 1.0));
        surface.pushed.push(Pushed::Opacity);
    }

    /// # Panics
    ///
    /// Panics if the innermost open layer is not an opacity group.
    fn pop_opacity_layer(&mut self) {
        let surface = self.top();
        if surface.pushed.last() != Some(&Pushed::Opacity) {
            panic!("pop_opacity_layer without a matching push_opacity_layer");
        }
        surface.pushed.pop();
        surface.ctx.pop_layer();
    }

    fn create_layer(&mut self, size: PixelSize) -> LayerKey {
        let pixmap = Pixmap::new(convert::dimension(size.width), convert::dimension(size.height));
        self.layers.insert(pixmap)
    }

    fn release_layer(&mut self, layer: LayerKey) {
        self.layers.remove(layer);
    }

    /// Drawing composites over what the layer already holds.
    ///
    /// # Panics
    ///
    /// Panics if `layer` has been released.
    fn record(&mut self, layer: LayerKey, draw: &mut dyn FnMut(&mut Self)) {
        let Some(existing) = self.layers.get(layer) else {
            panic!("recording into released layer {layer:?}");
        };
        let mut surface = Surface::new(SurfaceKind::Layer(layer), existing.width(), existing.height());
        if existing.data().iter().any(|p| p.a != 0) {
            surface.draw_image(existing.clone(), Vec2::ZERO, 1.0);
        }
        self.nested.push(surface);
        draw(self);
        match self.nested.pop() {
            Some(mut surface) if surface.kind == SurfaceKind::Layer(layer) => {
                let pixmap = surface.render();
                if let Some(slot) = self.layers.get_mut(layer) {
                    *slot = pixmap;
                }
            }
            _ => panic!("unbalanced surfaces while recording {layer:?}"),
        }
    }

    /// # Panics
    ///
    /// Panics if `layer` has been released.
    fn draw_layer(&mut self, layer: LayerKey, effect: Option<&RenderEffect>, alpha: f32) {
        let Some(pixmap) = self.layers.get(layer) else {
            panic!("drawing released layer {layer:?}");
        };
        let mut pixmap = pixmap.clone();
        if let Some(effect) = effect {
            apply_effect(&mut pixmap, effect);
        }
        let surface = self.top();
        let at = Vec2::new(surface.offset.x.round(), surface.offset.y.round());
        surface.draw_image(pixmap, at, alpha.clamp(0.0, 1.0));
    }

    fn draw_content(&mut self) {
        if let Some(mut painter) = self.content.take() {
            painter(self);
            self.content = Some(painter);
        }
    }
}

#[cfg(test)]
mod tests {
    use frost_core::compositor::{Compositor, DrawPath, LayerCompositor};
    use frost_core::config::EffectConfig;
    use frost_core::effect::{EffectParams, create_render_effect};
    use frost_core::geometry::{Dp, Placement};
    use frost_core::id::NodeId;
    use frost_core::node::ChildEffectNode;
    use frost_core::progressive::{Easing, Progressive};
    use frost_core::source::SourceState;
    use frost_core::style::Tint;
    use kurbo::{Circle, Point, Size};

    use super::*;
    use crate::testing::{FixedHost, close, texel};

    const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);

    fn pixel(target: &mut CpuTarget, x: u16, y: u16) -> [f32; 4] {
        texel(target.canvas(), x, y)
    }

    fn red(target: &mut CpuTarget, x: u16, y: u16) -> bool {
        pixel(target, x, y) == [1.0, 0.0, 0.0, 1.0]
    }

    #[test]
    fn fill_respects_translation_and_clip() {
        let mut target = CpuTarget::new(10, 10);
        target.save();
        target.translate(Vec2::new(2.0, 2.0));
        target.clip_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        target.fill_rect(Rect::new(-10.0, -10.0, 20.0, 20.0), RED, BlendMode::SourceOver);
        target.restore();

        assert!(red(&mut target, 2, 2) && red(&mut target, 5, 5));
        assert_eq!(pixel(&mut target, 1, 1), [0.0; 4]);
        assert_eq!(pixel(&mut target, 6, 6), [0.0; 4]);

        target.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), RED, BlendMode::SourceOver);
        assert!(red(&mut target, 0, 0), "restore must drop the clip");
    }

    #[test]
    fn path_clips_bound_the_fill() {
        let mut target = CpuTarget::new(20, 20);
        target.save();
        target.clip_path(&Circle::new((10.0, 10.0), 5.0).to_path(0.1));
        target.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), RED, BlendMode::SourceOver);
        target.restore();
        assert!(red(&mut target, 10, 10));
        assert_eq!(pixel(&mut target, 1, 1), [0.0; 4]);
        assert_eq!(pixel(&mut target, 10, 16), [0.0; 4]);
        let edge = pixel(&mut target, 14, 10)[3];
        assert!(edge > 0.0 && edge <= 1.0, "edge pixel is covered, got {edge}");
    }

    #[test]
    fn blend_modes_reach_the_canvas() {
        let mut target = CpuTarget::new(2, 1);
        let bounds = Rect::new(0.0, 0.0, 2.0, 1.0);
        target.fill_rect(bounds, Color::new(0.4, 0.4, 0.4, 1.0), BlendMode::SourceOver);
        target.fill_rect(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Color::new(0.5, 0.5, 0.5, 1.0),
            BlendMode::Multiply,
        );
        let multiplied = pixel(&mut target, 0, 0);
        assert!(close(multiplied, [0.2, 0.2, 0.2, 1.0]), "got {multiplied:?}");
        let untouched = pixel(&mut target, 1, 0);
        assert!(close(untouched, [0.4, 0.4, 0.4, 1.0]), "got {untouched:?}");
    }

    #[test]
    fn masked_fill_takes_coverage_from_the_brush() {
        let mut target = CpuTarget::new(1, 10);
        target.fill_rect_masked(
            Rect::new(0.0, 0.0, 1.0, 10.0),
            &Brush::vertical_fade(Color::BLACK, Color::TRANSPARENT, 10.0),
            Color::WHITE,
            BlendMode::SourceOver,
        );
        let top = pixel(&mut target, 0, 0)[3];
        let bottom = pixel(&mut target, 0, 9)[3];
        assert!((top - 0.95).abs() < 2.0 / 255.0, "got {top}");
        assert!((bottom - 0.05).abs() < 2.0 / 255.0, "got {bottom}");
    }

    #[test]
    fn opacity_groups_apply_alpha_once() {
        let mut target = CpuTarget::new(4, 4);
        let bounds = Rect::new(0.0, 0.0, 4.0, 4.0);
        target.fill_rect(bounds, Color::WHITE, BlendMode::SourceOver);
        target.push_opacity_layer(bounds, 0.5);
        target.fill_rect(bounds, Color::BLACK, BlendMode::SourceOver);
        target.fill_rect(bounds, Color::BLACK, BlendMode::SourceOver);
        target.pop_opacity_layer();
        let got = pixel(&mut target, 2, 2);
        assert!(close(got, [0.5, 0.5, 0.5, 1.0]), "got {got:?}");
    }

    #[test]
    #[should_panic(expected = "without a matching push_opacity_layer")]
    fn unbalanced_opacity_pop_panics() {
        CpuTarget::new(1, 1).pop_opacity_layer();
    }

    #[test]
    fn layers_record_draw_and_release() {
        let mut target = CpuTarget::new(5, 5);
        let layer = target.create_layer(PixelSize::new(3, 3));
        target.record(layer, &mut |t: &mut CpuTarget| {
            t.fill_rect(Rect::new(0.0, 0.0, 3.0, 3.0), RED, BlendMode::SourceOver);
        });
        target.translate(Vec2::new(1.0, 1.0));
        target.draw_layer(layer, None, 1.0);

        assert!(red(&mut target, 1, 1) && red(&mut target, 3, 3));
        assert_eq!(pixel(&mut target, 0, 0), [0.0; 4]);
        assert_eq!(pixel(&mut target, 4, 4), [0.0; 4]);

        target.release_layer(layer);
        target.release_layer(layer);
        assert_eq!(target.live_layers(), 0);
        let reused = target.create_layer(PixelSize::new(1, 1));
        assert_ne!(reused, layer);
        assert!(target.layer(layer).is_none());
        assert!(target.layer(reused).is_some());
    }

    #[test]
    fn recording_again_keeps_earlier_contents() {
        let mut target = CpuTarget::new(2, 1);
        let layer = target.create_layer(PixelSize::new(2, 1));
        target.record(layer, &mut |t: &mut CpuTarget| {
            t.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), RED, BlendMode::SourceOver);
        });
        target.record(layer, &mut |t: &mut CpuTarget| {
            t.fill_rect(Rect::new(1.0, 0.0, 2.0, 1.0), Color::WHITE, BlendMode::SourceOver);
        });
        let Some(contents) = target.layer(layer) else {
            panic!("layer released");
        };
        assert!(close(texel(contents, 0, 0), [1.0, 0.0, 0.0, 1.0]), "first pass kept");
        assert_eq!(texel(contents, 1, 0), [1.0; 4]);
    }

    #[test]
    fn layers_are_drawn_through_effects() {
        let mut target = CpuTarget::new(2, 2);
        let layer = target.create_layer(PixelSize::new(2, 2));
        target.record(layer, &mut |t: &mut CpuTarget| {
            t.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::WHITE, BlendMode::SourceOver);
        });
        let tints = [Tint::new(Color::BLACK.with_alpha(0.5))];
        let effect = create_render_effect(&EffectParams {
            blur_radius_px: 0.0,
            noise_factor: 0.0,
            tints: &tints,
            tint_alpha_modulate: 1.0,
            content_size: Size::new(2.0, 2.0),
            content_offset: Vec2::ZERO,
            layer_size: Size::new(2.0, 2.0),
            mask: None,
        });
        assert!(effect.is_some());
        target.draw_layer(layer, effect.as_ref(), 1.0);
        let got = pixel(&mut target, 0, 0);
        assert!(close(got, [0.5, 0.5, 0.5, 1.0]), "got {got:?}");
        assert_eq!(
            target.layer(layer).map(|p| texel(p, 0, 0)),
            Some([1.0; 4]),
            "effects must not modify the layer itself"
        );
    }

    /// A 200x200 backdrop, black on the left half and white on the right.
    fn backdrop(target: &mut CpuTarget) -> SourceState<LayerKey> {
        let layer = target.create_layer(PixelSize::new(200, 200));
        target.record(layer, &mut |t: &mut CpuTarget| {
            t.fill_rect(Rect::new(0.0, 0.0, 100.0, 200.0), Color::BLACK, BlendMode::SourceOver);
            t.fill_rect(Rect::new(100.0, 0.0, 200.0, 200.0), Color::WHITE, BlendMode::SourceOver);
        });
        target.draw_layer(layer, None, 1.0);
        let mut source = SourceState::new(Point::ZERO);
        source.set_content_layer(Some(layer));
        source
    }

    fn draw_node(
        target: &mut CpuTarget,
        compositor: Compositor,
        config: EffectConfig,
    ) -> frost_core::node::DrawReport {
        let source = backdrop(target);
        let mut host = FixedHost;
        let mut node = ChildEffectNode::new(NodeId(1), compositor).with_config(config);
        node.attach(&mut host);
        let placement = Placement::new(Point::new(50.0, 50.0), Size::new(100.0, 100.0));
        node.on_placement_changed(&mut host, &source, placement);

        target.save();
        target.translate(Vec2::new(50.0, 50.0));
        let report = node.draw(&mut host, &source, target);
        target.restore();
        report
    }

    fn gray(target: &mut CpuTarget, x: u16, y: u16) -> f32 {
        pixel(target, x, y)[0]
    }

    #[test]
    fn uniform_blur_softens_only_the_node_area() {
        let mut target = CpuTarget::new(200, 200);
        target.set_content(|t| {
            t.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), RED, BlendMode::SourceOver);
        });
        let config = EffectConfig {
            blur_radius: Some(Dp(10.0)),
            background_color: Some(Color::WHITE),
            ..EffectConfig::default()
        };
        let report = draw_node(
            &mut target,
            Compositor::for_capabilities(CpuTarget::CAPABILITIES),
            config,
        );
        assert_eq!(report.path, DrawPath::Layer);

        assert_eq!(gray(&mut target, 30, 100), 0.0, "outside the node stays sharp");
        assert_eq!(gray(&mut target, 170, 100), 1.0, "outside the node stays sharp");
        assert!(gray(&mut target, 55, 100) < 0.01, "far from the edge stays dark");
        assert!(gray(&mut target, 145, 100) > 0.99, "far from the edge stays light");
        for x in [98, 99, 100, 101] {
            let g = gray(&mut target, x, 100);
            assert!(g > 0.1 && g < 0.9, "edge at x={x} should be blurred, got {g}");
        }
        assert!(red(&mut target, 51, 51), "own content draws on top");
        assert_eq!(target.live_layers(), 1, "only the backdrop layer remains");
    }

    #[test]
    fn progressive_blur_grows_along_the_gradient() {
        let mut target = CpuTarget::new(200, 200);
        let config = EffectConfig {
            blur_radius: Some(Dp(10.0)),
            background_color: Some(Color::WHITE),
            progressive: Some(Progressive::vertical_gradient(
                Easing::Linear,
                0.0,
                0.0,
                f64::INFINITY,
                1.0,
            )),
            ..EffectConfig::default()
        };
        let report = draw_node(&mut target, LayerCompositor::new().into(), config);
        assert_eq!(report.path, DrawPath::Progressive);
        assert_eq!(report.bands, 10);

        let top = gray(&mut target, 96, 52);
        let bottom = gray(&mut target, 96, 147);
        assert!(top < 0.01, "top band is barely blurred, got {top}");
        assert!(bottom > 0.1, "bottom band is fully blurred, got {bottom}");
        assert_eq!(target.live_layers(), 1);
    }

    #[test]
    fn scrim_tints_without_layers() {
        let mut target = CpuTarget::new(200, 200);
        let config = EffectConfig {
            blur_radius: Some(Dp(0.0)),
            tints: vec![Tint::new(Color::BLACK.with_alpha(0.5))],
            ..EffectConfig::default()
        };
        let report = draw_node(
            &mut target,
            Compositor::for_capabilities(Capabilities::NONE),
            config,
        );
        assert_eq!(report.path, DrawPath::Scrim);
        let tinted = gray(&mut target, 145, 100);
        assert!((tinted - 0.5).abs() <= 1.0 / 255.0, "got {tinted}");
        assert_eq!(gray(&mut target, 160, 100), 1.0);
        assert_eq!(target.live_layers(), 1);
    }
}
