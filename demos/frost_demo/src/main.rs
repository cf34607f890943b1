// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders a striped backdrop with two frosted panels on the CPU target.
//!
//! A uniform glass header sits at the top and a progressive blur fades in
//! along the bottom. The demo draws three frames, scrolling the backdrop
//! between them, and writes:
//!
//! - `frost.png` (or the path given as the first argument),
//! - `trace.json`, a Chrome trace of every node event,
//!
//! while printing the same events to stdout through a
//! [`PrettyPrintSink`](frost_debug::pretty::PrettyPrintSink).

use std::fs::File;
use std::io::BufWriter;

use frost_core::color::{BlendMode, Color};
use frost_core::compositor::Compositor;
use frost_core::config::EffectConfig;
use frost_core::geometry::{Dp, Placement, PixelSize};
use frost_core::host::{DrawTarget, Host};
use frost_core::id::NodeId;
use frost_core::node::ChildEffectNode;
use frost_core::progressive::{Easing, Progressive};
use frost_core::source::SourceState;
use frost_core::style::{Style, Tint};
use frost_core::trace::{
    BandSample, DrawEvent, InvalidateEvent, LifecycleEvent, PlacementEvent, TraceSink, Tracer,
};
use frost_debug::pretty::PrettyPrintSink;
use frost_debug::recorder::RecorderSink;
use frost_render::{CpuTarget, LayerKey};
use kurbo::{Point, Rect, Size, Vec2};

const WIDTH: u16 = 320;
const HEIGHT: u16 = 240;
const FRAME_COUNT: u32 = 3;
const SCROLL_PER_FRAME: f64 = 12.0;
/// Dark bars as `(left, top, bottom)`, each 40 wide.
const BARS: [(f64, f64, f64); 3] = [
    (40.0, 20.0, 200.0),
    (140.0, 80.0, 170.0),
    (240.0, 140.0, 210.0),
];

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Forwards every event to both sinks.
#[derive(Debug)]
struct Sinks {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Sinks {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.pretty.on_lifecycle(e);
        self.recorder.on_lifecycle(e);
    }

    fn on_placement(&mut self, e: &PlacementEvent) {
        self.pretty.on_placement(e);
        self.recorder.on_placement(e);
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        self.pretty.on_invalidate(e);
        self.recorder.on_invalidate(e);
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        self.pretty.on_draw(e);
        self.recorder.on_draw(e);
    }

    fn on_bands(&mut self, node: NodeId, bands: &[BandSample]) {
        self.pretty.on_bands(node, bands);
        self.recorder.on_bands(node, bands);
    }
}

#[derive(Debug)]
struct DemoHost {
    ambient: Style,
    sinks: Sinks,
    redraws: u32,
}

impl Host for DemoHost {
    fn density(&self) -> f64 {
        1.0
    }

    fn ambient_style(&self) -> Style {
        self.ambient.clone()
    }

    fn observe_reads(&mut self, reads: &mut dyn FnMut(&Self)) {
        reads(self);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn tracer(&mut self) -> Tracer<'_> {
        Tracer::new(&mut self.sinks)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Records horizontal color stripes and a few dark bars into a new layer, shifted up by `scroll`.
fn record_backdrop(target: &mut CpuTarget, scroll: f64) -> LayerKey {
    let palette = [
        Color::from_rgb8(0xe6, 0x39, 0x46),
        Color::from_rgb8(0xf1, 0xfa, 0xee),
        Color::from_rgb8(0x45, 0x7b, 0x9d),
        Color::from_rgb8(0x1d, 0x35, 0x57),
    ];
    let layer = target.create_layer(PixelSize::new(WIDTH.into(), HEIGHT.into()));
    target.record(layer, &mut |t: &mut CpuTarget| {
        let stripe = 24.0;
        let mut y = -(scroll % (stripe * 4.0));
        for color in palette.iter().cycle() {
            if y >= f64::from(HEIGHT) {
                break;
            }
            t.fill_rect(
                Rect::new(0.0, y, f64::from(WIDTH), y + stripe),
                *color,
                BlendMode::SourceOver,
            );
            y += stripe;
        }
        for (x, top, bottom) in BARS {
            t.fill_rect(
                Rect::new(x, top, x + 40.0, bottom),
                Color::BLACK.with_alpha(0.6),
                BlendMode::SourceOver,
            );
        }
    });
    layer
}

fn header() -> ChildEffectNode {
    ChildEffectNode::new(NodeId(1), Compositor::for_capabilities(CpuTarget::CAPABILITIES))
        .with_config(EffectConfig {
            blur_radius: Some(Dp(8.0)),
            tints: vec![Tint::new(Color::WHITE.with_alpha(0.35))],
            noise_factor: Some(0.1),
            ..EffectConfig::default()
        })
}

fn footer() -> ChildEffectNode {
    ChildEffectNode::new(NodeId(2), Compositor::for_capabilities(CpuTarget::CAPABILITIES))
        .with_config(EffectConfig {
            blur_radius: Some(Dp(12.0)),
            progressive: Some(Progressive::vertical_gradient(
                Easing::EaseIn,
                0.0,
                0.0,
                f64::INFINITY,
                1.0,
            )),
            ..EffectConfig::default()
        })
}

fn main() {
    let out_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "frost.png".to_owned());

    let mut host = DemoHost {
        ambient: Style::from_background(Color::from_rgb8(0x1d, 0x35, 0x57)),
        sinks: Sinks {
            pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
            recorder: RecorderSink::new(),
        },
        redraws: 0,
    };
    let mut target = CpuTarget::new(WIDTH, HEIGHT);
    target.set_content(|t| {
        t.fill_rect(
            Rect::new(8.0, 8.0, 24.0, 24.0),
            Color::WHITE,
            BlendMode::SourceOver,
        );
    });

    let mut source = SourceState::new(Point::ZERO);
    let mut nodes = [
        (header(), Placement::new(Point::ZERO, Size::new(f64::from(WIDTH), 48.0))),
        (
            footer(),
            Placement::new(Point::new(0.0, 160.0), Size::new(f64::from(WIDTH), 80.0)),
        ),
    ];
    for (node, placement) in &mut nodes {
        node.attach(&mut host);
        node.on_placement_changed(&mut host, &source, *placement);
    }

    for frame in 0..FRAME_COUNT {
        let backdrop = record_backdrop(&mut target, SCROLL_PER_FRAME * f64::from(frame));
        source.draw_content(|| target.draw_layer(backdrop, None, 1.0));
        source.set_content_layer(Some(backdrop));

        for (node, placement) in &mut nodes {
            target.save();
            target.translate(placement.position_in_window.to_vec2());
            node.draw(&mut host, &source, &mut target);
            target.restore();
        }

        target.release_layer(backdrop);
        source.set_content_layer(None);

        // The header slides down a little, moving it over fresh backdrop.
        let (node, placement) = &mut nodes[0];
        placement.position_in_window += Vec2::new(0.0, 4.0);
        node.on_placement_changed(&mut host, &source, *placement);
    }

    for (node, _) in &mut nodes {
        node.detach(&mut host);
    }

    let png = target
        .into_canvas()
        .into_png()
        .expect("failed to encode the image");
    std::fs::write(&out_path, png).expect("failed to write the image");

    let file = File::create("trace.json").expect("failed to create trace.json");
    frost_debug::json::export(host.sinks.recorder.as_bytes(), &mut BufWriter::new(file))
        .expect("failed to write the Chrome trace");

    println!(
        "Wrote {out_path} and trace.json ({FRAME_COUNT} frames, {} redraw requests)",
        host.redraws
    );
}
