// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use frost_core::compositor::DrawPath;
use frost_core::id::NodeId;
use frost_core::trace::{
    BandSample, DrawEvent, InvalidateEvent, LifecycleEvent, LifecycleKind, PlacementEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn path_name(path: DrawPath) -> &'static str {
    match path {
        DrawPath::Unmodified => "unmodified",
        DrawPath::NoSource => "no-source",
        DrawPath::Layer => "layer",
        DrawPath::Progressive => "progressive",
        DrawPath::Scrim => "scrim",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let kind = match e.kind {
            LifecycleKind::Attach => "attach",
            LifecycleKind::Detach => "detach",
        };
        let _ = writeln!(self.writer, "[{kind}] node={}", e.node.0);
    }

    fn on_placement(&mut self, e: &PlacementEvent) {
        let _ = writeln!(
            self.writer,
            "[placement] node={} at=({:.1}, {:.1}) size={:.1}x{:.1} layer={:.1}x{:.1} blur={:.1}px",
            e.node.0,
            e.position_in_content.x,
            e.position_in_content.y,
            e.content_size.width,
            e.content_size.height,
            e.layer_size.width,
            e.layer_size.height,
            e.blur_radius_px,
        );
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        let _ = writeln!(self.writer, "[invalidate] node={} {:?}", e.node.0, e.dirty);
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        let _ = writeln!(
            self.writer,
            "[draw] node={} path={} built={} bands={} {:?}",
            e.node.0,
            path_name(e.path),
            e.effects_built,
            e.bands,
            e.dirty,
        );
    }

    fn on_bands(&mut self, node: NodeId, bands: &[BandSample]) {
        let _ = write!(self.writer, "[bands] node={} n={}", node.0, bands.len());
        for band in bands {
            let marker = if band.has_effect { "" } else { "!" };
            let _ = write!(self.writer, " {:.2}{marker}", band.intensity);
        }
        let _ = writeln!(self.writer);
    }
}

#[cfg(test)]
mod tests {
    use frost_core::dirty::DirtyFlags;
    use kurbo::{Point, Size};

    use super::*;

    fn output(f: impl FnOnce(&mut PrettyPrintSink<Vec<u8>>)) -> String {
        let mut sink = PrettyPrintSink::with_writer(Vec::new());
        f(&mut sink);
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn lifecycle_and_invalidate_lines() {
        let out = output(|sink| {
            sink.on_lifecycle(&LifecycleEvent {
                node: NodeId(3),
                kind: LifecycleKind::Attach,
            });
            sink.on_invalidate(&InvalidateEvent {
                node: NodeId(3),
                dirty: DirtyFlags::RENDER_EFFECT | DirtyFlags::POSITION,
            });
        });
        assert_eq!(
            out,
            "[attach] node=3\n[invalidate] node=3 DirtyFlags(RENDER_EFFECT | POSITION)\n"
        );
    }

    #[test]
    fn placement_line_has_geometry() {
        let out = output(|sink| {
            sink.on_placement(&PlacementEvent {
                node: NodeId(1),
                position_in_content: Point::new(50.0, 50.0),
                content_size: Size::new(100.0, 100.0),
                layer_size: Size::new(120.0, 120.0),
                blur_radius_px: 10.0,
            });
        });
        assert_eq!(
            out,
            "[placement] node=1 at=(50.0, 50.0) size=100.0x100.0 layer=120.0x120.0 blur=10.0px\n"
        );
    }

    #[test]
    fn draw_and_band_lines() {
        let out = output(|sink| {
            sink.on_draw(&DrawEvent {
                node: NodeId(2),
                path: DrawPath::Progressive,
                dirty: DirtyFlags::empty(),
                effects_built: 0,
                bands: 2,
            });
            sink.on_bands(
                NodeId(2),
                &[
                    BandSample {
                        intensity: 0.0,
                        has_effect: false,
                    },
                    BandSample {
                        intensity: 0.5,
                        has_effect: true,
                    },
                ],
            );
        });
        assert_eq!(
            out,
            "[draw] node=2 path=progressive built=0 bands=2 DirtyFlags(0x0)\n\
             [bands] node=2 n=2 0.00! 0.50\n"
        );
    }
}
