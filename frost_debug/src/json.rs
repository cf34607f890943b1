// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace export as JSON for `chrome://tracing` and Perfetto.
//!
//! Frost events carry no clock, so [`export`] lays them out by sequence
//! number: the `n`th recorded event gets `ts = n` microseconds. Each node
//! gets its own thread track (`tid` is the [`NodeId`](frost_core::id::NodeId))
//! and every event becomes a thread-scoped instant event.
//!
//! The format is described in the [Trace Event Format][format] document.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Decodes `bytes` from a [`RecorderSink`](crate::recorder::RecorderSink)
/// and writes them to `writer` as a pretty-printed JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for (seq, recorded) in decode(bytes).enumerate() {
        let (name, cat, node, args) = match recorded {
            RecordedEvent::Lifecycle(e) => (
                format!("{:?}", e.kind),
                "Lifecycle",
                e.node,
                json!({}),
            ),
            RecordedEvent::Placement(e) => (
                "Placement".to_owned(),
                "Layout",
                e.node,
                json!({
                    "x": e.position_in_content.x,
                    "y": e.position_in_content.y,
                    "width": e.content_size.width,
                    "height": e.content_size.height,
                    "layer_width": e.layer_size.width,
                    "layer_height": e.layer_size.height,
                    "blur_radius_px": e.blur_radius_px,
                }),
            ),
            RecordedEvent::Invalidate(e) => (
                "Invalidate".to_owned(),
                "Update",
                e.node,
                json!({
                    "dirty": format!("{:?}", e.dirty),
                }),
            ),
            RecordedEvent::Draw(e) => (
                "Draw".to_owned(),
                "Draw",
                e.node,
                json!({
                    "path": format!("{:?}", e.path),
                    "dirty": format!("{:?}", e.dirty),
                    "effects_built": e.effects_built,
                    "bands": e.bands,
                }),
            ),
            RecordedEvent::BandsCount { node, count } => (
                "Bands".to_owned(),
                "Rich",
                node,
                json!({
                    "count": count,
                }),
            ),
        };
        events.push(json!({
            "ph": "i",
            "name": name,
            "cat": cat,
            "ts": seq,
            "pid": 0,
            "tid": node.0,
            "s": "t",
            "args": args,
        }));
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use frost_core::compositor::DrawPath;
    use frost_core::dirty::DirtyFlags;
    use frost_core::id::NodeId;
    use frost_core::trace::{DrawEvent, LifecycleEvent, LifecycleKind, TraceSink};

    use super::*;
    use crate::recorder::RecorderSink;

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_lifecycle(&LifecycleEvent {
            node: NodeId(5),
            kind: LifecycleKind::Attach,
        });
        rec.on_draw(&DrawEvent {
            node: NodeId(5),
            path: DrawPath::Layer,
            dirty: DirtyFlags::RENDER_EFFECT,
            effects_built: 1,
            bands: 0,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["name"], "Attach");
        assert_eq!(parsed[0]["tid"], 5);
        assert_eq!(parsed[1]["name"], "Draw");
        assert_eq!(parsed[1]["ts"], 1);
        assert_eq!(parsed[1]["args"]["path"], "Layer");
        assert_eq!(parsed[1]["args"]["dirty"], "DirtyFlags(RENDER_EFFECT)");
        assert_eq!(parsed[1]["args"]["effects_built"], 1);
    }

    #[test]
    fn empty_recording_exports_empty_array() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(std::str::from_utf8(&out).unwrap()).unwrap();
        assert!(parsed.is_empty());
    }
}
