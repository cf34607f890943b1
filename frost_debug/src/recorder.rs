// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Band events ([`on_bands`](TraceSink::on_bands)) store only the count.

use frost_core::compositor::DrawPath;
use frost_core::dirty::DirtyFlags;
use frost_core::id::NodeId;
use frost_core::trace::{
    BandSample, DrawEvent, InvalidateEvent, LifecycleEvent, LifecycleKind, PlacementEvent,
    TraceSink,
};
use kurbo::{Point, Size};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LIFECYCLE: u8 = 1;
const TAG_PLACEMENT: u8 = 2;
const TAG_INVALIDATE: u8 = 3;
const TAG_DRAW: u8 = 4;
const TAG_BANDS_COUNT: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_bits().to_le_bytes());
    }

    fn write_point(&mut self, p: Point) {
        self.write_f64(p.x);
        self.write_f64(p.y);
    }

    fn write_size(&mut self, s: Size) {
        self.write_f64(s.width);
        self.write_f64(s.height);
    }

    fn write_path(&mut self, path: DrawPath) {
        self.write_u8(match path {
            DrawPath::Unmodified => 0,
            DrawPath::NoSource => 1,
            DrawPath::Layer => 2,
            DrawPath::Progressive => 3,
            DrawPath::Scrim => 4,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.write_u8(TAG_LIFECYCLE);
        self.write_u32(e.node.0);
        self.write_u8(match e.kind {
            LifecycleKind::Attach => 0,
            LifecycleKind::Detach => 1,
        });
    }

    fn on_placement(&mut self, e: &PlacementEvent) {
        self.write_u8(TAG_PLACEMENT);
        self.write_u32(e.node.0);
        self.write_point(e.position_in_content);
        self.write_size(e.content_size);
        self.write_size(e.layer_size);
        self.write_f64(e.blur_radius_px);
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        self.write_u8(TAG_INVALIDATE);
        self.write_u32(e.node.0);
        self.write_u8(e.dirty.bits());
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        self.write_u8(TAG_DRAW);
        self.write_u32(e.node.0);
        self.write_path(e.path);
        self.write_u8(e.dirty.bits());
        self.write_u32(e.effects_built);
        self.write_u32(e.bands);
    }

    fn on_bands(&mut self, node: NodeId, bands: &[BandSample]) {
        self.write_u8(TAG_BANDS_COUNT);
        self.write_u32(node.0);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "band count capped at u32::MAX for recording"
        )]
        self.write_u32(bands.len().min(u32::MAX as usize) as u32);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`LifecycleEvent`].
    Lifecycle(LifecycleEvent),
    /// A [`PlacementEvent`].
    Placement(PlacementEvent),
    /// An [`InvalidateEvent`].
    Invalidate(InvalidateEvent),
    /// A [`DrawEvent`].
    Draw(DrawEvent),
    /// Band count of a progressive draw.
    BandsCount {
        /// The node.
        node: NodeId,
        /// Number of bands.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(u64::from_le_bytes).map(f64::from_bits)
    }

    fn read_node(&mut self) -> Option<NodeId> {
        self.read_u32().map(NodeId)
    }

    fn read_point(&mut self) -> Option<Point> {
        Some(Point::new(self.read_f64()?, self.read_f64()?))
    }

    fn read_size(&mut self) -> Option<Size> {
        Some(Size::new(self.read_f64()?, self.read_f64()?))
    }

    fn read_dirty(&mut self) -> Option<DirtyFlags> {
        self.read_u8().map(DirtyFlags::from_bits_truncate)
    }

    fn read_path(&mut self) -> Option<DrawPath> {
        Some(match self.read_u8()? {
            0 => DrawPath::Unmodified,
            1 => DrawPath::NoSource,
            2 => DrawPath::Layer,
            3 => DrawPath::Progressive,
            _ => DrawPath::Scrim,
        })
    }

    fn decode_lifecycle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Lifecycle(LifecycleEvent {
            node: self.read_node()?,
            kind: match self.read_u8()? {
                0 => LifecycleKind::Attach,
                _ => LifecycleKind::Detach,
            },
        }))
    }

    fn decode_placement(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Placement(PlacementEvent {
            node: self.read_node()?,
            position_in_content: self.read_point()?,
            content_size: self.read_size()?,
            layer_size: self.read_size()?,
            blur_radius_px: self.read_f64()?,
        }))
    }

    fn decode_invalidate(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Invalidate(InvalidateEvent {
            node: self.read_node()?,
            dirty: self.read_dirty()?,
        }))
    }

    fn decode_draw(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Draw(DrawEvent {
            node: self.read_node()?,
            path: self.read_path()?,
            dirty: self.read_dirty()?,
            effects_built: self.read_u32()?,
            bands: self.read_u32()?,
        }))
    }

    fn decode_bands_count(&mut self) -> Option<RecordedEvent> {
        let node = self.read_node()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::BandsCount { node, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_LIFECYCLE => self.decode_lifecycle(),
            TAG_PLACEMENT => self.decode_placement(),
            TAG_INVALIDATE => self.decode_invalidate(),
            TAG_DRAW => self.decode_draw(),
            TAG_BANDS_COUNT => self.decode_bands_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
