// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node dirty flags.
//!
//! Each flag is an independent category of change. All of them cause the
//! node to request a redraw, but they differ in what the next draw must redo:
//!
//! - [`RENDER_EFFECT`](DirtyFlags::RENDER_EFFECT): the render effect must be
//!   rebuilt. Cleared only by a draw that actually rebuilds it.
//! - [`DRAW_PARAMETERS`](DirtyFlags::DRAW_PARAMETERS): alpha or clip shape
//!   changed; the cached effect is still usable.
//! - [`PROGRESSIVE`](DirtyFlags::PROGRESSIVE): the progressive descriptor
//!   changed; band partitioning is redone.
//! - [`POSITION`](DirtyFlags::POSITION): the node moved relative to its
//!   source; the captured window must be re-sampled.
//!
//! The last three are [`PER_FRAME`](DirtyFlags::PER_FRAME) flags and are
//! cleared after every completed draw.

use bitflags::bitflags;

bitflags! {
    /// A small bitset of [dirty categories](self).
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// The render effect must be rebuilt.
        const RENDER_EFFECT = 1 << 0;
        /// Draw-only parameters changed.
        const DRAW_PARAMETERS = 1 << 1;
        /// Progressive parameters changed.
        const PROGRESSIVE = 1 << 2;
        /// Position in the source region changed.
        const POSITION = 1 << 3;

        /// Flags cleared after every completed draw.
        const PER_FRAME = Self::DRAW_PARAMETERS.bits()
            | Self::PROGRESSIVE.bits()
            | Self::POSITION.bits();
        /// Every flag.
        const ALL = Self::RENDER_EFFECT.bits() | Self::PER_FRAME.bits();
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::empty()
    }
}
