// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test helpers: a host without a reactive runtime and pixel readback.

use frost_core::host::Host;
use frost_core::style::Style;
use vello_cpu::Pixmap;

pub(crate) struct FixedHost;

impl Host for FixedHost {
    fn density(&self) -> f64 {
        1.0
    }

    fn ambient_style(&self) -> Style {
        Style::UNSPECIFIED
    }

    fn observe_reads(&mut self, reads: &mut dyn FnMut(&Self)) {
        reads(self);
    }

    fn request_redraw(&mut self) {}
}

/// Premultiplied channels of pixel `(x, y)` scaled to `0.0..=1.0`.
pub(crate) fn texel(pixmap: &Pixmap, x: u16, y: u16) -> [f32; 4] {
    let p = pixmap.data()[usize::from(y) * usize::from(pixmap.width()) + usize::from(x)];
    [p.r, p.g, p.b, p.a].map(|c| f32::from(c) / 255.0)
}

/// Whether every channel of `a` is within one 8-bit step of `b`.
pub(crate) fn close(a: [f32; 4], b: [f32; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() <= 1.5 / 255.0)
}
