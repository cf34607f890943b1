// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip shapes and clipping helpers.
//!
//! Rectangles go straight to [`DrawTarget::clip_rect`]. Everything else is
//! flattened into a scratch [`BezPath`] taken from a [`PathPool`], so steady
//! state frames do not allocate paths.

use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Rect, RoundedRect, Shape, Vec2};

use crate::host::DrawTarget;
use crate::progressive::BandShape;

/// Flattening tolerance for curved clip shapes, in pixels.
const TOLERANCE: f64 = 0.1;

/// A shape used to clip an effect node.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A rectangle with rounded corners.
    RoundedRect(RoundedRect),
    /// An arbitrary closed path.
    Path(BezPath),
}

/// A free list of cleared [`BezPath`]s.
#[derive(Debug, Default)]
pub struct PathPool {
    free: Vec<BezPath>,
}

impl PathPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an empty path from the pool, allocating if none is free.
    #[must_use]
    pub fn acquire(&mut self) -> BezPath {
        self.free.pop().unwrap_or_default()
    }

    /// Clears `path` and returns it to the pool.
    pub fn release(&mut self, mut path: BezPath) {
        path.truncate(0);
        self.free.push(path);
    }

    /// Runs `f` with a pooled path, returning the path afterwards.
    pub fn with_path<R>(&mut self, f: impl FnOnce(&mut BezPath) -> R) -> R {
        let mut path = self.acquire();
        let result = f(&mut path);
        self.release(path);
        result
    }

    /// Number of idle paths.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.len()
    }
}

/// Clips `target` to `shape` moved by `offset`.
pub fn clip_shape<T: DrawTarget + ?Sized>(
    target: &mut T,
    shape: &ClipShape,
    offset: Vec2,
    pool: &mut PathPool,
) {
    match shape {
        ClipShape::Rect(rect) => target.clip_rect(*rect + offset),
        ClipShape::RoundedRect(rounded) => clip_with_path(target, rounded, offset, pool),
        ClipShape::Path(path) => clip_with_path(target, path, offset, pool),
    }
}

/// Clips `target` to a progressive band moved by `offset`.
pub fn clip_band<T: DrawTarget + ?Sized>(
    target: &mut T,
    band: &BandShape,
    offset: Vec2,
    pool: &mut PathPool,
) {
    match band {
        BandShape::Rect(rect) => target.clip_rect(*rect + offset),
        BandShape::Polygon(polygon) => pool.with_path(|path| {
            polygon.append_to(path, offset);
            target.clip_path(path);
        }),
    }
}

fn clip_with_path<T: DrawTarget + ?Sized>(
    target: &mut T,
    shape: &impl Shape,
    offset: Vec2,
    pool: &mut PathPool,
) {
    let transform = Affine::translate(offset);
    pool.with_path(|path| {
        for el in shape.path_elements(TOLERANCE) {
            path.push(transform * el);
        }
        target.clip_path(path);
    });
}
