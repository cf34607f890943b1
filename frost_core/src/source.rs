// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared state of a source region.
//!
//! The source region is the content being blurred. Its host captures it into
//! an offscreen layer each frame; effect children read that layer and the
//! region's screen position. One `SourceState` exists per source region and is
//! shared read-only by all of its children.

use core::cell::Cell;

use kurbo::Point;

/// Captured layer, screen position, and drawing flags of a source region.
#[derive(Debug)]
pub struct SourceState<L> {
    position_on_screen: Point,
    content_layer: Option<L>,
    content_drawing: Cell<bool>,
    child_drawing: Cell<bool>,
}

/// Puts a flag back to the value it had when raised.
struct Restore<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> Restore<'a> {
    fn raise(flag: &'a Cell<bool>) -> Self {
        Self {
            previous: flag.replace(true),
            flag,
        }
    }
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

impl<L> Default for SourceState<L> {
    fn default() -> Self {
        Self {
            position_on_screen: Point::ZERO,
            content_layer: None,
            content_drawing: Cell::new(false),
            child_drawing: Cell::new(false),
        }
    }
}

impl<L: Copy> SourceState<L> {
    /// Creates a state with no captured layer.
    #[must_use]
    pub fn new(position_on_screen: Point) -> Self {
        Self {
            position_on_screen,
            ..Self::default()
        }
    }

    /// Top-left of the source region in screen coordinates.
    #[inline]
    #[must_use]
    pub fn position_on_screen(&self) -> Point {
        self.position_on_screen
    }

    /// Updates the screen position.
    pub fn set_position_on_screen(&mut self, position: Point) {
        self.position_on_screen = position;
    }

    /// The most recently captured content layer.
    #[inline]
    #[must_use]
    pub fn content_layer(&self) -> Option<L> {
        self.content_layer
    }

    /// Replaces the captured content layer.
    pub fn set_content_layer(&mut self, layer: Option<L>) {
        self.content_layer = layer;
    }

    /// Whether the source region's own content draw is in progress.
    #[inline]
    #[must_use]
    pub fn is_content_drawing(&self) -> bool {
        self.content_drawing.get()
    }

    /// Runs `draw` with the content-drawing flag raised.
    ///
    /// The flag returns to its previous value on every exit path, including
    /// unwinding.
    ///
    /// # Panics
    ///
    /// Panics if one of the region's effect children is drawing, since the
    /// region would then be a descendant of that child.
    pub fn draw_content<R>(&self, draw: impl FnOnce() -> R) -> R {
        assert!(
            !self.child_drawing.get(),
            "effect children and their source region can not be descendants of each other"
        );
        let _restore = Restore::raise(&self.content_drawing);
        draw()
    }

    /// Whether one of the region's effect children is drawing.
    #[inline]
    #[must_use]
    pub fn is_child_drawing(&self) -> bool {
        self.child_drawing.get()
    }

    /// Runs `draw` with the child-drawing flag raised.
    ///
    /// Effect children wrap their own draw in this so that the source region
    /// can detect being drawn from inside one of them.
    pub fn draw_child<R>(&self, draw: impl FnOnce() -> R) -> R {
        let _restore = Restore::raise(&self.child_drawing);
        draw()
    }
}
