// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw targets for frost.
//!
//! This crate provides concrete implementations of
//! [`frost_core::host::DrawTarget`]:
//!
//! - [`DisplayList`] records every call as a [`DrawOp`] and can replay the
//!   recording onto another target.
//! - [`CpuTarget`] is a software reference target on top of `vello_cpu`:
//!   its render contexts handle fills, clips, opacity groups and blend
//!   modes, while [`filter`] runs the effect stages over its pixmaps.
//!
//! Both hand out [`LayerKey`]s for offscreen layers.
//!
//! ```
//! use frost_core::color::{BlendMode, Color};
//! use frost_core::host::DrawTarget;
//! use frost_render::CpuTarget;
//! use kurbo::Rect;
//!
//! let mut target = CpuTarget::new(4, 4);
//! target.fill_rect(Rect::new(0.0, 0.0, 2.0, 4.0), Color::WHITE, BlendMode::SourceOver);
//! let canvas = target.canvas();
//! assert_eq!(canvas.data()[5].a, 255);
//! assert_eq!(canvas.data()[7].a, 0);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod convert;
mod cpu;
mod display_list;
pub mod filter;
mod resource;
#[cfg(test)]
mod testing;

pub use cpu::{ContentPainter, CpuTarget};
pub use display_list::{DisplayList, DrawOp};
pub use resource::LayerKey;
pub use vello_cpu::Pixmap;
