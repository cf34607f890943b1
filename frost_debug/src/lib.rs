// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for frost effect nodes.
//!
//! Hosts hand one of these [`TraceSink`](frost_core::trace::TraceSink)s to
//! their nodes through `Host::tracer`:
//!
//! - [`pretty::PrettyPrintSink`] prints a line per lifecycle, placement,
//!   invalidation, draw, and band event.
//! - [`recorder::RecorderSink`] keeps a compact binary log that
//!   [`recorder::decode`] turns back into events.
//!
//! A recording can be exported with [`json::export`] and opened in
//! `chrome://tracing` or Perfetto, with one track per node.

pub mod json;
pub mod pretty;
pub mod recorder;
