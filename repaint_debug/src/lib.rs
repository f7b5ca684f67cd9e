// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for repaint
//! diagnostics.
//!
//! [`TraceSink`](repaint_core::trace::TraceSink) implementations for
//! development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: one human-readable line per event.
//! - [`recorder::RecorderSink`]: keeps events in memory as
//!   [`recorder::RecordedEvent`]s.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from
//!   recorded events.

pub mod chrome;
pub mod pretty;
pub mod recorder;
