// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental redraw bookkeeping for scene-graph stages.
//!
//! `repaint_core` holds the platform-independent half of the redraw pipeline:
//! deciding *what* has to be repainted on a view, *how much* of the
//! framebuffer a frame must touch, and *when* the next frame should start. It
//! is `no_std` compatible (with `alloc`) and never talks to a GPU directly;
//! the `repaint_stage` crate drives it against real drivers.
//!
//! # Architecture
//!
//! Each frame of each view flows through the same stages:
//!
//! ```text
//!   add_clip() ... add_clip()          (actors queue redraws)
//!          │
//!          ▼
//!   RedrawClip ──► RepaintPlanner::plan() ◄── DamageHistory + buffer age
//!                          │
//!                          ▼
//!                     RepaintPlan ──► paint + swap (repaint_stage)
//!                                          │
//!          ┌───────────────────────────────┘
//!          ▼
//!   presentation event ──► FramePacer ──► next update time
//! ```
//!
//! **[`rect`]**: Integer rectangles shared by logical and physical spaces.
//!
//! **[`damage`]**: [`DamageHistory`](damage::DamageHistory), the per-view
//! ring of previously presented damage used for buffer-age repairs.
//!
//! **[`clip`]**: [`RedrawClip`](clip::RedrawClip), the per-frame bounding
//! box of queued redraws.
//!
//! **[`planner`]**: [`RepaintPlanner`](planner::RepaintPlanner), which turns
//! the accumulated clip into a full, clipped, or empty repaint.
//!
//! **[`pacer`]**: [`FramePacer`](pacer::FramePacer), refresh-aligned update
//! scheduling extrapolated from presentation timestamps.
//!
//! **[`config`]**: [`RedrawConfig`](config::RedrawConfig) with the tuning
//! constants for all of the above.
//!
//! **[`transform`]**: Mapping swap regions from an offscreen view buffer
//! into its onscreen buffer.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! redraw instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod clip;
pub mod config;
pub mod damage;
pub mod id;
pub mod pacer;
pub mod planner;
pub mod rect;
pub mod time;
pub mod trace;
pub mod transform;
