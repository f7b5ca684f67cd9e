// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-view redraw coordination for scene-graph stages.
//!
//! `repaint_stage` drives the bookkeeping of `repaint_core` against a real
//! GPU driver. It owns the views of a stage, plans and paints their frames,
//! picks the presentation call, and paces updates from presentation
//! feedback.
//!
//! ```text
//!   StageWindow (EGL / Wayland / embedded planes)
//!        │
//!        ▼
//!   ViewRedrawCoordinator ──► RepaintPlanner ──► SwapOrchestrator ──► GpuDriver
//!        ▲                                                               │
//!        │                                                               ▼
//!   PresentReceiver ◄──────────── PresentSender ◄──────────── window system
//! ```
//!
//! **[`context`]**: the [`GpuDriver`](context::GpuDriver),
//! [`ScenePainter`](context::ScenePainter) and
//! [`MonotonicClock`](context::MonotonicClock) collaborator traits.
//!
//! **[`view`]**: a [`View`](view::View) and its per-view redraw state.
//!
//! **[`coordinator`]**: the frame loop,
//! [`ViewRedrawCoordinator`](coordinator::ViewRedrawCoordinator).
//!
//! **[`swap`]**: executing a plan and choosing the swap call.
//!
//! **[`presentation`]**: the cross-thread presentation feedback channel.
//!
//! **[`window`]**: the window-system specific [`StageWindow`](window::StageWindow)
//! variants.
//!
//! **[`clock`]**: a `CLOCK_MONOTONIC` [`MonotonicClock`](context::MonotonicClock).
//!
//! **[`config`]**: loading debug flags from `REPAINT_PAINT`.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies in
//!   `repaint_core`.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod clock;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod presentation;
pub mod swap;
pub mod view;
pub mod window;

#[cfg(test)]
mod testing;
