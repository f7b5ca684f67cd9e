// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayland presentation feedback for repaint.
//!
//! Turns compositor feedback into [`PresentEvent`]s for a
//! `repaint_stage` window:
//!
//! - `wl_callback.done` of a surface frame callback releases the commit it
//!   was requested for ([`PresentEvent::Sync`]).
//! - `wp_presentation_feedback.presented` reports when and at what refresh
//!   rate the commit reached the display ([`PresentEvent::Complete`]).
//!
//! Timestamps are on the clock announced by `wp_presentation.clock_id`; a
//! driver should report [`WaylandState::presentation_now`] as its clock time
//! so the stage can relate them to its own monotonic clock.
//!
//! [`PresentEvent`]: repaint_stage::presentation::PresentEvent
//! [`PresentEvent::Sync`]: repaint_stage::presentation::PresentEvent::Sync
//! [`PresentEvent::Complete`]: repaint_stage::presentation::PresentEvent::Complete

mod event_loop;
mod presentation;
mod time;

pub use event_loop::{
    CommitData, EmbeddedStateMode, OwnedQueueMode, WaylandState, request_commit_feedback,
};
pub use presentation::{presentation_timestamp, refresh_rate_from_interval};
pub use time::Clock;

/// Protocol crates used in this crate's public API.
pub mod reexports {
    pub use wayland_client as client;
    pub use wayland_protocols as protocols;
}
