// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event-loop ownership and feedback dispatch.
//!
//! Two integration modes are supported:
//!
//! - [`OwnedQueueMode`]: backend-owned `EventQueue<WaylandState>`
//! - [`EmbeddedStateMode`]: host-owned `EventQueue<HostState>`, where the
//!   host state embeds a [`WaylandState`] and forwards to it with
//!   [`delegate_presentation_feedback!`](crate::delegate_presentation_feedback)
//!
//! ```text
//! Owned queue mode
//! ----------------
//! backend owns:
//!   EventQueue<WaylandState> + WaylandState
//!     -> QueueHandle<WaylandState>
//! backend dispatches via OwnedQueueMode::dispatch_pending() or
//! OwnedQueueMode::blocking_dispatch()
//!
//! Embedded-state mode
//! -------------------
//! host owns:
//!   EventQueue<HostState> + HostState { wayland: WaylandState, ... }
//!     -> QueueHandle<HostState>
//! host implements AsMut<WaylandState> and invokes
//!   delegate_presentation_feedback!(HostState)
//! host dispatches via its own EventQueue::dispatch_pending(&mut host_state)
//! ```
//!
//! Every `wl_callback`, `wp_presentation` and `wp_presentation_feedback`
//! object must be created with the queue handle of the selected mode, or its
//! events are never delivered.
//!
//! One [`WaylandState`] serves one stage; each commit is tagged with the view
//! and swap it presents, so several views can share a state.

use log::{debug, trace};
use repaint_core::id::ViewId;
use repaint_core::time::HostTime;
use repaint_stage::presentation::{PresentEvent, PresentSender, SwapId};
use wayland_client::protocol::wl_callback::{self, WlCallback};
use wayland_client::protocol::wl_surface::WlSurface;
use wayland_client::{
    Connection, Dispatch, DispatchError, EventQueue, QueueHandle,
    backend::{ReadEventsGuard, WaylandError},
};
use wayland_protocols::wp::presentation_time::client::wp_presentation::{self, WpPresentation};
use wayland_protocols::wp::presentation_time::client::wp_presentation_feedback::{
    self, WpPresentationFeedback,
};

use crate::presentation::{presentation_timestamp, refresh_rate_from_interval};
use crate::time::Clock;

/// User data of the feedback objects requested for one commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommitData {
    /// View the commit presents.
    pub view: ViewId,
    /// Swap the commit belongs to.
    pub swap: SwapId,
}

/// Requests feedback for the next commit of `surface`.
///
/// Must be called before the swap that commits the surface. A frame callback
/// is always requested; `wp_presentation` feedback only when the compositor
/// offers the global.
pub fn request_commit_feedback<S>(
    surface: &WlSurface,
    presentation: Option<&WpPresentation>,
    queue_handle: &QueueHandle<S>,
    commit: CommitData,
) where
    S: Dispatch<WlCallback, CommitData> + Dispatch<WpPresentationFeedback, CommitData> + 'static,
{
    _ = surface.frame(queue_handle, commit);
    if let Some(presentation) = presentation {
        _ = presentation.feedback(surface, queue_handle, commit);
    }
}

/// Backend state for Wayland protocol handling.
///
/// Forwards compositor feedback to a stage as presentation events.
#[derive(Debug)]
pub struct WaylandState {
    sender: PresentSender,
    clock: Clock,
    discarded: u64,
}

impl WaylandState {
    /// Creates a state that reports to the stage behind `sender`.
    #[must_use]
    pub const fn new(sender: PresentSender) -> Self {
        Self {
            sender,
            clock: Clock::Monotonic,
            discarded: 0,
        }
    }

    /// Clock presentation timestamps are reported in.
    #[must_use]
    pub const fn clock(&self) -> Clock {
        self.clock
    }

    /// Current time on the presentation clock.
    #[must_use]
    pub fn presentation_now(&self) -> HostTime {
        self.clock.now()
    }

    /// Number of commits the compositor discarded without presenting.
    #[must_use]
    pub const fn discarded_count(&self) -> u64 {
        self.discarded
    }

    /// Handles a `wp_presentation` event.
    pub fn handle_presentation_event(&mut self, event: wp_presentation::Event) {
        if let wp_presentation::Event::ClockId { clk_id } = event {
            self.clock = Clock::from_clk_id(clk_id);
            debug!("presentation clock: {:?}", self.clock);
        }
    }

    /// Handles a frame callback event.
    pub fn handle_frame_callback_event(&mut self, event: wl_callback::Event, commit: &CommitData) {
        if let wl_callback::Event::Done { .. } = event {
            self.frame_done(commit);
        }
    }

    /// Handles a `wp_presentation_feedback` event.
    pub fn handle_feedback_event(
        &mut self,
        event: wp_presentation_feedback::Event,
        commit: &CommitData,
    ) {
        match event {
            wp_presentation_feedback::Event::Presented {
                tv_sec_hi,
                tv_sec_lo,
                tv_nsec,
                refresh,
                ..
            } => self.presented(
                commit,
                presentation_timestamp(tv_sec_hi, tv_sec_lo, tv_nsec),
                refresh,
            ),
            wp_presentation_feedback::Event::Discarded => self.discarded(commit),
            _ => {}
        }
    }

    fn frame_done(&mut self, commit: &CommitData) {
        trace!("{:?}: frame callback for {:?}", commit.view, commit.swap);
        self.send(PresentEvent::Sync {
            view: commit.view,
            swap: Some(commit.swap),
        });
    }

    fn presented(&mut self, commit: &CommitData, timestamp: HostTime, refresh_ns: u32) {
        self.send(PresentEvent::Complete {
            view: commit.view,
            swap: Some(commit.swap),
            presentation_time: Some(timestamp),
            refresh_rate: refresh_rate_from_interval(refresh_ns),
        });
    }

    fn discarded(&mut self, commit: &CommitData) {
        debug!("{:?}: compositor discarded {:?}", commit.view, commit.swap);
        self.discarded += 1;
    }

    fn send(&self, event: PresentEvent) {
        if !self.sender.send(event) {
            debug!("stage is gone, dropping {event:?}");
        }
    }
}

impl AsMut<Self> for WaylandState {
    fn as_mut(&mut self) -> &mut Self {
        self
    }
}

/// Implements the feedback `Dispatch` traits for a state type that
/// implements `AsMut<WaylandState>`.
#[macro_export]
macro_rules! delegate_presentation_feedback {
    ($state:ty) => {
        impl
            $crate::reexports::client::Dispatch<
                $crate::reexports::protocols::wp::presentation_time::client::wp_presentation::WpPresentation,
                (),
            > for $state
        {
            fn event(
                state: &mut Self,
                _: &$crate::reexports::protocols::wp::presentation_time::client::wp_presentation::WpPresentation,
                event: $crate::reexports::protocols::wp::presentation_time::client::wp_presentation::Event,
                _: &(),
                _: &$crate::reexports::client::Connection,
                _: &$crate::reexports::client::QueueHandle<Self>,
            ) {
                <Self as ::core::convert::AsMut<$crate::WaylandState>>::as_mut(state)
                    .handle_presentation_event(event);
            }
        }

        impl
            $crate::reexports::client::Dispatch<
                $crate::reexports::client::protocol::wl_callback::WlCallback,
                $crate::CommitData,
            > for $state
        {
            fn event(
                state: &mut Self,
                _: &$crate::reexports::client::protocol::wl_callback::WlCallback,
                event: $crate::reexports::client::protocol::wl_callback::Event,
                commit: &$crate::CommitData,
                _: &$crate::reexports::client::Connection,
                _: &$crate::reexports::client::QueueHandle<Self>,
            ) {
                <Self as ::core::convert::AsMut<$crate::WaylandState>>::as_mut(state)
                    .handle_frame_callback_event(event, commit);
            }
        }

        impl
            $crate::reexports::client::Dispatch<
                $crate::reexports::protocols::wp::presentation_time::client::wp_presentation_feedback::WpPresentationFeedback,
                $crate::CommitData,
            > for $state
        {
            fn event(
                state: &mut Self,
                _: &$crate::reexports::protocols::wp::presentation_time::client::wp_presentation_feedback::WpPresentationFeedback,
                event: $crate::reexports::protocols::wp::presentation_time::client::wp_presentation_feedback::Event,
                commit: &$crate::CommitData,
                _: &$crate::reexports::client::Connection,
                _: &$crate::reexports::client::QueueHandle<Self>,
            ) {
                <Self as ::core::convert::AsMut<$crate::WaylandState>>::as_mut(state)
                    .handle_feedback_event(event, commit);
            }
        }
    };
}

delegate_presentation_feedback!(WaylandState);

/// Owned-queue integration mode.
///
/// Keeps queue ownership inside the backend and exposes explicit dispatch and
/// queue-handle accessors.
#[derive(Debug)]
pub struct OwnedQueueMode {
    event_queue: EventQueue<WaylandState>,
    state: WaylandState,
}

impl OwnedQueueMode {
    /// Creates an owned queue on `connection` reporting to `sender`.
    #[must_use]
    pub fn new(connection: &Connection, sender: PresentSender) -> Self {
        Self {
            event_queue: connection.new_event_queue(),
            state: WaylandState::new(sender),
        }
    }

    /// The queue handle every feedback object must be created with.
    #[must_use]
    pub fn queue_handle(&self) -> QueueHandle<WaylandState> {
        self.event_queue.handle()
    }

    /// Dispatches already-queued events without blocking.
    ///
    /// Does no socket I/O; pair with [`Self::flush`] and
    /// [`Self::prepare_read`] in a non-blocking loop.
    pub fn dispatch_pending(&mut self) -> Result<usize, DispatchError> {
        self.event_queue.dispatch_pending(&mut self.state)
    }

    /// Flushes requests, blocks for new events when needed, and dispatches.
    pub fn blocking_dispatch(&mut self) -> Result<usize, DispatchError> {
        self.event_queue.blocking_dispatch(&mut self.state)
    }

    /// Flushes pending outgoing requests to the Wayland socket.
    pub fn flush(&self) -> Result<(), WaylandError> {
        self.event_queue.flush()
    }

    /// Starts a synchronized socket read for poll-based loops.
    ///
    /// If this returns [`None`], dispatch queued events before trying again.
    #[must_use]
    pub fn prepare_read(&self) -> Option<ReadEventsGuard> {
        self.event_queue.prepare_read()
    }

    /// Requests feedback for the next commit of `surface`.
    pub fn request_commit_feedback(
        &self,
        surface: &WlSurface,
        presentation: Option<&WpPresentation>,
        commit: CommitData,
    ) {
        request_commit_feedback(surface, presentation, &self.queue_handle(), commit);
    }

    /// The backend state.
    #[must_use]
    pub fn state(&self) -> &WaylandState {
        &self.state
    }

    /// Mutable access to the backend state.
    pub fn state_mut(&mut self) -> &mut WaylandState {
        &mut self.state
    }
}

/// Embedded-state integration mode.
///
/// The host owns the event queue and dispatch loop; this only carries the
/// host queue handle feedback objects are created with.
#[derive(Debug, Clone)]
pub struct EmbeddedStateMode<HostState> {
    queue_handle: QueueHandle<HostState>,
}

impl<HostState> EmbeddedStateMode<HostState>
where
    HostState: Dispatch<WlCallback, CommitData>
        + Dispatch<WpPresentationFeedback, CommitData>
        + AsMut<WaylandState>
        + 'static,
{
    /// Wraps the host's queue handle.
    #[must_use]
    pub fn new(queue_handle: QueueHandle<HostState>) -> Self {
        Self { queue_handle }
    }

    /// The queue handle every feedback object must be created with.
    #[must_use]
    pub fn queue_handle(&self) -> QueueHandle<HostState> {
        self.queue_handle.clone()
    }

    /// Requests feedback for the next commit of `surface`.
    pub fn request_commit_feedback(
        &self,
        surface: &WlSurface,
        presentation: Option<&WpPresentation>,
        commit: CommitData,
    ) {
        request_commit_feedback(surface, presentation, &self.queue_handle, commit);
    }
}
