// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation feedback.
//!
//! Asynchronous swaps complete later, possibly reported from another thread.
//! Completion events are sent as [`PresentEvent`]s over a [`PresentSender`]
//! and drained by the redraw thread before it plans or schedules anything.
//!
//! Each asynchronous swap is tagged with a [`SwapId`] and tracked in issue
//! order. Events are matched against that order: an event for a later swap
//! retires every earlier one too, and an event that matches nothing in
//! flight is dropped as spurious.

use std::collections::VecDeque;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use repaint_core::id::ViewId;
use repaint_core::time::HostTime;

/// Identifies one swap of one view. Ids increase in issue order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SwapId(pub u64);

/// Feedback about a presented frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PresentEvent {
    /// The swap has been processed and the buffer may be reused.
    ///
    /// `swap` is `None` when the window system cannot say which swap the
    /// event is for; the oldest in-flight swap is assumed.
    Sync {
        /// View the swap belonged to.
        view: ViewId,
        /// Swap the event is for.
        swap: Option<SwapId>,
    },
    /// The frame has reached the display.
    Complete {
        /// View the swap belonged to.
        view: ViewId,
        /// Swap the event is for.
        swap: Option<SwapId>,
        /// Presentation time on the driver's clock, if reported.
        presentation_time: Option<HostTime>,
        /// Refresh rate of the display in Hz; `0.0` when unknown.
        refresh_rate: f32,
    },
}

impl PresentEvent {
    /// The view the event is for.
    #[must_use]
    pub const fn view(&self) -> ViewId {
        match self {
            Self::Sync { view, .. } | Self::Complete { view, .. } => *view,
        }
    }
}

/// Creates a presentation event channel.
#[must_use]
pub fn channel() -> (PresentSender, PresentReceiver) {
    let (sender, receiver) = unbounded();
    (PresentSender { sender }, PresentReceiver { receiver })
}

/// Sending half of a presentation event channel. Cheap to clone and `Send`.
#[derive(Clone, Debug)]
pub struct PresentSender {
    sender: Sender<PresentEvent>,
}

impl PresentSender {
    /// Sends an event. Returns `false` if the receiving stage is gone.
    pub fn send(&self, event: PresentEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Receiving half of a presentation event channel.
#[derive(Debug)]
pub struct PresentReceiver {
    receiver: Receiver<PresentEvent>,
}

impl PresentReceiver {
    /// Returns the next pending event without blocking.
    pub fn try_recv(&self) -> Option<PresentEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drains every pending event in arrival order.
    pub fn drain(&self) -> impl Iterator<Item = PresentEvent> + '_ {
        self.receiver.try_iter()
    }
}

/// Asynchronous swaps of one view awaiting their sync event, oldest first.
#[derive(Debug, Clone, Default)]
pub(crate) struct InFlightSwaps {
    swaps: VecDeque<SwapId>,
    next_id: u64,
}

impl InFlightSwaps {
    /// Allocates the id for the next swap, tracked or not.
    pub(crate) fn next_id(&mut self) -> SwapId {
        let id = SwapId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn push(&mut self, swap: SwapId) {
        debug_assert!(
            self.swaps.back().is_none_or(|last| *last < swap),
            "swaps must be tracked in issue order"
        );
        self.swaps.push_back(swap);
    }

    /// Retires the swaps an event refers to and returns how many that was.
    ///
    /// `None` retires the oldest swap. `Some(id)` retires every swap up to
    /// and including `id`. Zero means the event was spurious.
    pub(crate) fn retire(&mut self, swap: Option<SwapId>) -> u32 {
        let Some(id) = swap else {
            return u32::from(self.swaps.pop_front().is_some());
        };
        if !self.contains(id) {
            return 0;
        }
        let mut retired = 0_u32;
        while let Some(front) = self.swaps.pop_front() {
            retired += 1;
            if front == id {
                break;
            }
        }
        retired
    }

    /// Returns `true` if `swap` is still awaiting its sync event.
    pub(crate) fn contains(&self, swap: SwapId) -> bool {
        self.swaps.contains(&swap)
    }

    pub(crate) fn len(&self) -> usize {
        self.swaps.len()
    }

    pub(crate) fn clear(&mut self) {
        self.swaps.clear();
    }
}
