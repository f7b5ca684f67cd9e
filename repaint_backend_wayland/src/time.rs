// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation clock selection.

use log::warn;
use repaint_core::time::HostTime;
use repaint_stage::clock::now_for_clock;
use rustix::time::ClockId as PosixClockId;

/// Clock presentation timestamps are reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Clock {
    /// `CLOCK_MONOTONIC`, assumed until the compositor says otherwise.
    #[default]
    Monotonic,
    /// Clock selected by `wp_presentation.clock_id`.
    Presentation(PosixClockId),
}

impl Clock {
    /// The clock for a `wp_presentation.clock_id` value.
    ///
    /// Unsupported ids fall back to `CLOCK_MONOTONIC`.
    #[must_use]
    pub fn from_clk_id(clk_id: u32) -> Self {
        match clk_id {
            0 => Self::Presentation(PosixClockId::Realtime),
            1 => Self::Presentation(PosixClockId::Monotonic),
            other => {
                warn!("unsupported presentation clock id {other}, assuming CLOCK_MONOTONIC");
                Self::Monotonic
            }
        }
    }

    const fn posix_clock_id(self) -> PosixClockId {
        match self {
            Self::Monotonic => PosixClockId::Monotonic,
            Self::Presentation(clock_id) => clock_id,
        }
    }

    /// Reads the clock.
    #[must_use]
    pub fn now(self) -> HostTime {
        now_for_clock(self.posix_clock_id())
    }
}
