// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Refresh-aligned update scheduling.
//!
//! The [`FramePacer`] decides when the next frame of a view should start. When
//! a recent presentation timestamp is known, targets are extrapolated from it
//! in whole refresh intervals so frames line up with the display's vertical
//! refresh. Without one (or when it is too old to trust) the pacer asks for
//! an immediate update.
//!
//! While swaps are in flight the pacer reports [`UpdateTime::Indefinite`]:
//! no new frame should be started until the display has caught up.

use crate::config::RedrawConfig;
use crate::time::{ClockSnapshot, Duration, HostTime};

/// When the next update of a view should happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateTime {
    /// Nothing has been scheduled.
    Unscheduled,
    /// Update as soon as possible; carries the time the request was made.
    Immediate(HostTime),
    /// Update at the given monotonic time.
    At(HostTime),
    /// Do not update until further notice (swaps in flight, or frozen).
    Indefinite,
}

impl UpdateTime {
    /// Returns the concrete time of the update, if there is one.
    #[must_use]
    pub const fn time(self) -> Option<HostTime> {
        match self {
            Self::Immediate(t) | Self::At(t) => Some(t),
            Self::Unscheduled | Self::Indefinite => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    None,
    Immediate(HostTime),
    Scheduled(HostTime),
}

/// Presentation timing last reported by the display.
///
/// Timestamp and refresh rate are always replaced together, so a reader never
/// sees one without the other.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PresentationTiming {
    /// Monotonic time of the last known presentation.
    pub last_presentation: Option<HostTime>,
    /// Refresh rate in Hz; `0.0` when unknown.
    pub refresh_rate: f32,
}

/// Per-view frame pacing state.
#[derive(Clone, Debug)]
pub struct FramePacer {
    timing: PresentationTiming,
    target: Target,
    pending_swaps: u32,
    frozen: bool,
    staleness: Duration,
    fallback_interval: Duration,
    fallback_rate: f32,
}

impl FramePacer {
    /// Creates a pacer with no timing information.
    #[must_use]
    pub fn new(config: &RedrawConfig) -> Self {
        Self {
            timing: PresentationTiming::default(),
            target: Target::None,
            pending_swaps: 0,
            frozen: false,
            staleness: config.presentation_staleness,
            fallback_interval: config.fallback_refresh_interval,
            fallback_rate: config.fallback_refresh_rate,
        }
    }

    /// Schedules the next update unless one is already pending.
    ///
    /// A negative `sync_delay_ms` requests an immediate update. Otherwise the
    /// target is `sync_delay_ms` after the last presentation, advanced by
    /// whole refresh intervals until it is no earlier than `now`. Without a
    /// usable presentation timestamp the update is immediate.
    ///
    /// Does nothing while the pacer is frozen.
    pub fn schedule_update(&mut self, now: HostTime, sync_delay_ms: i32) {
        if self.frozen || self.target != Target::None {
            return;
        }

        let Ok(delay_ms) = u64::try_from(sync_delay_ms) else {
            self.target = Target::Immediate(now);
            return;
        };

        let Some(last) = self.timing.last_presentation else {
            self.target = Target::Immediate(now);
            return;
        };
        if now.saturating_duration_since(last) > self.staleness {
            self.target = Target::Immediate(now);
            return;
        }

        let interval = self.refresh_interval();
        let mut target = last.saturating_add(Duration::from_millis(delay_ms));
        if target < now {
            // Jump straight to the first refresh boundary at or after `now`.
            let behind = now.saturating_duration_since(target).nanos();
            let steps = behind.div_ceil(interval.nanos().max(1));
            target = target.saturating_add(interval.saturating_mul(steps));
        }
        self.target = Target::Scheduled(target);
    }

    /// Returns when the next update should happen.
    #[must_use]
    pub fn get_update_time(&self) -> UpdateTime {
        if self.pending_swaps > 0 || self.frozen {
            return UpdateTime::Indefinite;
        }
        match self.target {
            Target::None => UpdateTime::Unscheduled,
            Target::Immediate(t) => UpdateTime::Immediate(t),
            Target::Scheduled(t) => UpdateTime::At(t),
        }
    }

    /// Forgets the scheduled target once the scheduler has started a frame.
    pub fn clear_update_time(&mut self) {
        self.target = Target::None;
    }

    /// Current refresh interval derived from the reported refresh rate.
    ///
    /// The interval is rounded to whole microseconds. Unknown rates fall back
    /// to the configured rate, and an interval that rounds to zero falls back
    /// to the configured interval.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rounding to whole microseconds is intended; the cast saturates"
    )]
    pub fn refresh_interval(&self) -> Duration {
        let mut rate = self.timing.refresh_rate;
        if rate.is_nan() || rate <= 0.0 {
            rate = self.fallback_rate;
        }
        let micros = (0.5 + 1_000_000.0 / f64::from(rate)) as u64;
        if micros == 0 {
            self.fallback_interval
        } else {
            Duration::from_micros(micros)
        }
    }

    /// Records presentation feedback from the display.
    ///
    /// `gpu_time` is the presentation timestamp on the driver's clock, if the
    /// driver reported one; `snapshot` relates that clock to the pacer's
    /// monotonic clock. Timestamps that would move the last presentation
    /// backwards are ignored. The refresh rate is always taken.
    pub fn on_presentation_complete(
        &mut self,
        gpu_time: Option<HostTime>,
        snapshot: ClockSnapshot,
        refresh_rate: f32,
    ) {
        let mut timing = self.timing;
        if let Some(gpu_time) = gpu_time.filter(|t| t.nanos() != 0) {
            let presented = snapshot.to_monotonic(gpu_time);
            if timing.last_presentation.is_none_or(|last| presented >= last) {
                timing.last_presentation = Some(presented);
            }
        }
        timing.refresh_rate = refresh_rate;
        self.timing = timing;
    }

    /// Notes that an asynchronous swap has been issued.
    pub fn swap_issued(&mut self) {
        self.pending_swaps = self.pending_swaps.saturating_add(1);
    }

    /// Notes that `count` swaps have completed.
    ///
    /// Saturates at zero so spurious completions cannot underflow.
    pub fn swaps_completed(&mut self, count: u32) {
        self.pending_swaps = self.pending_swaps.saturating_sub(count);
    }

    /// Number of swaps issued but not yet completed.
    #[inline]
    #[must_use]
    pub fn pending_swaps(&self) -> u32 {
        self.pending_swaps
    }

    /// Pauses scheduling. Presentation timing is kept.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.target = Target::None;
    }

    /// Resumes scheduling after [`freeze`](Self::freeze).
    pub fn thaw(&mut self) {
        self.frozen = false;
    }

    /// Returns `true` while frozen.
    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The last reported presentation timing.
    #[inline]
    #[must_use]
    pub fn timing(&self) -> PresentationTiming {
        self.timing
    }
}
