// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time.
//!
//! [`HostTime`] is a point on a monotonic clock expressed in nanoseconds.
//! Which clock is up to the producer: the pacer works in the stage's
//! monotonic clock domain, while GPU drivers report presentation timestamps
//! in their own domain. Converting between the two is done with a
//! [`ClockSnapshot`] of both clocks read back to back.
//!
//! [`Duration`] is a span in the same nanosecond units. Conversions from the
//! microsecond and millisecond values the pacer is configured with are
//! provided as `const fn`s.

use core::fmt;
use core::ops::{Add, Sub};

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// A point in time in nanoseconds on some monotonic clock.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }

    /// Saturating addition of a duration.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.0))
    }

    /// Checked subtraction of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_sub(self, duration: Duration) -> Option<Self> {
        match self.0.checked_sub(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }

    /// Moves the time by a signed nanosecond offset, saturating at the ends
    /// of the representable range.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the value is range checked before narrowing"
    )]
    pub const fn saturating_offset(self, offset_nanos: i128) -> Self {
        let wide = self.0 as i128 + offset_nanos;
        if wide < 0 {
            Self(0)
        } else if wide > u64::MAX as i128 {
            Self(u64::MAX)
        } else {
            Self(wide as u64)
        }
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// A span of time in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from microseconds.
    #[inline]
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros.saturating_mul(NANOS_PER_MICRO))
    }

    /// Creates a duration from milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(NANOS_PER_MILLI))
    }

    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns the whole number of microseconds in this duration.
    #[inline]
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.0 / NANOS_PER_MICRO
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Saturating multiplication by an integer factor.
    #[inline]
    #[must_use]
    pub const fn saturating_mul(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(factor))
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Duration {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

/// Readings of two unrelated monotonic clocks taken as close together as
/// possible.
///
/// GPU drivers timestamp presentations on their own clock. The snapshot
/// carries the difference between that clock and the stage's monotonic clock
/// so a GPU timestamp can be re-expressed in the stage's domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClockSnapshot {
    /// Current time on the GPU / presentation clock.
    pub gpu_now: HostTime,
    /// Current time on the stage's monotonic clock.
    pub monotonic_now: HostTime,
}

impl ClockSnapshot {
    /// Converts a timestamp on the GPU clock to the monotonic clock.
    #[must_use]
    pub const fn to_monotonic(self, gpu_time: HostTime) -> HostTime {
        let delta = gpu_time.0 as i128 - self.gpu_now.0 as i128;
        self.monotonic_now.saturating_offset(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_unit_conversions() {
        assert_eq!(Duration::from_micros(16_667).nanos(), 16_667_000);
        assert_eq!(Duration::from_millis(150), Duration::from_micros(150_000));
        assert_eq!(Duration(1_999).as_micros(), 1);
    }

    #[test]
    fn duration_arithmetic() {
        let a = Duration(100);
        let b = Duration(30);
        assert_eq!((a + b).nanos(), 130);
        assert_eq!((a - b).nanos(), 70);
        assert_eq!(a.saturating_sub(Duration(200)), Duration::ZERO);
        assert_eq!(Duration(u64::MAX).saturating_mul(2), Duration(u64::MAX));
    }

    #[test]
    fn host_time_duration_ops() {
        let t = HostTime(1000);
        let d = Duration(200);
        assert_eq!((t + d).nanos(), 1200);
        assert_eq!((t - d).nanos(), 800);
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(t.saturating_duration_since(HostTime(400)), Duration(600));
        assert_eq!(HostTime(10).checked_sub(Duration(11)), None);
    }

    #[test]
    fn saturating_offset_clamps() {
        assert_eq!(HostTime(10).saturating_offset(-20), HostTime(0));
        assert_eq!(HostTime(10).saturating_offset(5), HostTime(15));
        assert_eq!(
            HostTime(u64::MAX - 1).saturating_offset(10),
            HostTime(u64::MAX)
        );
    }

    #[test]
    fn snapshot_maps_gpu_time_into_monotonic_domain() {
        let snapshot = ClockSnapshot {
            gpu_now: HostTime(5_000_000),
            monotonic_now: HostTime(90_000_000),
        };
        // Presented 2ms before the snapshot on the GPU clock.
        assert_eq!(
            snapshot.to_monotonic(HostTime(3_000_000)),
            HostTime(88_000_000)
        );
        // GPU clocks may run ahead of the snapshot too.
        assert_eq!(
            snapshot.to_monotonic(HostTime(6_000_000)),
            HostTime(91_000_000)
        );
    }
}
