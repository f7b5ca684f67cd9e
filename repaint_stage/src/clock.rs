// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host clock reads.

use repaint_core::time::HostTime;
use rustix::time::{ClockId, Timespec, clock_gettime};

use crate::context::MonotonicClock;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// `CLOCK_MONOTONIC`, read through `clock_gettime`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl MonotonicClock for SystemClock {
    fn now(&self) -> HostTime {
        now_for_clock(ClockId::Monotonic)
    }
}

/// Reads the given POSIX clock as nanoseconds.
#[must_use]
pub fn now_for_clock(clock: ClockId) -> HostTime {
    timespec_to_host_time(clock_gettime(clock))
}

/// Converts a `timespec` into nanoseconds, saturating on overflow and
/// treating negative fields as zero.
#[must_use]
pub fn timespec_to_host_time(timespec: Timespec) -> HostTime {
    let seconds = u64::try_from(timespec.tv_sec).unwrap_or(0);
    let nanos = u64::try_from(timespec.tv_nsec)
        .unwrap_or(0)
        .min(999_999_999);

    let total = u128::from(seconds)
        .saturating_mul(NANOS_PER_SECOND)
        .saturating_add(u128::from(nanos));
    HostTime(u64::try_from(total).unwrap_or(u64::MAX))
}
