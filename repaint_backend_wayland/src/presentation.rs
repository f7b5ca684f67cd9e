// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding `wp_presentation_feedback.presented` payloads.

use repaint_core::time::HostTime;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Presentation time from the split protocol fields, in nanoseconds.
///
/// Saturates on overflow; out-of-range nanoseconds are clamped.
#[must_use]
pub fn presentation_timestamp(tv_sec_hi: u32, tv_sec_lo: u32, tv_nsec: u32) -> HostTime {
    let seconds = (u64::from(tv_sec_hi) << 32) | u64::from(tv_sec_lo);
    let nanos = u64::from(tv_nsec.min(999_999_999));
    HostTime(
        seconds
            .saturating_mul(NANOS_PER_SECOND)
            .saturating_add(nanos),
    )
}

/// Refresh rate in Hz from the refresh interval in nanoseconds; `0.0` when
/// the compositor does not know it.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "refresh rates are far inside f32 range"
)]
pub fn refresh_rate_from_interval(refresh_ns: u32) -> f32 {
    if refresh_ns == 0 {
        return 0.0;
    }
    (1e9 / f64::from(refresh_ns)) as f32
}
