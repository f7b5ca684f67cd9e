// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Redraw tuning constants.
//!
//! The thresholds here were found empirically against real drivers and
//! displays. They are gathered into [`RedrawConfig`] rather than hard-coded so
//! that integrations can tune them per platform.

use crate::time::Duration;

/// Configuration for damage tracking, repaint planning, and frame pacing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RedrawConfig {
    /// Number of frames of damage kept per view. Must be a power of two.
    pub damage_history_capacity: usize,
    /// Clipped redraws of a view are refused until it has presented more
    /// than this many frames; some drivers present junk on their first
    /// frames.
    pub warmup_frames: u64,
    /// Presentation timestamps older than this are not extrapolated from.
    pub presentation_staleness: Duration,
    /// Refresh interval used when the reported refresh rate yields none.
    pub fallback_refresh_interval: Duration,
    /// Refresh rate (Hz) substituted when the display reports zero.
    pub fallback_refresh_rate: f32,
    /// When `false`, every frame repaints the whole view.
    pub allow_clipped_redraws: bool,
    /// Ask the painter to outline the redraw clip of each clipped frame.
    pub paint_redraw_outlines: bool,
}

impl RedrawConfig {
    /// Default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            damage_history_capacity: 16,
            warmup_frames: 3,
            presentation_staleness: Duration::from_millis(150),
            // 1/60th of a second.
            fallback_refresh_interval: Duration::from_micros(16_667),
            fallback_refresh_rate: 60.0,
            allow_clipped_redraws: true,
            paint_redraw_outlines: false,
        }
    }

    /// Configuration for visually debugging redraws: full repaints with the
    /// would-be clip still scissored and outlined.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            allow_clipped_redraws: false,
            paint_redraw_outlines: true,
            ..Self::new()
        }
    }

    /// Applies a list of paint debug flags to this configuration.
    ///
    /// Flags are separated by commas, colons, or whitespace and matched
    /// case-insensitively:
    ///
    /// - `disable-clipped-redraws`: repaint whole views every frame
    /// - `redraws`: outline the redraw clip
    /// - `all`: both of the above
    ///
    /// Unknown flags are ignored.
    #[must_use]
    pub fn with_debug_flags(mut self, flags: &str) -> Self {
        for flag in flags
            .split(|c: char| c == ',' || c == ':' || c.is_whitespace())
            .filter(|flag| !flag.is_empty())
        {
            if flag.eq_ignore_ascii_case("disable-clipped-redraws") {
                self.allow_clipped_redraws = false;
            } else if flag.eq_ignore_ascii_case("redraws") {
                self.paint_redraw_outlines = true;
            } else if flag.eq_ignore_ascii_case("all") {
                self.allow_clipped_redraws = false;
                self.paint_redraw_outlines = true;
            }
        }
        self
    }
}

impl Default for RedrawConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RedrawConfig;
    use crate::time::Duration;

    #[test]
    fn defaults_match_driver_workarounds() {
        let config = RedrawConfig::default();
        assert_eq!(config.damage_history_capacity, 16);
        assert_eq!(config.warmup_frames, 3);
        assert_eq!(config.presentation_staleness, Duration::from_micros(150_000));
        assert_eq!(config.fallback_refresh_interval, Duration(16_667_000));
        assert!(config.allow_clipped_redraws);
    }

    #[test]
    fn debug_flags_parse_mixed_separators() {
        let config = RedrawConfig::new().with_debug_flags("Redraws, disable-clipped-redraws");
        assert!(!config.allow_clipped_redraws);
        assert!(config.paint_redraw_outlines);

        let config = RedrawConfig::new().with_debug_flags("redraws:bogus");
        assert!(config.allow_clipped_redraws);
        assert!(config.paint_redraw_outlines);
    }

    #[test]
    fn all_flag_matches_debug_preset() {
        assert_eq!(
            RedrawConfig::new().with_debug_flags("all"),
            RedrawConfig::debug()
        );
        assert_eq!(RedrawConfig::new().with_debug_flags(""), RedrawConfig::new());
    }
}
