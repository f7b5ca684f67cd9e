// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading [`RedrawConfig`] from the environment.

use log::debug;
use repaint_core::config::RedrawConfig;

/// Environment variable holding debug paint flags, e.g.
/// `REPAINT_PAINT=disable-clipped-redraws,redraws`.
pub const PAINT_ENV_VAR: &str = "REPAINT_PAINT";

/// The default configuration with the debug flags from [`PAINT_ENV_VAR`]
/// applied.
#[must_use]
pub fn config_from_env() -> RedrawConfig {
    config_from_flags(std::env::var(PAINT_ENV_VAR).ok().as_deref())
}

/// The default configuration with `flags` applied, if any.
#[must_use]
pub fn config_from_flags(flags: Option<&str>) -> RedrawConfig {
    match flags {
        Some(flags) => {
            debug!("{PAINT_ENV_VAR}={flags}");
            RedrawConfig::new().with_debug_flags(flags)
        }
        None => RedrawConfig::new(),
    }
}
