// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage window errors.

use core::fmt;

/// Reasons a stage window cannot be realized.
///
/// Realize failures are terminal for the window; whether to retry with a new
/// context or surface is up to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RealizeError {
    /// The driver has no GPU context.
    MissingContext,
    /// No Wayland surface has been attached to the window.
    MissingSurface,
    /// The driver can only present one onscreen framebuffer.
    MultipleOnscreenUnsupported {
        /// Number of views that would need their own onscreen buffer.
        views: usize,
    },
    /// The window is already realized.
    AlreadyRealized,
}

impl fmt::Display for RealizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContext => write!(f, "no GPU context available"),
            Self::MissingSurface => write!(f, "no surface attached to the stage window"),
            Self::MultipleOnscreenUnsupported { views } => write!(
                f,
                "driver supports a single onscreen framebuffer, {views} views requested"
            ),
            Self::AlreadyRealized => write!(f, "stage window is already realized"),
        }
    }
}

impl core::error::Error for RealizeError {}
