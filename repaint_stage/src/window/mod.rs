// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage windows.
//!
//! A stage window is the window-system specific owner of a
//! [`ViewRedrawCoordinator`]. The variants differ in what they need before
//! they can be realized and in how swaps are paced:
//!
//! | variant                  | views | realize needs                    | swap policy           |
//! |--------------------------|-------|----------------------------------|-----------------------|
//! | [`OnscreenEglStage`]     | one   | a GPU context                    | [`SwapPolicy::NATIVE`]  |
//! | [`WaylandStage`]         | one   | a GPU context and a surface      | [`SwapPolicy::WAYLAND`] |
//! | [`EmbeddedPlaneStage`]   | many  | `MultipleOnscreen` for >1 view   | [`SwapPolicy::NATIVE`]  |
//!
//! [`ViewRedrawCoordinator`]: crate::coordinator::ViewRedrawCoordinator
//! [`SwapPolicy::NATIVE`]: crate::swap::SwapPolicy::NATIVE
//! [`SwapPolicy::WAYLAND`]: crate::swap::SwapPolicy::WAYLAND

/// Forwards the [`StageWindow`] operations that need nothing variant
/// specific to the window's `coordinator` field.
macro_rules! delegate_to_coordinator {
    () => {
        fn unrealize(&mut self) {
            self.coordinator.unrealize();
        }

        fn schedule_update(&mut self, sync_delay_ms: i32) {
            self.coordinator.schedule_update(sync_delay_ms);
        }

        fn get_update_time(&mut self) -> repaint_core::pacer::UpdateTime {
            self.coordinator.next_update_time()
        }

        fn clear_update_time(&mut self) {
            self.coordinator.clear_update_time();
        }

        fn redraw(&mut self) -> crate::coordinator::RedrawReport {
            self.coordinator.redraw_all_views()
        }

        fn add_redraw_clip(&mut self, clip: Option<repaint_core::rect::Rect>) {
            self.coordinator.queue_stage_redraw(clip);
        }
    };
}

mod egl;
mod plane;
mod wayland;

pub use egl::OnscreenEglStage;
pub use plane::EmbeddedPlaneStage;
pub use wayland::WaylandStage;

use repaint_core::pacer::UpdateTime;
use repaint_core::rect::Rect;

use crate::coordinator::RedrawReport;
use crate::error::RealizeError;

/// The operations every stage window variant supports.
pub trait StageWindow {
    /// Makes the window drawable.
    ///
    /// # Errors
    ///
    /// A [`RealizeError`] naming what the window system is missing.
    fn realize(&mut self) -> Result<(), RealizeError>;

    /// Stops drawing and forgets in-flight swaps.
    fn unrealize(&mut self);

    /// Schedules the next update `sync_delay_ms` after the last
    /// presentation; negative for immediately.
    fn schedule_update(&mut self, sync_delay_ms: i32);

    /// When the window should next be redrawn.
    fn get_update_time(&mut self) -> UpdateTime;

    /// Forgets the scheduled update once the frame clock has fired.
    fn clear_update_time(&mut self);

    /// Draws one frame.
    fn redraw(&mut self) -> RedrawReport;

    /// Queues a redraw of a stage-space area; `None` redraws everything.
    fn add_redraw_clip(&mut self, clip: Option<Rect>);
}
