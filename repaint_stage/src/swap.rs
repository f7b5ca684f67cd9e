// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting and presenting a planned frame.
//!
//! [`SwapOrchestrator::execute`] carries out a [`RepaintPlan`] for one view:
//! it paints (scissored for clipped plans), blits to a separate onscreen
//! buffer if the view has one, and then presents with the cheapest call the
//! plan and driver allow:
//!
//! | plan                         | call                                |
//! |------------------------------|-------------------------------------|
//! | clipped, no damage, region   | `swap_region` (synchronous)         |
//! | clipped, otherwise           | `swap_buffers_with_damage([rect])`  |
//! | full, swap events            | `swap_buffers_with_damage([])`      |
//! | full, no swap events         | `swap_buffers`                      |
//! | offscreen onscreen buffer    | `framebuffer_finish`                |
//!
//! Asynchronous swaps are tracked on the view until their sync event
//! arrives.

use log::{debug, trace};
use repaint_core::planner::{RepaintMode, RepaintPlan};
use repaint_core::rect::Rect;
use repaint_core::trace::SwapKind;

use crate::context::{GpuDriver, ScenePainter, WinsysFeature};
use crate::presentation::SwapId;
use crate::view::View;

/// Window-system specific swap rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapPolicy {
    /// Track every asynchronous swap as pending, even without the
    /// `SwapEvents` feature. Used where frame callbacks pace presentation.
    pub track_all_swaps: bool,
    /// Allow synchronous sub-region swaps.
    pub allow_swap_region: bool,
    /// Only sync events naming a swap retire it. Untagged driver syncs are
    /// dropped so they cannot release a commit a second time.
    pub tagged_sync_only: bool,
}

impl SwapPolicy {
    /// Native EGL-style window systems.
    pub const NATIVE: Self = Self {
        track_all_swaps: false,
        allow_swap_region: true,
        tagged_sync_only: false,
    };

    /// Wayland: every commit waits for its own frame callback, and there is
    /// no sub-region copy.
    pub const WAYLAND: Self = Self {
        track_all_swaps: true,
        allow_swap_region: false,
        tagged_sync_only: true,
    };
}

impl Default for SwapPolicy {
    fn default() -> Self {
        Self::NATIVE
    }
}

/// What [`SwapOrchestrator::execute`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapOutcome {
    /// The view was painted.
    pub painted: bool,
    /// Presentation call made, if any.
    pub kind: Option<SwapKind>,
    /// Presented region in onscreen pixels; `None` for the whole buffer.
    pub region: Option<Rect>,
    /// Id of the swap if it is now pending.
    pub pending: Option<SwapId>,
}

impl SwapOutcome {
    const SKIPPED: Self = Self {
        painted: false,
        kind: None,
        region: None,
        pending: None,
    };
}

/// Executes repaint plans.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwapOrchestrator {
    policy: SwapPolicy,
}

impl SwapOrchestrator {
    /// Creates an orchestrator following `policy`.
    #[must_use]
    pub const fn new(policy: SwapPolicy) -> Self {
        Self { policy }
    }

    /// The swap policy in effect.
    #[must_use]
    pub const fn policy(&self) -> SwapPolicy {
        self.policy
    }

    /// Paints and presents one view according to `plan`.
    pub fn execute<D, P>(
        &self,
        driver: &mut D,
        painter: &mut P,
        view: &mut View,
        plan: &RepaintPlan,
    ) -> SwapOutcome
    where
        D: GpuDriver,
        P: ScenePainter,
    {
        let id = view.id();
        let framebuffer = *view.framebuffer();

        let painted_area = match plan.mode {
            RepaintMode::Skip => {
                debug!("{id:?}: empty stage output paint");
                return SwapOutcome::SKIPPED;
            }
            RepaintMode::Clipped { logical, scissor } => {
                trace!("{id:?}: stage clip pushed {scissor:?}");
                driver.push_scissor_clip(&framebuffer, scissor);
                painter.paint_view(id, Some(logical));
                driver.pop_clip(&framebuffer);
                logical
            }
            RepaintMode::Full => match plan.debug_clip {
                Some(debug_clip) => {
                    driver.push_scissor_clip(&framebuffer, debug_clip.scissor);
                    painter.paint_view(id, Some(debug_clip.logical));
                    driver.pop_clip(&framebuffer);
                    debug_clip.logical
                }
                None => {
                    trace!("{id:?}: unclipped stage paint");
                    painter.paint_view(id, None);
                    view.geometry().layout
                }
            },
        };

        if let Some(outline) = plan.outline {
            painter.outline_redraw_clip(id, outline);
        }

        if view.has_separate_onscreen() {
            painter.blit_offscreen_to_onscreen(id, painted_area);
        }

        let region = plan.swap_region().map(|r| view.to_onscreen_region(r));
        let (kind, pending) = self.present(driver, view, region, plan.swap_with_damage);
        view.presented_frames += 1;
        SwapOutcome {
            painted: true,
            kind: Some(kind),
            region,
            pending,
        }
    }

    fn present<D: GpuDriver>(
        &self,
        driver: &mut D,
        view: &mut View,
        region: Option<Rect>,
        swap_with_damage: bool,
    ) -> (SwapKind, Option<SwapId>) {
        let onscreen = *view.onscreen();
        if !onscreen.is_onscreen() {
            trace!("{:?}: framebuffer finish", view.id());
            driver.framebuffer_finish(&onscreen);
            return (SwapKind::Finish, None);
        }

        let swap = view.swaps.next_id();
        let kind = match region {
            Some(rect)
                if !swap_with_damage
                    && self.policy.allow_swap_region
                    && driver.has_feature(WinsysFeature::SwapRegion) =>
            {
                driver.swap_region(&onscreen, &[rect]);
                return (SwapKind::Region, None);
            }
            Some(rect) => {
                driver.swap_buffers_with_damage(&onscreen, &[rect], swap);
                SwapKind::WithDamage
            }
            None if driver.has_feature(WinsysFeature::SwapEvents) => {
                driver.swap_buffers_with_damage(&onscreen, &[], swap);
                SwapKind::WithDamage
            }
            None => {
                driver.swap_buffers(&onscreen, swap);
                SwapKind::Full
            }
        };

        if self.policy.track_all_swaps || driver.has_feature(WinsysFeature::SwapEvents) {
            view.swaps.push(swap);
            view.pacer.swap_issued();
            (kind, Some(swap))
        } else {
            (kind, None)
        }
    }
}
