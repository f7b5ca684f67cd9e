// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-view window on a Wayland surface.
//!
//! Every commit is paced by its frame callback: the swap stays pending until
//! `wl_callback.done` arrives as a [`PresentEvent::Sync`] naming that swap,
//! whether or not the driver reports swap events itself. Sync events without
//! a swap id come from the driver and are ignored, so a commit is never
//! released twice.
//!
//! [`PresentEvent::Sync`]: crate::presentation::PresentEvent::Sync

use log::warn;
use repaint_core::config::RedrawConfig;

use crate::context::{GpuDriver, MonotonicClock, RenderContext, ScenePainter};
use crate::coordinator::ViewRedrawCoordinator;
use crate::error::RealizeError;
use crate::swap::SwapPolicy;
use crate::view::View;
use crate::window::StageWindow;

/// A stage window presenting into a Wayland surface.
#[derive(Debug)]
pub struct WaylandStage<D, P, C> {
    coordinator: ViewRedrawCoordinator<D, P, C>,
    surface_attached: bool,
}

impl<D, P, C> WaylandStage<D, P, C>
where
    D: GpuDriver,
    P: ScenePainter,
    C: MonotonicClock,
{
    /// Creates an unrealized window without a surface.
    pub fn new(context: RenderContext<D, P, C>, config: RedrawConfig) -> Self {
        Self {
            coordinator: ViewRedrawCoordinator::new(context, config)
                .with_swap_policy(SwapPolicy::WAYLAND),
            surface_attached: false,
        }
    }

    /// Attaches the surface, shown through `view`. Replaces any previous
    /// surface view.
    pub fn attach_surface(&mut self, view: View) {
        let stale: Vec<_> = self.coordinator.views().iter().map(View::id).collect();
        for id in stale {
            self.coordinator.remove_view(id);
        }
        self.coordinator.add_view(view);
        self.surface_attached = true;
    }

    /// Returns `true` once a surface is attached.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.surface_attached
    }

    /// The window's redraw coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &ViewRedrawCoordinator<D, P, C> {
        &self.coordinator
    }

    /// Mutable access to the window's redraw coordinator.
    pub fn coordinator_mut(&mut self) -> &mut ViewRedrawCoordinator<D, P, C> {
        &mut self.coordinator
    }
}

impl<D, P, C> StageWindow for WaylandStage<D, P, C>
where
    D: GpuDriver,
    P: ScenePainter,
    C: MonotonicClock,
{
    fn realize(&mut self) -> Result<(), RealizeError> {
        if !self.surface_attached {
            warn!("failed to realize Wayland stage: no surface attached");
            return Err(RealizeError::MissingSurface);
        }
        self.coordinator.realize()
    }

    delegate_to_coordinator!();
}
