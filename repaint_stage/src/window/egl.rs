// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-view window on a native EGL surface.

use repaint_core::config::RedrawConfig;

use crate::context::{GpuDriver, MonotonicClock, RenderContext, ScenePainter};
use crate::coordinator::ViewRedrawCoordinator;
use crate::error::RealizeError;
use crate::view::View;
use crate::window::StageWindow;

/// A stage window with exactly one view, presented through a native
/// onscreen surface.
#[derive(Debug)]
pub struct OnscreenEglStage<D, P, C> {
    coordinator: ViewRedrawCoordinator<D, P, C>,
}

impl<D, P, C> OnscreenEglStage<D, P, C>
where
    D: GpuDriver,
    P: ScenePainter,
    C: MonotonicClock,
{
    /// Creates an unrealized window showing `view`.
    pub fn new(context: RenderContext<D, P, C>, config: RedrawConfig, view: View) -> Self {
        let mut coordinator = ViewRedrawCoordinator::new(context, config);
        coordinator.add_view(view);
        Self { coordinator }
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

impl<D, P, C> StageWindow for OnscreenEglStage<D, P, C>
where
    D: GpuDriver,
    P: ScenePainter,
    C: MonotonicClock,
{
    fn realize(&mut self) -> Result<(), RealizeError> {
        self.coordinator.realize()
    }

    delegate_to_coordinator!();
}
