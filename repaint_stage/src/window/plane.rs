// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window on embedded display planes, one view per output.

use log::warn;
use repaint_core::config::RedrawConfig;

use crate::context::{GpuDriver, MonotonicClock, RenderContext, ScenePainter, WinsysFeature};
use crate::coordinator::ViewRedrawCoordinator;
use crate::error::RealizeError;
use crate::view::View;
use crate::window::StageWindow;

/// A stage window spanning one or more display planes.
///
/// More than one view needs a driver that can drive several onscreen
/// framebuffers at once.
#[derive(Debug)]
pub struct EmbeddedPlaneStage<D, P, C> {
    coordinator: ViewRedrawCoordinator<D, P, C>,
}

impl<D, P, C> EmbeddedPlaneStage<D, P, C>
where
    D: GpuDriver,
    P: ScenePainter,
    C: MonotonicClock,
{
    /// Creates an unrealized window showing `views`.
    pub fn new(
        context: RenderContext<D, P, C>,
        config: RedrawConfig,
        views: impl IntoIterator<Item = View>,
    ) -> Self {
        let mut coordinator = ViewRedrawCoordinator::new(context, config);
        for view in views {
            coordinator.add_view(view);
        }
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

impl<D, P, C> StageWindow for EmbeddedPlaneStage<D, P, C>
where
    D: GpuDriver,
    P: ScenePainter,
    C: MonotonicClock,
{
    fn realize(&mut self) -> Result<(), RealizeError> {
        let views = self.coordinator.views().len();
        if views > 1
            && !self
                .coordinator
                .context()
                .driver
                .has_feature(WinsysFeature::MultipleOnscreen)
        {
            warn!("failed to realize stage: {views} outputs need multiple onscreen support");
            return Err(RealizeError::MultipleOnscreenUnsupported { views });
        }
        self.coordinator.realize()
    }

    delegate_to_coordinator!();
}
