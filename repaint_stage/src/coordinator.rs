// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-stage redraw driver.
//!
//! [`ViewRedrawCoordinator`] owns the views of one stage and runs their frames:
//!
//! ```text
//!   Unrealized ──realize()──► Realized ──unrealize()──► Unrealized
//!                                │
//!        ┌───────────────────────┘
//!        ▼
//!   accumulate clips ──► plan ──► paint ──► swap ──► accumulate clips ...
//! ```
//!
//! It is driven from a single thread by an external frame clock: clips are
//! queued with [`add_redraw_clip`](ViewRedrawCoordinator::add_redraw_clip),
//! the clock asks [`next_update_time`](ViewRedrawCoordinator::next_update_time)
//! when to fire, and then calls
//! [`redraw_all_views`](ViewRedrawCoordinator::redraw_all_views).
//!
//! Presentation feedback may come from any thread through a
//! [`PresentSender`]; it is applied on the redraw thread whenever the
//! coordinator is asked for update times or is about to redraw.

use log::{debug, trace, warn};
use repaint_core::config::RedrawConfig;
use repaint_core::id::ViewId;
use repaint_core::pacer::UpdateTime;
use repaint_core::planner::{RepaintMode, RepaintPlan, RepaintPlanner};
use repaint_core::rect::Rect;
use repaint_core::time::ClockSnapshot;
use repaint_core::trace::{
    BufferAgeEvent, PresentationEvent, RedrawClipEvent, RepaintPlanEvent, ScheduleEvent,
    SwapEvent, Tracer,
};

use crate::context::{GpuDriver, MonotonicClock, RenderContext, ScenePainter, capabilities_for};
use crate::error::RealizeError;
use crate::presentation::{self, PresentEvent, PresentReceiver, PresentSender};
use crate::swap::{SwapOrchestrator, SwapOutcome, SwapPolicy};
use crate::view::View;

/// What happened to one view during a redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewReport {
    /// The view.
    pub view: ViewId,
    /// The plan, or `None` if the view was not drawn because a swap was
    /// still pending.
    pub plan: Option<RepaintPlan>,
    /// What was painted and presented.
    pub outcome: Option<SwapOutcome>,
}

/// Result of [`ViewRedrawCoordinator::redraw_all_views`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedrawReport {
    /// Frame counter value the frame was drawn with.
    pub frame_index: u64,
    /// One entry per view, in view order. Empty if the stage is unrealized.
    pub views: Vec<ViewReport>,
}

impl RedrawReport {
    /// Returns `true` if any view issued a swap that is now pending.
    #[must_use]
    pub fn any_swap_pending(&self) -> bool {
        self.views
            .iter()
            .any(|report| report.outcome.is_some_and(|outcome| outcome.pending.is_some()))
    }

    /// The report for one view.
    #[must_use]
    pub fn view(&self, view: ViewId) -> Option<&ViewReport> {
        self.views.iter().find(|report| report.view == view)
    }
}

/// Drives damage tracking, repaint planning, swaps and pacing for all views
/// of a stage.
#[derive(Debug)]
pub struct ViewRedrawCoordinator<D, P, C> {
    context: RenderContext<D, P, C>,
    config: RedrawConfig,
    planner: RepaintPlanner,
    orchestrator: SwapOrchestrator,
    views: Vec<View>,
    frame_counter: u64,
    realized: bool,
    sender: PresentSender,
    events: PresentReceiver,
}

impl<D, P, C> ViewRedrawCoordinator<D, P, C>
where
    D: GpuDriver,
    P: ScenePainter,
    C: MonotonicClock,
{
    /// Creates an unrealized coordinator without views.
    pub fn new(context: RenderContext<D, P, C>, config: RedrawConfig) -> Self {
        let (sender, events) = presentation::channel();
        Self {
            context,
            planner: RepaintPlanner::new(&config),
            config,
            orchestrator: SwapOrchestrator::new(SwapPolicy::NATIVE),
            views: Vec::new(),
            frame_counter: 0,
            realized: false,
            sender,
            events,
        }
    }

    /// Replaces the swap policy.
    #[must_use]
    pub fn with_swap_policy(mut self, policy: SwapPolicy) -> Self {
        self.orchestrator = SwapOrchestrator::new(policy);
        self
    }

    /// The redraw configuration.
    #[must_use]
    pub fn config(&self) -> &RedrawConfig {
        &self.config
    }

    /// The collaborators.
    #[must_use]
    pub fn context(&self) -> &RenderContext<D, P, C> {
        &self.context
    }

    /// Mutable access to the collaborators.
    pub fn context_mut(&mut self) -> &mut RenderContext<D, P, C> {
        &mut self.context
    }

    /// Number of frames drawn so far.
    #[must_use]
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Returns `true` between a successful [`realize`](Self::realize) and
    /// [`unrealize`](Self::unrealize).
    #[must_use]
    pub fn is_realized(&self) -> bool {
        self.realized
    }

    /// Adds a view. A view with the same id is replaced.
    pub fn add_view(&mut self, view: View) {
        match self.views.iter_mut().find(|v| v.id() == view.id()) {
            Some(slot) => *slot = view,
            None => self.views.push(view),
        }
    }

    /// Removes a view and returns it.
    pub fn remove_view(&mut self, id: ViewId) -> Option<View> {
        let index = self.views.iter().position(|v| v.id() == id)?;
        Some(self.views.remove(index))
    }

    /// All views, in drawing order.
    #[must_use]
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// One view.
    #[must_use]
    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.iter().find(|v| v.id() == id)
    }

    fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.iter_mut().find(|v| v.id() == id)
    }

    /// A sender for presentation feedback, usable from any thread.
    #[must_use]
    pub fn present_event_sender(&self) -> PresentSender {
        self.sender.clone()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Makes the stage drawable.
    ///
    /// # Errors
    ///
    /// [`RealizeError::MissingContext`] if the driver has no GPU context and
    /// [`RealizeError::AlreadyRealized`] on a second call.
    pub fn realize(&mut self) -> Result<(), RealizeError> {
        if self.realized {
            return Err(RealizeError::AlreadyRealized);
        }
        if !self.context.driver.has_context() {
            warn!("failed to realize stage: missing GPU context");
            return Err(RealizeError::MissingContext);
        }
        self.realized = true;
        Ok(())
    }

    /// Stops drawing. In-flight swaps and queued clips are forgotten;
    /// presentation timing is kept.
    pub fn unrealize(&mut self) {
        self.realized = false;
        for view in &mut self.views {
            view.reset_for_unrealize();
        }
        // Feedback for swaps issued before this point no longer matters.
        for event in self.events.drain() {
            trace!("dropping presentation event after unrealize: {event:?}");
        }
    }

    // -----------------------------------------------------------------------
    // Redraw clips
    // -----------------------------------------------------------------------

    /// Queues a redraw of part of one view, in logical stage space; `None`
    /// redraws the whole view. Returns `false` for an unknown view.
    pub fn add_redraw_clip(&mut self, view: ViewId, clip: Option<Rect>) -> bool {
        self.add_redraw_clip_traced(view, clip, &mut Tracer::none())
    }

    /// [`add_redraw_clip`](Self::add_redraw_clip) with tracing.
    pub fn add_redraw_clip_traced(
        &mut self,
        view: ViewId,
        clip: Option<Rect>,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(target) = self.view_mut(view) else {
            debug!("redraw clip for unknown {view:?} ignored");
            return false;
        };
        target.clip.add_clip(clip);
        tracer.redraw_clip(&RedrawClipEvent {
            view,
            clip,
            bounds: target.clip.bounding_rect(),
        });
        true
    }

    /// Queues a redraw of a stage-space area on every view; each view keeps
    /// the part that overlaps it when it is planned.
    pub fn queue_stage_redraw(&mut self, clip: Option<Rect>) {
        for view in &mut self.views {
            view.clip.add_clip(clip);
        }
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    /// Schedules the next update of every view, `sync_delay_ms` after its
    /// last presentation (negative for immediately).
    pub fn schedule_update(&mut self, sync_delay_ms: i32) {
        self.schedule_update_traced(sync_delay_ms, &mut Tracer::none());
    }

    /// [`schedule_update`](Self::schedule_update) with tracing.
    pub fn schedule_update_traced(&mut self, sync_delay_ms: i32, tracer: &mut Tracer<'_>) {
        self.dispatch_present_events_traced(tracer);
        let now = self.context.clock.now();
        for view in &mut self.views {
            view.pacer.schedule_update(now, sync_delay_ms);
            tracer.schedule(&ScheduleEvent {
                view: view.id(),
                now,
                sync_delay_ms,
                update: view.pacer.get_update_time(),
            });
        }
    }

    /// When one view should next be updated.
    ///
    /// Pending presentation feedback is applied first.
    pub fn get_update_time(&mut self, view: ViewId) -> UpdateTime {
        self.dispatch_present_events();
        self.view(view)
            .map_or(UpdateTime::Unscheduled, |v| v.pacer.get_update_time())
    }

    /// When the stage should next be redrawn.
    ///
    /// The earliest update of any view. Views waiting on a swap are ignored
    /// unless every view is waiting, in which case the result is
    /// [`UpdateTime::Indefinite`].
    pub fn next_update_time(&mut self) -> UpdateTime {
        self.dispatch_present_events();
        let mut all_waiting = !self.views.is_empty();
        let mut earliest: Option<UpdateTime> = None;
        for view in &self.views {
            let update = view.pacer.get_update_time();
            if update != UpdateTime::Indefinite {
                all_waiting = false;
            }
            let Some(time) = update.time() else {
                continue;
            };
            earliest = match earliest.and_then(UpdateTime::time) {
                Some(best) if best <= time => earliest,
                _ => Some(update),
            };
        }
        if all_waiting {
            UpdateTime::Indefinite
        } else {
            earliest.unwrap_or(UpdateTime::Unscheduled)
        }
    }

    /// Forgets all scheduled updates, once the frame clock has fired.
    pub fn clear_update_time(&mut self) {
        for view in &mut self.views {
            view.pacer.clear_update_time();
        }
    }

    /// Pauses update scheduling on all views.
    pub fn freeze(&mut self) {
        for view in &mut self.views {
            view.pacer.freeze();
        }
    }

    /// Resumes update scheduling on all views.
    pub fn thaw(&mut self) {
        for view in &mut self.views {
            view.pacer.thaw();
        }
    }

    // -----------------------------------------------------------------------
    // Presentation feedback
    // -----------------------------------------------------------------------

    /// Applies all pending presentation feedback. Returns the number of
    /// events processed.
    pub fn dispatch_present_events(&mut self) -> usize {
        self.dispatch_present_events_traced(&mut Tracer::none())
    }

    /// [`dispatch_present_events`](Self::dispatch_present_events) with
    /// tracing.
    pub fn dispatch_present_events_traced(&mut self, tracer: &mut Tracer<'_>) -> usize {
        let mut count = 0;
        while let Some(event) = self.events.try_recv() {
            self.handle_present_event(event, tracer);
            count += 1;
        }
        count
    }

    fn handle_present_event(&mut self, event: PresentEvent, tracer: &mut Tracer<'_>) {
        let tagged_sync_only = self.orchestrator.policy().tagged_sync_only;
        let id = event.view();
        let Some(view) = self.views.iter_mut().find(|v| v.id() == id) else {
            debug!("presentation event for unknown {id:?} ignored");
            return;
        };
        match event {
            PresentEvent::Sync { swap, .. } => {
                let retired = if swap.is_none() && tagged_sync_only {
                    0
                } else {
                    view.swaps.retire(swap)
                };
                if retired == 0 {
                    debug!("{id:?}: spurious swap completion {swap:?} ignored");
                } else {
                    view.pacer.swaps_completed(retired);
                }
                tracer.presentation(&PresentationEvent {
                    view: id,
                    swap_id: swap.map(|s| s.0),
                    presented_at: None,
                    refresh_rate: view.pacer.timing().refresh_rate,
                    spurious: retired == 0,
                });
            }
            PresentEvent::Complete {
                swap,
                presentation_time,
                refresh_rate,
                ..
            } => {
                let snapshot = ClockSnapshot {
                    gpu_now: self.context.driver.clock_time(),
                    monotonic_now: self.context.clock.now(),
                };
                view.pacer
                    .on_presentation_complete(presentation_time, snapshot, refresh_rate);
                tracer.presentation(&PresentationEvent {
                    view: id,
                    swap_id: swap.map(|s| s.0),
                    presented_at: presentation_time.map(|t| snapshot.to_monotonic(t)),
                    refresh_rate,
                    spurious: false,
                });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Redraw
    // -----------------------------------------------------------------------

    /// Draws one frame on every view that is not waiting for a swap.
    ///
    /// Views with a pending swap keep their queued clips for the next frame.
    /// Does nothing on an unrealized stage.
    pub fn redraw_all_views(&mut self) -> RedrawReport {
        self.redraw_all_views_traced(&mut Tracer::none())
    }

    /// [`redraw_all_views`](Self::redraw_all_views) with tracing.
    pub fn redraw_all_views_traced(&mut self, tracer: &mut Tracer<'_>) -> RedrawReport {
        if !self.realized {
            debug!("redraw requested on an unrealized stage");
            return RedrawReport {
                frame_index: self.frame_counter,
                views: Vec::new(),
            };
        }

        self.dispatch_present_events_traced(tracer);

        let frame_index = self.frame_counter;
        let policy = self.orchestrator.policy();
        let mut views = Vec::with_capacity(self.views.len());
        for view in &mut self.views {
            let id = view.id();
            if view.pacer.pending_swaps() > 0 {
                debug!(
                    "{id:?}: {} swap(s) still pending, frame deferred",
                    view.swaps.len()
                );
                views.push(ViewReport {
                    view: id,
                    plan: None,
                    outcome: None,
                });
                continue;
            }

            let framebuffer = *view.framebuffer();
            let geometry = *view.geometry();
            let mut caps = capabilities_for(&self.context.driver, &framebuffer);
            caps.swap_region &= policy.allow_swap_region;

            let driver = &mut self.context.driver;
            let plan = self.planner.plan(
                &geometry,
                caps,
                view.presented_frames(),
                &mut view.clip,
                &mut view.history,
                || driver.query_buffer_age(&framebuffer),
            );

            if let Some(age) = plan.buffer_age {
                let repair = match plan.mode {
                    RepaintMode::Clipped { scissor, .. } if plan.swap_with_damage => Some(scissor),
                    _ => None,
                };
                match repair {
                    Some(region) => {
                        debug!("{id:?}: reusing back buffer (age={age}), repairing {region:?}");
                    }
                    None => debug!("{id:?}: invalid back buffer (age={age}), full redraw"),
                }
                tracer.buffer_age(&BufferAgeEvent {
                    frame_index,
                    view: id,
                    age,
                    repair,
                });
            }
            tracer.repaint_plan(&RepaintPlanEvent::new(frame_index, id, &plan));

            let outcome = self.orchestrator.execute(
                &mut self.context.driver,
                &mut self.context.painter,
                view,
                &plan,
            );
            if let Some(kind) = outcome.kind {
                tracer.swap(&SwapEvent {
                    frame_index,
                    view: id,
                    kind,
                    region: outcome.region,
                    swap_id: outcome.pending.map(|s| s.0),
                    submitted_at: self.context.clock.now(),
                });
            }

            view.clip.reset();
            views.push(ViewReport {
                view: id,
                plan: Some(plan),
                outcome: Some(outcome),
            });
        }

        self.context.painter.finish_frame();
        self.frame_counter += 1;

        RedrawReport { frame_index, views }
    }

    /// A recently repainted stage position of a view, for picking.
    #[must_use]
    pub fn dirty_pixel(&self, view: ViewId) -> Option<(i32, i32)> {
        let view = self.view(view)?;
        let caps = capabilities_for(&self.context.driver, view.framebuffer());
        Some(view.dirty_pixel(caps.buffer_age))
    }
}

#[cfg(test)]
mod tests {
    use super::ViewRedrawCoordinator;
    use crate::context::{Framebuffer, FramebufferId, RenderContext, WinsysFeature};
    use crate::error::RealizeError;
    use crate::presentation::{PresentEvent, SwapId};
    use crate::testing::{DriverCall, ManualClock, PaintCall, RecordingDriver, RecordingPainter};
    use crate::view::View;
    use repaint_core::config::RedrawConfig;
    use repaint_core::id::ViewId;
    use repaint_core::pacer::UpdateTime;
    use repaint_core::planner::RepaintMode;
    use repaint_core::rect::Rect;
    use repaint_core::time::{Duration, HostTime};
    use repaint_core::trace::SwapKind;

    type TestCoordinator = ViewRedrawCoordinator<RecordingDriver, RecordingPainter, ManualClock>;

    const MS: u64 = 1_000_000;

    fn coordinator_with(driver: RecordingDriver, config: RedrawConfig) -> TestCoordinator {
        let context = RenderContext::new(
            driver,
            RecordingPainter::default(),
            ManualClock::at(HostTime(1_000 * MS)),
        );
        let mut coordinator = ViewRedrawCoordinator::new(context, config);
        coordinator.add_view(single_view(ViewId(0), Rect::from_size(800, 600)));
        coordinator
    }

    fn single_view(id: ViewId, layout: Rect) -> View {
        View::new(
            id,
            layout,
            1.0,
            Framebuffer::onscreen(FramebufferId(id.0), layout.width, layout.height),
            &RedrawConfig::default(),
        )
    }

    /// Realizes and draws enough full frames to leave the warm-up period.
    fn warmed_up(driver: RecordingDriver) -> TestCoordinator {
        let mut coordinator = coordinator_with(driver, RedrawConfig::default());
        coordinator.realize().expect("realize should succeed");
        for _ in 0..4 {
            coordinator.queue_stage_redraw(None);
            coordinator.redraw_all_views();
            acknowledge_swaps(&mut coordinator);
        }
        coordinator
    }

    fn acknowledge_swaps(coordinator: &mut TestCoordinator) {
        let sender = coordinator.present_event_sender();
        for view in coordinator.views() {
            for _ in 0..view.pending_swaps() {
                sender.send(PresentEvent::Sync {
                    view: view.id(),
                    swap: None,
                });
            }
        }
        coordinator.dispatch_present_events();
    }

    #[test]
    fn realize_requires_gpu_context() {
        let mut driver = RecordingDriver::all_features();
        driver.has_context = false;
        let mut coordinator = coordinator_with(driver, RedrawConfig::default());
        assert_eq!(coordinator.realize(), Err(RealizeError::MissingContext));
        assert!(!coordinator.is_realized());

        coordinator.context_mut().driver.has_context = true;
        assert_eq!(coordinator.realize(), Ok(()));
        assert_eq!(coordinator.realize(), Err(RealizeError::AlreadyRealized));
    }

    #[test]
    fn unrealized_stage_does_not_draw() {
        let mut coordinator = coordinator_with(RecordingDriver::all_features(), RedrawConfig::default());
        let report = coordinator.redraw_all_views();
        assert!(report.views.is_empty());
        assert!(coordinator.context().painter.calls.is_empty());
        assert_eq!(coordinator.frame_counter(), 0);
    }

    #[test]
    fn full_redraw_scenario() {
        let mut coordinator = coordinator_with(RecordingDriver::new(&[]), RedrawConfig::default());
        coordinator.realize().expect("realize should succeed");
        coordinator.add_redraw_clip(ViewId(0), None);

        let report = coordinator.redraw_all_views();
        let view_report = report.view(ViewId(0)).expect("view was drawn");
        let plan = view_report.plan.expect("view was planned");
        assert_eq!(plan.mode, RepaintMode::Full);
        assert_eq!(
            view_report.outcome.and_then(|o| o.kind),
            Some(SwapKind::Full)
        );

        let view = coordinator.view(ViewId(0)).expect("view exists");
        assert_eq!(view.damage_history().write_index(), 1);
        assert_eq!(view.damage_history().latest(), Some(Rect::from_size(800, 600)));
        assert_eq!(
            coordinator.context().driver.calls,
            [DriverCall::SwapBuffers(FramebufferId(0))]
        );
        assert_eq!(
            coordinator.context().painter.calls,
            [PaintCall::Paint(ViewId(0), None), PaintCall::FinishFrame]
        );
        assert_eq!(coordinator.frame_counter(), 1);
    }

    #[test]
    fn buffer_age_scenario_repairs_and_swaps_with_damage() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        {
            let view = coordinator
                .views
                .iter_mut()
                .find(|v| v.id() == ViewId(0))
                .expect("view exists");
            view.history.record(Rect::new(10, 10, 50, 50));
            view.history.record(Rect::new(20, 20, 10, 10));
        }
        coordinator.context_mut().driver.buffer_ages.push_back(2);
        coordinator.context_mut().driver.calls.clear();
        coordinator.add_redraw_clip(ViewId(0), Some(Rect::new(100, 100, 20, 20)));

        let report = coordinator.redraw_all_views();
        let plan = report.views[0].plan.expect("view was planned");
        let repair = Rect::new(10, 10, 110, 110);
        assert_eq!(
            plan.mode,
            RepaintMode::Clipped {
                logical: repair,
                scissor: repair,
            }
        );
        assert!(plan.swap_with_damage);
        assert_eq!(
            coordinator.context().driver.calls,
            [
                DriverCall::QueryBufferAge(FramebufferId(0)),
                DriverCall::PushScissor(FramebufferId(0), repair),
                DriverCall::PopClip(FramebufferId(0)),
                DriverCall::SwapWithDamage(FramebufferId(0), vec![repair]),
            ]
        );
        let view = coordinator.view(ViewId(0)).expect("view exists");
        assert!(!view.redraw_clip().has_any_clip(), "clip is reset after paint");
        assert_eq!(view.pending_swaps(), 1);
    }

    #[test]
    fn invalid_buffer_age_scenario_repaints_everything() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.context_mut().driver.buffer_ages.push_back(0);
        let before = coordinator.views()[0].damage_history().write_index();
        coordinator.add_redraw_clip(ViewId(0), Some(Rect::new(100, 100, 20, 20)));

        let report = coordinator.redraw_all_views();
        let plan = report.views[0].plan.expect("view was planned");
        assert_eq!(plan.mode, RepaintMode::Full);
        let history = coordinator.views()[0].damage_history();
        assert_eq!(history.write_index(), before + 1);
        assert_eq!(history.latest(), Some(Rect::from_size(800, 600)));
        assert_eq!(
            coordinator.context().painter.paints_of(ViewId(0)).last(),
            Some(&None)
        );
    }

    #[test]
    fn pending_swap_blocks_scheduling_and_drawing() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.queue_stage_redraw(Some(Rect::new(1, 1, 2, 2)));
        coordinator.redraw_all_views();
        assert_eq!(coordinator.views()[0].pending_swaps(), 1);

        coordinator.schedule_update(0);
        assert_eq!(coordinator.get_update_time(ViewId(0)), UpdateTime::Indefinite);
        assert_eq!(coordinator.next_update_time(), UpdateTime::Indefinite);

        let swaps_before = coordinator.context().driver.swap_count();
        coordinator.add_redraw_clip(ViewId(0), Some(Rect::new(5, 5, 5, 5)));
        let report = coordinator.redraw_all_views();
        assert_eq!(report.views[0].plan, None);
        assert_eq!(coordinator.context().driver.swap_count(), swaps_before);
        assert!(
            coordinator.views()[0].redraw_clip().has_any_clip(),
            "deferred view keeps its clip"
        );

        acknowledge_swaps(&mut coordinator);
        assert_ne!(coordinator.get_update_time(ViewId(0)), UpdateTime::Indefinite);
    }

    #[test]
    fn spurious_sync_events_are_ignored() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        let sender = coordinator.present_event_sender();
        sender.send(PresentEvent::Sync {
            view: ViewId(0),
            swap: None,
        });
        sender.send(PresentEvent::Sync {
            view: ViewId(0),
            swap: Some(SwapId(999)),
        });
        sender.send(PresentEvent::Sync {
            view: ViewId(42),
            swap: None,
        });
        assert_eq!(coordinator.dispatch_present_events(), 3);
        assert_eq!(coordinator.views()[0].pending_swaps(), 0);
    }

    #[test]
    fn tagged_sync_retires_only_its_view() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.add_view(single_view(ViewId(1), Rect::new(800, 0, 800, 600)));
        coordinator.queue_stage_redraw(None);
        coordinator.redraw_all_views();
        assert_eq!(coordinator.views()[0].pending_swaps(), 1);
        assert_eq!(coordinator.views()[1].pending_swaps(), 1);

        // Swap ids are allocated per view: view 0 is on its fifth swap.
        let issued = &coordinator.context().driver.issued;
        let for_view_0 = issued[issued.len() - 2];
        assert_eq!(for_view_0, SwapId(4));
        assert_eq!(issued[issued.len() - 1], SwapId(0));

        coordinator.present_event_sender().send(PresentEvent::Sync {
            view: ViewId(0),
            swap: Some(for_view_0),
        });
        coordinator.dispatch_present_events();
        assert_eq!(coordinator.views()[0].pending_swaps(), 0);
        assert_eq!(coordinator.views()[1].pending_swaps(), 1);
    }

    #[test]
    fn presentation_feedback_drives_refresh_aligned_targets() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.context_mut().driver.gpu_now = HostTime(50 * MS);
        let sender = coordinator.present_event_sender();
        // Presented 4ms ago on the GPU clock.
        sender.send(PresentEvent::Complete {
            view: ViewId(0),
            swap: None,
            presentation_time: Some(HostTime(46 * MS)),
            refresh_rate: 60.0,
        });
        coordinator.schedule_update(0);

        let now = HostTime(1_000 * MS);
        assert_eq!(
            coordinator.get_update_time(ViewId(0)),
            UpdateTime::At(now - Duration(4 * MS) + Duration::from_micros(16_667))
        );
        assert_eq!(
            coordinator.next_update_time(),
            coordinator.get_update_time(ViewId(0))
        );

        coordinator.clear_update_time();
        assert_eq!(coordinator.next_update_time(), UpdateTime::Unscheduled);
    }

    #[test]
    fn stale_feedback_schedules_immediately() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.context_mut().driver.gpu_now = HostTime(10 * MS);
        let sender = coordinator.present_event_sender();
        sender.send(PresentEvent::Complete {
            view: ViewId(0),
            swap: None,
            presentation_time: Some(HostTime(10 * MS)),
            refresh_rate: 60.0,
        });
        assert_eq!(coordinator.dispatch_present_events(), 1);
        coordinator.context().clock.advance(Duration::from_millis(151));
        coordinator.schedule_update(3);
        assert!(matches!(
            coordinator.next_update_time(),
            UpdateTime::Immediate(_)
        ));
    }

    #[test]
    fn frozen_stage_reports_indefinite_until_thawed() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.freeze();
        coordinator.schedule_update(-1);
        assert_eq!(coordinator.next_update_time(), UpdateTime::Indefinite);
        coordinator.thaw();
        coordinator.schedule_update(-1);
        assert_eq!(
            coordinator.next_update_time(),
            UpdateTime::Immediate(HostTime(1_000 * MS))
        );
    }

    #[test]
    fn views_are_tracked_independently() {
        let mut coordinator = warmed_up(RecordingDriver::new(&[WinsysFeature::SwapRegion]));
        coordinator.add_view(single_view(ViewId(1), Rect::new(800, 0, 800, 600)));
        // Leave the new view's warm-up behind too.
        for _ in 0..4 {
            coordinator.queue_stage_redraw(None);
            coordinator.redraw_all_views();
        }
        coordinator.queue_stage_redraw(Some(Rect::new(790, 10, 20, 20)));
        let report = coordinator.redraw_all_views();
        assert_eq!(
            report.views[0].plan.map(|p| p.mode),
            Some(RepaintMode::Clipped {
                logical: Rect::new(790, 10, 10, 20),
                scissor: Rect::new(790, 10, 10, 20),
            })
        );
        assert_eq!(
            report.views[1].plan.map(|p| p.mode),
            Some(RepaintMode::Clipped {
                logical: Rect::new(800, 10, 10, 20),
                scissor: Rect::new(0, 10, 10, 20),
            })
        );
        assert!(!report.any_swap_pending());
    }

    #[test]
    fn added_view_goes_through_its_own_warm_up() {
        let mut coordinator = warmed_up(RecordingDriver::new(&[WinsysFeature::SwapRegion]));
        for _ in 0..6 {
            coordinator.queue_stage_redraw(None);
            coordinator.redraw_all_views();
        }
        coordinator.add_view(single_view(ViewId(1), Rect::new(800, 0, 800, 600)));
        let clip = Rect::new(900, 10, 20, 20);

        for presented in 0..4 {
            assert_eq!(coordinator.view(ViewId(1)).map(View::presented_frames), Some(presented));
            coordinator.add_redraw_clip(ViewId(1), Some(clip));
            let report = coordinator.redraw_all_views();
            assert_eq!(
                report.view(ViewId(1)).and_then(|r| r.plan).map(|p| p.mode),
                Some(RepaintMode::Full),
                "frame {presented} of the new view"
            );
        }

        coordinator.add_redraw_clip(ViewId(1), Some(clip));
        let report = coordinator.redraw_all_views();
        assert_eq!(
            report.view(ViewId(1)).and_then(|r| r.plan).map(|p| p.mode),
            Some(RepaintMode::Clipped {
                logical: clip,
                scissor: Rect::new(100, 10, 20, 20),
            })
        );
    }

    #[test]
    fn deferred_frames_do_not_count_as_presented() {
        let mut coordinator = coordinator_with(RecordingDriver::all_features(), RedrawConfig::default());
        coordinator.realize().expect("realize should succeed");
        coordinator.queue_stage_redraw(None);
        coordinator.redraw_all_views();
        for _ in 0..5 {
            coordinator.queue_stage_redraw(None);
            coordinator.redraw_all_views();
        }
        assert_eq!(coordinator.frame_counter(), 6);
        assert_eq!(coordinator.views()[0].presented_frames(), 1);

        acknowledge_swaps(&mut coordinator);
        coordinator.add_redraw_clip(ViewId(0), Some(Rect::new(5, 5, 5, 5)));
        let report = coordinator.redraw_all_views();
        assert_eq!(
            report.views[0].plan.map(|p| p.mode),
            Some(RepaintMode::Full),
            "still warming up after one presented frame"
        );
    }

    #[test]
    fn clip_at_the_end_of_the_coordinate_range_is_harmless() {
        let mut coordinator = warmed_up(RecordingDriver::new(&[WinsysFeature::SwapRegion]));
        coordinator.add_redraw_clip(ViewId(0), Some(Rect::new(i32::MAX - 10, 0, 100, 100)));
        let report = coordinator.redraw_all_views();
        assert_eq!(
            report.views[0].plan.map(|p| p.mode),
            Some(RepaintMode::Skip)
        );

        coordinator.add_redraw_clip(ViewId(0), Some(Rect::new(10, 10, 20, 20)));
        coordinator.add_redraw_clip(ViewId(0), Some(Rect::new(i32::MAX - 10, 0, 100, 100)));
        let report = coordinator.redraw_all_views();
        assert_eq!(
            report.views[0].plan.map(|p| p.mode),
            Some(RepaintMode::Clipped {
                logical: Rect::new(10, 0, 790, 100),
                scissor: Rect::new(10, 0, 790, 100),
            })
        );
    }

    #[test]
    fn clip_outside_every_view_skips_paint_and_swap() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.context_mut().driver.calls.clear();
        coordinator.context_mut().painter.calls.clear();
        coordinator.add_redraw_clip(ViewId(0), Some(Rect::new(2000, 2000, 5, 5)));
        let report = coordinator.redraw_all_views();
        assert_eq!(
            report.views[0].plan.map(|p| p.mode),
            Some(RepaintMode::Skip)
        );
        assert!(coordinator.context().driver.calls.is_empty());
        assert_eq!(coordinator.context().painter.calls, [PaintCall::FinishFrame]);
    }

    #[test]
    fn unknown_view_clip_is_rejected() {
        let mut coordinator = coordinator_with(RecordingDriver::new(&[]), RedrawConfig::default());
        assert!(!coordinator.add_redraw_clip(ViewId(9), None));
        assert!(coordinator.add_redraw_clip(ViewId(0), None));
        assert!(coordinator.views()[0].redraw_clip().is_whole_view());
    }

    #[test]
    fn unrealize_forgets_in_flight_swaps() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.queue_stage_redraw(None);
        coordinator.redraw_all_views();
        assert_eq!(coordinator.views()[0].pending_swaps(), 1);
        coordinator.unrealize();
        assert_eq!(coordinator.views()[0].pending_swaps(), 0);
        assert_eq!(coordinator.views()[0].presented_frames(), 0, "warm-up starts over");
        assert!(!coordinator.is_realized());
    }

    #[test]
    fn dirty_pixel_reports_last_damage() {
        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.context_mut().driver.buffer_ages.push_back(1);
        coordinator.add_redraw_clip(ViewId(0), Some(Rect::new(30, 40, 5, 5)));
        coordinator.redraw_all_views();
        assert_eq!(coordinator.dirty_pixel(ViewId(0)), Some((30, 40)));
        assert_eq!(coordinator.dirty_pixel(ViewId(5)), None);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn traced_redraw_reports_clip_plan_and_swap() {
        use repaint_core::trace::{
            RedrawClipEvent, RepaintPlanEvent, SwapEvent, TraceSink, Tracer,
        };

        #[derive(Default)]
        struct Sink {
            clips: Vec<RedrawClipEvent>,
            plans: Vec<RepaintPlanEvent>,
            swaps: Vec<SwapEvent>,
        }

        impl TraceSink for Sink {
            fn on_redraw_clip(&mut self, e: &RedrawClipEvent) {
                self.clips.push(*e);
            }

            fn on_repaint_plan(&mut self, e: &RepaintPlanEvent) {
                self.plans.push(*e);
            }

            fn on_swap(&mut self, e: &SwapEvent) {
                self.swaps.push(*e);
            }
        }

        let mut coordinator = warmed_up(RecordingDriver::all_features());
        coordinator.context_mut().driver.buffer_ages.push_back(1);
        let mut sink = Sink::default();
        coordinator.add_redraw_clip_traced(
            ViewId(0),
            Some(Rect::new(4, 4, 4, 4)),
            &mut Tracer::new(&mut sink),
        );
        coordinator.redraw_all_views_traced(&mut Tracer::new(&mut sink));

        assert_eq!(sink.clips.len(), 1);
        assert_eq!(sink.clips[0].bounds, Some(Rect::new(4, 4, 4, 4)));
        assert_eq!(sink.plans.len(), 1);
        assert_eq!(sink.plans[0].frame_index, 4);
        assert_eq!(sink.swaps.len(), 1);
        assert_eq!(sink.swaps[0].kind, SwapKind::WithDamage);
        assert!(sink.swaps[0].swap_id.is_some(), "damage swaps are tracked");
    }
}
