// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the redraw pipeline.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! redraw loop calls as a frame moves from clip accumulation to presentation.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.

use crate::id::ViewId;
use crate::pacer::UpdateTime;
use crate::planner::{RepaintMode, RepaintPlan};
use crate::rect::Rect;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which presentation call ended a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwapKind {
    /// Plain full-buffer swap.
    Full,
    /// Swap with an explicit damage list (empty for the whole buffer).
    WithDamage,
    /// Synchronous sub-region copy.
    Region,
    /// No swap; offscreen framebuffer finished instead.
    Finish,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a redraw clip is queued on a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RedrawClipEvent {
    /// Target view.
    pub view: ViewId,
    /// Queued logical rectangle; `None` for the whole view.
    pub clip: Option<Rect>,
    /// Accumulated bounding box after the request, if bounded.
    pub bounds: Option<Rect>,
}

/// Emitted after a view's frame has been planned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepaintPlanEvent {
    /// Stage frame counter.
    pub frame_index: u64,
    /// Planned view.
    pub view: ViewId,
    /// Chosen mode.
    pub mode: RepaintMode,
    /// Whether the swap will carry damage.
    pub swap_with_damage: bool,
    /// Physical damage recorded for the frame.
    pub recorded_damage: Option<Rect>,
}

impl RepaintPlanEvent {
    /// Creates an event from a plan.
    #[must_use]
    pub fn new(frame_index: u64, view: ViewId, plan: &RepaintPlan) -> Self {
        Self {
            frame_index,
            view,
            mode: plan.mode,
            swap_with_damage: plan.swap_with_damage,
            recorded_damage: plan.recorded_damage,
        }
    }
}

/// Emitted when a back buffer age was queried.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferAgeEvent {
    /// Stage frame counter.
    pub frame_index: u64,
    /// Queried view.
    pub view: ViewId,
    /// Age reported by the driver.
    pub age: i32,
    /// Repair region in framebuffer pixels, if the age was usable.
    pub repair: Option<Rect>,
}

/// Emitted when a frame is handed to the display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwapEvent {
    /// Stage frame counter.
    pub frame_index: u64,
    /// Swapped view.
    pub view: ViewId,
    /// Which call was made.
    pub kind: SwapKind,
    /// Swapped region in onscreen pixels; `None` for the whole buffer.
    pub region: Option<Rect>,
    /// Identifier of the in-flight swap, for asynchronous swaps.
    pub swap_id: Option<u64>,
    /// Host time at submission.
    pub submitted_at: HostTime,
}

/// Emitted when presentation feedback is processed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentationEvent {
    /// View the feedback was for.
    pub view: ViewId,
    /// Swap the feedback was matched to, if any.
    pub swap_id: Option<u64>,
    /// Presentation time in the monotonic domain, if reported.
    pub presented_at: Option<HostTime>,
    /// Reported refresh rate in Hz.
    pub refresh_rate: f32,
    /// `true` if the feedback matched no in-flight swap and was dropped.
    pub spurious: bool,
}

/// Emitted when an update is scheduled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduleEvent {
    /// Scheduled view.
    pub view: ViewId,
    /// Host time of the request.
    pub now: HostTime,
    /// Requested delay after the last presentation.
    pub sync_delay_ms: i32,
    /// Resulting update time.
    pub update: UpdateTime,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the redraw loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a redraw clip is queued.
    fn on_redraw_clip(&mut self, e: &RedrawClipEvent) {
        _ = e;
    }

    /// Called after a frame has been planned.
    fn on_repaint_plan(&mut self, e: &RepaintPlanEvent) {
        _ = e;
    }

    /// Called after a buffer age query.
    fn on_buffer_age(&mut self, e: &BufferAgeEvent) {
        _ = e;
    }

    /// Called when a frame is swapped or finished.
    fn on_swap(&mut self, e: &SwapEvent) {
        _ = e;
    }

    /// Called when presentation feedback is processed.
    fn on_presentation(&mut self, e: &PresentationEvent) {
        _ = e;
    }

    /// Called when an update is scheduled.
    fn on_schedule(&mut self, e: &ScheduleEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Expands to a `Tracer` method forwarding one event to the sink.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident, $event:ty, $sink_method:ident) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$sink_method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`RedrawClipEvent`].
        redraw_clip, RedrawClipEvent, on_redraw_clip
    );
    forward!(
        /// Emits a [`RepaintPlanEvent`].
        repaint_plan, RepaintPlanEvent, on_repaint_plan
    );
    forward!(
        /// Emits a [`BufferAgeEvent`].
        buffer_age, BufferAgeEvent, on_buffer_age
    );
    forward!(
        /// Emits a [`SwapEvent`].
        swap, SwapEvent, on_swap
    );
    forward!(
        /// Emits a [`PresentationEvent`].
        presentation, PresentationEvent, on_presentation
    );
    forward!(
        /// Emits a [`ScheduleEvent`].
        schedule, ScheduleEvent, on_schedule
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct CountingSink {
        swaps: Vec<SwapKind>,
        plans: u32,
    }

    impl TraceSink for CountingSink {
        fn on_repaint_plan(&mut self, _e: &RepaintPlanEvent) {
            self.plans += 1;
        }

        fn on_swap(&mut self, e: &SwapEvent) {
            self.swaps.push(e.kind);
        }
    }

    fn sample_swap() -> SwapEvent {
        SwapEvent {
            frame_index: 4,
            view: ViewId(0),
            kind: SwapKind::Region,
            region: Some(Rect::new(0, 0, 8, 8)),
            swap_id: None,
            submitted_at: HostTime(1_000),
        }
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        let mut tracer = Tracer::new(&mut sink);
        tracer.swap(&sample_swap());
        tracer.schedule(&ScheduleEvent {
            view: ViewId(1),
            now: HostTime(5),
            sync_delay_ms: 0,
            update: UpdateTime::Immediate(HostTime(5)),
        });
    }

    #[test]
    fn tracer_none_discards() {
        let mut tracer = Tracer::none();
        tracer.swap(&sample_swap());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        let mut sink = CountingSink::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.swap(&sample_swap());
            tracer.buffer_age(&BufferAgeEvent {
                frame_index: 4,
                view: ViewId(0),
                age: 2,
                repair: None,
            });
        }
        assert_eq!(sink.swaps, [SwapKind::Region]);
        assert_eq!(sink.plans, 0);
    }

    #[cfg(not(feature = "trace"))]
    #[test]
    fn tracer_is_inert_without_feature() {
        let mut sink = CountingSink::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.swap(&sample_swap());
        }
        assert!(sink.swaps.is_empty());
        assert_eq!(sink.plans, 0);
    }
}
