// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event, in
//! arrival order, as a [`RecordedEvent`].

use repaint_core::id::ViewId;
use repaint_core::trace::{
    BufferAgeEvent, PresentationEvent, RedrawClipEvent, RepaintPlanEvent, ScheduleEvent,
    SwapEvent, TraceSink,
};

/// One recorded trace event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A redraw clip was queued.
    RedrawClip(RedrawClipEvent),
    /// A frame was planned.
    RepaintPlan(RepaintPlanEvent),
    /// The back buffer age was queried.
    BufferAge(BufferAgeEvent),
    /// A frame was presented (or finished).
    Swap(SwapEvent),
    /// Presentation feedback arrived.
    Presentation(PresentationEvent),
    /// An update was scheduled.
    Schedule(ScheduleEvent),
}

impl RecordedEvent {
    /// The view the event is about.
    #[must_use]
    pub fn view(&self) -> ViewId {
        match self {
            Self::RedrawClip(e) => e.view,
            Self::RepaintPlan(e) => e.view,
            Self::BufferAge(e) => e.view,
            Self::Swap(e) => e.view,
            Self::Presentation(e) => e.view,
            Self::Schedule(e) => e.view,
        }
    }
}

/// A [`TraceSink`] that records events in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Recorded events of one view.
    pub fn events_for(&self, view: ViewId) -> impl Iterator<Item = &RecordedEvent> + '_ {
        self.events.iter().filter(move |e| e.view() == view)
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_redraw_clip(&mut self, e: &RedrawClipEvent) {
        self.events.push(RecordedEvent::RedrawClip(*e));
    }

    fn on_repaint_plan(&mut self, e: &RepaintPlanEvent) {
        self.events.push(RecordedEvent::RepaintPlan(*e));
    }

    fn on_buffer_age(&mut self, e: &BufferAgeEvent) {
        self.events.push(RecordedEvent::BufferAge(*e));
    }

    fn on_swap(&mut self, e: &SwapEvent) {
        self.events.push(RecordedEvent::Swap(*e));
    }

    fn on_presentation(&mut self, e: &PresentationEvent) {
        self.events.push(RecordedEvent::Presentation(*e));
    }

    fn on_schedule(&mut self, e: &ScheduleEvent) {
        self.events.push(RecordedEvent::Schedule(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordedEvent, RecorderSink};
    use repaint_core::id::ViewId;
    use repaint_core::pacer::UpdateTime;
    use repaint_core::rect::Rect;
    use repaint_core::time::HostTime;
    use repaint_core::trace::{
        BufferAgeEvent, RedrawClipEvent, ScheduleEvent, SwapEvent, SwapKind, Tracer,
    };

    #[test]
    fn records_through_tracer_in_order() {
        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            tracer.redraw_clip(&RedrawClipEvent {
                view: ViewId(0),
                clip: Some(Rect::new(1, 2, 3, 4)),
                bounds: Some(Rect::new(1, 2, 3, 4)),
            });
            tracer.buffer_age(&BufferAgeEvent {
                frame_index: 9,
                view: ViewId(1),
                age: 2,
                repair: None,
            });
            tracer.swap(&SwapEvent {
                frame_index: 9,
                view: ViewId(0),
                kind: SwapKind::WithDamage,
                region: None,
                swap_id: Some(3),
                submitted_at: HostTime(500),
            });
        }

        let events = rec.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], RecordedEvent::RedrawClip(_)));
        assert!(matches!(events[1], RecordedEvent::BufferAge(e) if e.age == 2));
        assert!(matches!(events[2], RecordedEvent::Swap(e) if e.swap_id == Some(3)));
        assert_eq!(rec.events_for(ViewId(0)).count(), 2);
    }

    #[test]
    fn clear_and_into_events() {
        let mut rec = RecorderSink::new();
        let mut tracer = Tracer::new(&mut rec);
        tracer.schedule(&ScheduleEvent {
            view: ViewId(0),
            now: HostTime(1),
            sync_delay_ms: -1,
            update: UpdateTime::Immediate(HostTime(1)),
        });
        rec.clear();
        assert!(rec.events().is_empty());
        assert!(rec.into_events().is_empty());
    }
}
