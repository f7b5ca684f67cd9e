// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording collaborators for tests.

use std::cell::Cell;
use std::collections::VecDeque;

use repaint_core::id::ViewId;
use repaint_core::rect::Rect;
use repaint_core::time::{Duration, HostTime};

use crate::context::{
    Framebuffer, FramebufferId, GpuDriver, MonotonicClock, ScenePainter, WinsysFeature,
};
use crate::presentation::SwapId;

/// A call made on [`RecordingDriver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DriverCall {
    QueryBufferAge(FramebufferId),
    SwapBuffers(FramebufferId),
    SwapWithDamage(FramebufferId, Vec<Rect>),
    SwapRegion(FramebufferId, Vec<Rect>),
    PushScissor(FramebufferId, Rect),
    PopClip(FramebufferId),
    Finish(FramebufferId),
}

/// A [`GpuDriver`] that records every call.
#[derive(Debug)]
pub(crate) struct RecordingDriver {
    pub(crate) calls: Vec<DriverCall>,
    pub(crate) features: Vec<WinsysFeature>,
    pub(crate) has_context: bool,
    /// Ages returned by successive queries; `default_age` once empty.
    pub(crate) buffer_ages: VecDeque<i32>,
    pub(crate) default_age: i32,
    /// Ids of asynchronous swaps, in issue order.
    pub(crate) issued: Vec<SwapId>,
    pub(crate) gpu_now: HostTime,
}

impl RecordingDriver {
    pub(crate) fn new(features: &[WinsysFeature]) -> Self {
        Self {
            calls: Vec::new(),
            features: features.to_vec(),
            has_context: true,
            buffer_ages: VecDeque::new(),
            default_age: 0,
            issued: Vec::new(),
            gpu_now: HostTime(0),
        }
    }

    pub(crate) fn all_features() -> Self {
        Self::new(&[
            WinsysFeature::SwapRegion,
            WinsysFeature::BufferAge,
            WinsysFeature::SwapEvents,
            WinsysFeature::MultipleOnscreen,
        ])
    }

    /// Counts the presentation calls made so far.
    pub(crate) fn swap_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    DriverCall::SwapBuffers(_)
                        | DriverCall::SwapWithDamage(..)
                        | DriverCall::SwapRegion(..)
                )
            })
            .count()
    }
}

impl GpuDriver for RecordingDriver {
    fn has_context(&self) -> bool {
        self.has_context
    }

    fn has_feature(&self, feature: WinsysFeature) -> bool {
        self.features.contains(&feature)
    }

    fn clock_time(&self) -> HostTime {
        self.gpu_now
    }

    fn query_buffer_age(&mut self, framebuffer: &Framebuffer) -> i32 {
        self.calls.push(DriverCall::QueryBufferAge(framebuffer.id));
        self.buffer_ages.pop_front().unwrap_or(self.default_age)
    }

    fn swap_buffers(&mut self, framebuffer: &Framebuffer, swap: SwapId) {
        self.calls.push(DriverCall::SwapBuffers(framebuffer.id));
        self.issued.push(swap);
    }

    fn swap_buffers_with_damage(&mut self, framebuffer: &Framebuffer, damage: &[Rect], swap: SwapId) {
        self.calls
            .push(DriverCall::SwapWithDamage(framebuffer.id, damage.to_vec()));
        self.issued.push(swap);
    }

    fn swap_region(&mut self, framebuffer: &Framebuffer, region: &[Rect]) {
        self.calls
            .push(DriverCall::SwapRegion(framebuffer.id, region.to_vec()));
    }

    fn push_scissor_clip(&mut self, framebuffer: &Framebuffer, rect: Rect) {
        self.calls.push(DriverCall::PushScissor(framebuffer.id, rect));
    }

    fn pop_clip(&mut self, framebuffer: &Framebuffer) {
        self.calls.push(DriverCall::PopClip(framebuffer.id));
    }

    fn framebuffer_finish(&mut self, framebuffer: &Framebuffer) {
        self.calls.push(DriverCall::Finish(framebuffer.id));
    }
}

/// A call made on [`RecordingPainter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PaintCall {
    Paint(ViewId, Option<Rect>),
    Blit(ViewId, Rect),
    Outline(ViewId, Rect),
    FinishFrame,
}

/// A [`ScenePainter`] that records every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingPainter {
    pub(crate) calls: Vec<PaintCall>,
}

impl RecordingPainter {
    /// Paint calls for one view, in order.
    pub(crate) fn paints_of(&self, view: ViewId) -> Vec<Option<Rect>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PaintCall::Paint(v, clip) if *v == view => Some(*clip),
                _ => None,
            })
            .collect()
    }
}

impl ScenePainter for RecordingPainter {
    fn paint_view(&mut self, view: ViewId, clip: Option<Rect>) {
        self.calls.push(PaintCall::Paint(view, clip));
    }

    fn blit_offscreen_to_onscreen(&mut self, view: ViewId, clip: Rect) {
        self.calls.push(PaintCall::Blit(view, clip));
    }

    fn outline_redraw_clip(&mut self, view: ViewId, clip: Rect) {
        self.calls.push(PaintCall::Outline(view, clip));
    }

    fn finish_frame(&mut self) {
        self.calls.push(PaintCall::FinishFrame);
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub(crate) struct ManualClock {
    now: Cell<HostTime>,
}

impl ManualClock {
    pub(crate) fn at(now: HostTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> HostTime {
        self.now.get()
    }
}
