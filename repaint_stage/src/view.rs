// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage views.
//!
//! A [`View`] is one independently damage-tracked part of a stage, usually
//! one per output. It owns its damage history, its redraw clip for the
//! current frame, its frame pacer and its in-flight swaps. Views never share
//! any of that state.

use repaint_core::clip::RedrawClip;
use repaint_core::config::RedrawConfig;
use repaint_core::damage::DamageHistory;
use repaint_core::id::ViewId;
use repaint_core::pacer::FramePacer;
use repaint_core::planner::ViewGeometry;
use repaint_core::rect::Rect;
use repaint_core::transform::OnscreenTransform;

use crate::context::Framebuffer;
use crate::presentation::InFlightSwaps;

/// A view of a stage together with its redraw state.
#[derive(Debug)]
pub struct View {
    id: ViewId,
    geometry: ViewGeometry,
    framebuffer: Framebuffer,
    onscreen: Option<(Framebuffer, OnscreenTransform)>,
    pub(crate) history: DamageHistory,
    pub(crate) clip: RedrawClip,
    pub(crate) pacer: FramePacer,
    pub(crate) swaps: InFlightSwaps,
    pub(crate) presented_frames: u64,
}

impl View {
    /// Creates a view painting directly into `framebuffer`.
    ///
    /// `layout` is the view's rectangle in logical stage space and `scale`
    /// the number of framebuffer pixels per logical pixel.
    #[must_use]
    pub fn new(
        id: ViewId,
        layout: Rect,
        scale: f32,
        framebuffer: Framebuffer,
        config: &RedrawConfig,
    ) -> Self {
        let geometry = ViewGeometry {
            layout,
            scale,
            framebuffer_width: framebuffer.width,
            framebuffer_height: framebuffer.height,
        };
        Self {
            id,
            geometry,
            framebuffer,
            onscreen: None,
            history: DamageHistory::new(config.damage_history_capacity),
            clip: RedrawClip::new(),
            pacer: FramePacer::new(config),
            swaps: InFlightSwaps::default(),
            presented_frames: 0,
        }
    }

    /// Paints into `framebuffer` as before, but presents through a separate
    /// onscreen buffer the painted frame is blitted into.
    #[must_use]
    pub fn with_onscreen(mut self, onscreen: Framebuffer, transform: OnscreenTransform) -> Self {
        self.onscreen = Some((onscreen, transform));
        self
    }

    /// The view's id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Layout, scale and framebuffer size.
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &ViewGeometry {
        &self.geometry
    }

    /// The framebuffer the scene is painted into.
    #[inline]
    #[must_use]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// The framebuffer that is presented. Same as
    /// [`framebuffer`](Self::framebuffer) unless a separate onscreen buffer
    /// was configured.
    #[must_use]
    pub fn onscreen(&self) -> &Framebuffer {
        self.onscreen
            .as_ref()
            .map_or(&self.framebuffer, |(onscreen, _)| onscreen)
    }

    /// Returns `true` when the painted frame has to be blitted to a separate
    /// onscreen buffer.
    #[inline]
    #[must_use]
    pub fn has_separate_onscreen(&self) -> bool {
        self.onscreen.is_some()
    }

    /// Maps a swap region from the painted framebuffer to the onscreen one.
    #[must_use]
    pub fn to_onscreen_region(&self, region: Rect) -> Rect {
        match self.onscreen {
            Some((_, transform)) => {
                transform.map_rect(region, self.framebuffer.width, self.framebuffer.height)
            }
            None => region,
        }
    }

    /// This frame's accumulated redraw clip.
    #[inline]
    #[must_use]
    pub fn redraw_clip(&self) -> &RedrawClip {
        &self.clip
    }

    /// The view's frame pacer.
    #[inline]
    #[must_use]
    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    /// The view's damage history.
    #[inline]
    #[must_use]
    pub fn damage_history(&self) -> &DamageHistory {
        &self.history
    }

    /// Number of asynchronous swaps still awaiting completion.
    #[inline]
    #[must_use]
    pub fn pending_swaps(&self) -> u32 {
        self.pacer.pending_swaps()
    }

    /// Number of frames presented since the view was added or last
    /// realized. Clipped redraws wait until this passes the warm-up count.
    #[inline]
    #[must_use]
    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }

    /// A stage position that was repainted in the most recent frame.
    ///
    /// Picking reads back a pixel of the current frame, which must be one
    /// that actually got painted. Without buffer age support the damage
    /// history may not describe the back buffer, and at fractional scales a
    /// logical position may not land on a physical pixel; in both cases the
    /// view origin pixel `(0, 0)` is returned.
    #[must_use]
    pub fn dirty_pixel(&self, has_buffer_age: bool) -> (i32, i32) {
        if !has_buffer_age || self.geometry.is_fractional_scale() {
            return (0, 0);
        }
        match self.history.latest() {
            Some(damage) => {
                let logical = self.geometry.to_logical(damage);
                (logical.x, logical.y)
            }
            None => (0, 0),
        }
    }

    /// Drops per-frame and in-flight state, keeping presentation timing.
    /// The next realize starts a fresh warm-up.
    pub(crate) fn reset_for_unrealize(&mut self) {
        self.clip.reset();
        self.presented_frames = 0;
        self.pacer.swaps_completed(u32::MAX);
        self.pacer.clear_update_time();
        self.swaps.clear();
    }
}
