// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborators the redraw pipeline drives.
//!
//! The stage never talks to a GPU API or a scene graph directly. Everything
//! it needs goes through three traits:
//!
//! - [`GpuDriver`]: swap chain, scissor and feature queries.
//! - [`ScenePainter`]: paints the actor tree of a view.
//! - [`MonotonicClock`]: the clock frame pacing runs on.
//!
//! They are bundled into an explicitly passed [`RenderContext`] instead of
//! living in process-wide state.

use repaint_core::id::ViewId;
use repaint_core::planner::Capabilities;
use repaint_core::rect::Rect;
use repaint_core::time::HostTime;

use crate::presentation::SwapId;

/// Identifies a framebuffer owned by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct FramebufferId(pub u32);

/// Whether a framebuffer can be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FramebufferKind {
    /// A swap chain surface.
    Onscreen,
    /// A render target that is never presented directly.
    Offscreen,
}

/// A framebuffer as seen by the redraw pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Framebuffer {
    /// Driver handle.
    pub id: FramebufferId,
    /// Onscreen or offscreen.
    pub kind: FramebufferKind,
    /// Width in physical pixels.
    pub width: i32,
    /// Height in physical pixels.
    pub height: i32,
}

impl Framebuffer {
    /// Describes an onscreen framebuffer.
    #[must_use]
    pub const fn onscreen(id: FramebufferId, width: i32, height: i32) -> Self {
        Self {
            id,
            kind: FramebufferKind::Onscreen,
            width,
            height,
        }
    }

    /// Describes an offscreen framebuffer.
    #[must_use]
    pub const fn offscreen(id: FramebufferId, width: i32, height: i32) -> Self {
        Self {
            id,
            kind: FramebufferKind::Offscreen,
            width,
            height,
        }
    }

    /// Returns `true` for swap chain surfaces.
    #[inline]
    #[must_use]
    pub const fn is_onscreen(&self) -> bool {
        matches!(self.kind, FramebufferKind::Onscreen)
    }
}

/// Optional window system features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WinsysFeature {
    /// Synchronous copy of a sub-region of the back buffer.
    SwapRegion,
    /// Querying how many frames old the current back buffer is.
    BufferAge,
    /// Asynchronous swap completion events.
    SwapEvents,
    /// More than one onscreen framebuffer at a time.
    MultipleOnscreen,
}

/// The GPU and window system as needed by the redraw pipeline.
///
/// Rectangles are in framebuffer pixels with a top-left origin; drivers
/// whose window system uses another convention convert them.
pub trait GpuDriver {
    /// Returns `true` once a GPU context exists.
    fn has_context(&self) -> bool;

    /// Queries an optional feature.
    fn has_feature(&self, feature: WinsysFeature) -> bool;

    /// Current time on the clock presentation timestamps are reported in.
    fn clock_time(&self) -> HostTime;

    /// Age of the current back buffer; `0` or less when unknown.
    fn query_buffer_age(&mut self, framebuffer: &Framebuffer) -> i32;

    /// Presents the whole back buffer.
    fn swap_buffers(&mut self, framebuffer: &Framebuffer, swap: SwapId);

    /// Presents the back buffer, declaring only `damage` as changed. An empty
    /// slice means the whole buffer changed.
    fn swap_buffers_with_damage(&mut self, framebuffer: &Framebuffer, damage: &[Rect], swap: SwapId);

    /// Copies `region` of the back buffer to the front buffer. Completes
    /// synchronously.
    fn swap_region(&mut self, framebuffer: &Framebuffer, region: &[Rect]);

    /// Restricts drawing to `rect` until the matching [`pop_clip`](Self::pop_clip).
    fn push_scissor_clip(&mut self, framebuffer: &Framebuffer, rect: Rect);

    /// Removes the most recently pushed clip.
    fn pop_clip(&mut self, framebuffer: &Framebuffer);

    /// Flushes rendering and waits for it to complete.
    fn framebuffer_finish(&mut self, framebuffer: &Framebuffer);
}

/// Paints the scene of a view into the currently bound framebuffer.
pub trait ScenePainter {
    /// Paints the view, restricted to `clip` in logical stage space, or
    /// everything when `clip` is `None`.
    fn paint_view(&mut self, view: ViewId, clip: Option<Rect>);

    /// Copies the view's offscreen framebuffer into its onscreen buffer.
    fn blit_offscreen_to_onscreen(&mut self, view: ViewId, clip: Rect);

    /// Draws an outline of a redraw clip, for debugging.
    fn outline_redraw_clip(&mut self, view: ViewId, clip: Rect) {
        _ = (view, clip);
    }

    /// Called once after all views of a frame have been drawn.
    fn finish_frame(&mut self) {}
}

/// A monotonic clock.
pub trait MonotonicClock {
    /// Current time.
    fn now(&self) -> HostTime;
}

/// Everything the redraw pipeline talks to.
#[derive(Debug)]
pub struct RenderContext<D, P, C> {
    /// GPU and window system.
    pub driver: D,
    /// Scene painter.
    pub painter: P,
    /// Pacing clock.
    pub clock: C,
}

impl<D, P, C> RenderContext<D, P, C> {
    /// Bundles the collaborators.
    pub const fn new(driver: D, painter: P, clock: C) -> Self {
        Self {
            driver,
            painter,
            clock,
        }
    }
}

/// Capabilities the driver offers for drawing into `framebuffer`.
///
/// Partial swaps and buffer age only make sense for onscreen buffers.
#[must_use]
pub fn capabilities_for(driver: &impl GpuDriver, framebuffer: &Framebuffer) -> Capabilities {
    let onscreen = framebuffer.is_onscreen();
    Capabilities {
        swap_region: onscreen && driver.has_feature(WinsysFeature::SwapRegion),
        buffer_age: onscreen && driver.has_feature(WinsysFeature::BufferAge),
    }
}
