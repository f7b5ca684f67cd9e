// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint planning.
//!
//! [`RepaintPlanner::plan`] looks at the redraw clip accumulated for a view
//! and decides how the frame is drawn:
//!
//! - [`RepaintMode::Full`]: the whole view is repainted and swapped.
//! - [`RepaintMode::Clipped`]: only a sub-rectangle is repainted, scissored in
//!   framebuffer pixels.
//! - [`RepaintMode::Skip`]: the queued damage is not visible in this view; no
//!   paint and no swap.
//!
//! A clipped redraw needs either a partial swap (`swap_region`) or a buffer
//! age query from the driver. With buffer age, the clip is grown by every
//! region the reused back buffer missed, using the view's [`DamageHistory`].
//! Whenever something cannot be trusted (unknown buffer age, first frames of
//! a new surface, no capability) the plan degrades to a full repaint.
//!
//! Logical and physical spaces are related by the view's scale:
//!
//! ```text
//!   physical.x = floor((logical.x - layout.x) * scale)
//!   physical.w = ceil(logical.w * scale)
//!   logical.x  = layout.x + floor(physical.x / scale)
//!   logical.w  = ceil(physical.w / scale)
//! ```
//!
//! At fractional scales a logical edge can fall inside a physical pixel, so
//! interior edges of the scissor are pushed out by `ceil(scale)` pixels.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::clip::RedrawClip;
use crate::config::RedrawConfig;
use crate::damage::DamageHistory;
use crate::rect::Rect;

/// Placement and pixel density of a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewGeometry {
    /// The view's rectangle in logical stage space.
    pub layout: Rect,
    /// Physical pixels per logical pixel.
    pub scale: f32,
    /// Width of the view's framebuffer in physical pixels.
    pub framebuffer_width: i32,
    /// Height of the view's framebuffer in physical pixels.
    pub framebuffer_height: i32,
}

impl ViewGeometry {
    /// Creates a geometry whose framebuffer exactly covers the scaled layout.
    #[must_use]
    pub fn new(layout: Rect, scale: f32) -> Self {
        let physical = physical_size(layout, scale);
        Self {
            layout,
            scale,
            framebuffer_width: physical.width,
            framebuffer_height: physical.height,
        }
    }

    /// Returns `true` if the scale is not a whole number.
    #[inline]
    #[must_use]
    pub fn is_fractional_scale(&self) -> bool {
        let scale = f64::from(self.scale);
        scale > scale.floor()
    }

    /// The whole view in physical pixels, anchored at the origin.
    #[must_use]
    pub fn physical_view_rect(&self) -> Rect {
        physical_size(self.layout, self.scale)
    }

    /// Converts a logical stage rectangle into framebuffer pixels.
    #[must_use]
    pub fn to_physical(&self, logical: Rect) -> Rect {
        let scale = f64::from(self.scale);
        Rect::new(
            floor_to_i32(f64::from(logical.x - self.layout.x) * scale),
            floor_to_i32(f64::from(logical.y - self.layout.y) * scale),
            ceil_to_i32(f64::from(logical.width) * scale),
            ceil_to_i32(f64::from(logical.height) * scale),
        )
    }

    /// Converts a framebuffer rectangle back into logical stage space.
    #[must_use]
    pub fn to_logical(&self, physical: Rect) -> Rect {
        let scale = f64::from(self.scale);
        Rect::new(
            self.layout.x + floor_to_i32(f64::from(physical.x) / scale),
            self.layout.y + floor_to_i32(f64::from(physical.y) / scale),
            ceil_to_i32(f64::from(physical.width) / scale),
            ceil_to_i32(f64::from(physical.height) / scale),
        )
    }

    /// Clamps a physical rectangle to the framebuffer.
    #[must_use]
    pub fn clamp_to_framebuffer(&self, physical: Rect) -> Rect {
        Rect::from_edges(
            physical.x.max(0),
            physical.y.max(0),
            physical.right().min(self.framebuffer_width),
            physical.bottom().min(self.framebuffer_height),
        )
    }
}

/// What the driver can do for the view's current framebuffer.
///
/// Offscreen framebuffers never have either capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Sub-region swaps (`swap_region`) are supported.
    pub swap_region: bool,
    /// The age of the current back buffer can be queried.
    pub buffer_age: bool,
}

/// How a frame is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepaintMode {
    /// Repaint the whole view.
    Full,
    /// Repaint only part of the view.
    Clipped {
        /// The area to paint in logical stage space.
        logical: Rect,
        /// The scissor in framebuffer pixels.
        scissor: Rect,
    },
    /// Nothing visible changed; neither paint nor swap.
    Skip,
}

/// Region used to visualize a redraw that would have been clipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugClip {
    /// The would-be paint area in logical stage space.
    pub logical: Rect,
    /// The would-be scissor in framebuffer pixels.
    pub scissor: Rect,
}

/// Outcome of planning one frame of one view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepaintPlan {
    /// How to paint.
    pub mode: RepaintMode,
    /// Swap with an explicit damage region (buffer age was used).
    pub swap_with_damage: bool,
    /// Set when clipped redraws are disabled for debugging but would have
    /// been possible: the full paint is scissored to this region instead.
    pub debug_clip: Option<DebugClip>,
    /// Logical redraw clip to outline, when outlines are enabled.
    pub outline: Option<Rect>,
    /// The back buffer age reported by the driver, if it was queried.
    pub buffer_age: Option<i32>,
    /// The physical damage recorded into the history for this frame.
    pub recorded_damage: Option<Rect>,
}

impl RepaintPlan {
    fn skip() -> Self {
        Self {
            mode: RepaintMode::Skip,
            swap_with_damage: false,
            debug_clip: None,
            outline: None,
            buffer_age: None,
            recorded_damage: None,
        }
    }

    /// The region to present, in framebuffer pixels; `None` means the whole
    /// buffer.
    #[must_use]
    pub fn swap_region(&self) -> Option<Rect> {
        match self.mode {
            RepaintMode::Clipped { scissor, .. } => Some(scissor),
            RepaintMode::Full | RepaintMode::Skip => None,
        }
    }

    /// Returns `true` if the frame is neither painted nor swapped.
    #[inline]
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self.mode, RepaintMode::Skip)
    }
}

/// Decides between full and clipped repaints.
#[derive(Clone, Copy, Debug)]
pub struct RepaintPlanner {
    warmup_frames: u64,
    allow_clipped_redraws: bool,
    paint_redraw_outlines: bool,
}

impl RepaintPlanner {
    /// Creates a planner from the redraw configuration.
    #[must_use]
    pub fn new(config: &RedrawConfig) -> Self {
        Self {
            warmup_frames: config.warmup_frames,
            allow_clipped_redraws: config.allow_clipped_redraws,
            paint_redraw_outlines: config.paint_redraw_outlines,
        }
    }

    /// Plans the current frame of a view.
    ///
    /// `presented_frames` is the number of frames this view has presented so
    /// far; clipped redraws are refused until it exceeds the warm-up count.
    /// `query_buffer_age` is only called when the frame could be clipped and
    /// the driver supports buffer age.
    ///
    /// Records this frame's damage into `history` unless the plan is
    /// [`RepaintMode::Skip`]. With a usable buffer age the repair region is
    /// also unioned into `clip`.
    pub fn plan(
        &self,
        view: &ViewGeometry,
        caps: Capabilities,
        presented_frames: u64,
        clip: &mut RedrawClip,
        history: &mut DamageHistory,
        query_buffer_age: impl FnOnce() -> i32,
    ) -> RepaintPlan {
        // Outer `None`: whole view. Inner `None`: nothing of the clip is
        // visible in this view.
        let visible = clip
            .bounding_rect()
            .map(|bounds| bounds.intersection(view.layout));
        let have_clip = match visible {
            None => false,
            Some(None) => true,
            Some(Some(rect)) => rect != view.layout,
        };

        let may_clip = (caps.swap_region || caps.buffer_age)
            && have_clip
            && presented_frames > self.warmup_frames;
        let mut use_clipped = may_clip && self.allow_clipped_redraws;

        let visible = visible.flatten();
        let mut fb_region = if may_clip {
            visible.map(|rect| self.fb_clip_region(view, rect))
        } else {
            None
        };

        if use_clipped && fb_region.is_none() {
            return RepaintPlan::skip();
        }

        let mut swap_with_damage = false;
        let mut buffer_age = None;
        let recorded_damage;
        match fb_region {
            Some(region) if use_clipped && caps.buffer_age => {
                // The tentative damage goes in first: the repair region
                // covers this frame as well as the ones the buffer missed.
                history.record(region);
                let age = query_buffer_age();
                buffer_age = Some(age);
                if history.is_valid_age(age) {
                    let repair = history.union_over_age(age);
                    clip.union_repair(view.to_logical(repair));
                    fb_region = Some(repair);
                    swap_with_damage = true;
                    recorded_damage = region;
                } else {
                    use_clipped = false;
                    recorded_damage = view.physical_view_rect();
                    history.replace_latest(recorded_damage);
                }
            }
            Some(region) if use_clipped => {
                recorded_damage = region;
                history.record(region);
            }
            _ => {
                recorded_damage = view.physical_view_rect();
                history.record(recorded_damage);
            }
        }

        let mode = match fb_region {
            Some(scissor) if use_clipped => RepaintMode::Clipped {
                logical: view.to_logical(scissor),
                scissor,
            },
            _ => RepaintMode::Full,
        };

        let debug_clip = if may_clip && !self.allow_clipped_redraws {
            fb_region.map(|scissor| DebugClip {
                logical: view.to_logical(scissor),
                scissor,
            })
        } else {
            None
        };

        let outline = if may_clip && self.paint_redraw_outlines {
            visible
        } else {
            None
        };

        RepaintPlan {
            mode,
            swap_with_damage,
            debug_clip,
            outline,
            buffer_age,
            recorded_damage: Some(recorded_damage),
        }
    }

    /// Scales a visible logical clip into framebuffer pixels, applying
    /// subpixel compensation to interior edges at fractional scales.
    fn fb_clip_region(&self, view: &ViewGeometry, visible: Rect) -> Rect {
        let raw = view.to_physical(visible);
        if !view.is_fractional_scale() {
            return view.clamp_to_framebuffer(raw);
        }

        let compensation = ceil_to_i32(f64::from(view.scale));
        let left = if raw.x > 0 { raw.x - compensation } else { raw.x };
        let top = if raw.y > 0 { raw.y - compensation } else { raw.y };
        let right = if raw.right() < view.framebuffer_width {
            raw.right() + compensation
        } else {
            raw.right()
        };
        let bottom = if raw.bottom() < view.framebuffer_height {
            raw.bottom() + compensation
        } else {
            raw.bottom()
        };
        view.clamp_to_framebuffer(Rect::from_edges(left, top, right, bottom))
    }
}

fn physical_size(layout: Rect, scale: f32) -> Rect {
    let scale = f64::from(scale);
    Rect::from_size(
        ceil_to_i32(f64::from(layout.width) * scale),
        ceil_to_i32(f64::from(layout.height) * scale),
    )
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates fit in i32; the cast saturates otherwise"
)]
fn floor_to_i32(value: f64) -> i32 {
    value.floor() as i32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates fit in i32; the cast saturates otherwise"
)]
fn ceil_to_i32(value: f64) -> i32 {
    value.ceil() as i32
}
