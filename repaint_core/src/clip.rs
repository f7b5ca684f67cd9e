// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame redraw clip accumulation.
//!
//! While a frame is being prepared, actors queue redraws of the parts of the
//! stage they cover. [`RedrawClip`] folds those requests into a single
//! logical-space bounding box, or gives up and marks the whole view dirty.
//!
//! "Nothing queued yet" and "whole view" are distinct states. Neither is ever
//! encoded as a zero-sized rectangle: zero-sized requests are simply dropped.

use crate::rect::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum ClipState {
    #[default]
    Uninitialized,
    WholeView,
    Bounded(Rect),
}

/// The accumulated redraw area of one view for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RedrawClip {
    state: ClipState,
}

impl RedrawClip {
    /// Creates an uninitialized accumulator.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ClipState::Uninitialized,
        }
    }

    /// Returns to the uninitialized state for the next frame.
    #[inline]
    pub fn reset(&mut self) {
        self.state = ClipState::Uninitialized;
    }

    /// Adds a redraw request.
    ///
    /// `None` marks the whole view dirty; once that has happened, further
    /// requests in the same frame are ignored. Requests with zero width or
    /// height are ignored.
    pub fn add_clip(&mut self, clip: Option<Rect>) {
        match (self.state, clip) {
            (ClipState::WholeView, _) => {}
            (_, None) => self.state = ClipState::WholeView,
            (_, Some(rect)) if rect.is_empty() => {}
            (ClipState::Uninitialized, Some(rect)) => self.state = ClipState::Bounded(rect),
            (ClipState::Bounded(bounds), Some(rect)) => {
                self.state = ClipState::Bounded(bounds.union(rect));
            }
        }
    }

    /// Unions a repair region into an already bounded clip.
    ///
    /// Whole-view and uninitialized clips already cover everything and are
    /// left untouched.
    pub fn union_repair(&mut self, repair: Rect) {
        if let ClipState::Bounded(bounds) = self.state {
            self.state = ClipState::Bounded(bounds.union(repair));
        }
    }

    /// Returns `true` if at least one request narrowed the redraw area.
    #[inline]
    #[must_use]
    pub const fn has_any_clip(&self) -> bool {
        matches!(self.state, ClipState::Bounded(_))
    }

    /// Returns `true` if the whole view has been marked dirty.
    #[inline]
    #[must_use]
    pub const fn is_whole_view(&self) -> bool {
        matches!(self.state, ClipState::WholeView)
    }

    /// Returns `true` unless the clip has been abandoned for a whole-view
    /// redraw.
    ///
    /// An accumulator nothing was added to still counts as having clips; it
    /// may be narrowed later in the frame.
    #[inline]
    #[must_use]
    pub const fn has_redraw_clips(&self) -> bool {
        !self.is_whole_view()
    }

    /// Returns `true` if further requests this frame will be ignored.
    #[inline]
    #[must_use]
    pub const fn ignoring_redraw_clips(&self) -> bool {
        self.is_whole_view()
    }

    /// Returns the bounding box of all requests, if the clip is bounded.
    #[inline]
    #[must_use]
    pub const fn bounding_rect(&self) -> Option<Rect> {
        match self.state {
            ClipState::Bounded(rect) => Some(rect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RedrawClip;
    use crate::rect::Rect;

    #[test]
    fn starts_uninitialized() {
        let clip = RedrawClip::new();
        assert!(!clip.has_any_clip());
        assert!(!clip.is_whole_view());
        assert!(clip.has_redraw_clips());
        assert_eq!(clip.bounding_rect(), None);
    }

    #[test]
    fn first_clip_initializes_exactly() {
        let mut clip = RedrawClip::new();
        clip.add_clip(Some(Rect::new(5, 6, 7, 8)));
        assert_eq!(clip.bounding_rect(), Some(Rect::new(5, 6, 7, 8)));
    }

    #[test]
    fn clips_accumulate_bounding_box() {
        let mut clip = RedrawClip::new();
        clip.add_clip(Some(Rect::new(0, 0, 10, 10)));
        clip.add_clip(Some(Rect::new(50, 40, 10, 10)));
        assert_eq!(clip.bounding_rect(), Some(Rect::new(0, 0, 60, 50)));
    }

    #[test]
    fn whole_view_is_sticky() {
        let mut clip = RedrawClip::new();
        clip.add_clip(Some(Rect::new(0, 0, 10, 10)));
        clip.add_clip(None);
        clip.add_clip(Some(Rect::new(1, 1, 1, 1)));
        assert!(clip.is_whole_view());
        assert!(clip.ignoring_redraw_clips());
        assert!(!clip.has_any_clip());
        assert_eq!(clip.bounding_rect(), None);
    }

    #[test]
    fn zero_area_clips_are_ignored() {
        let mut clip = RedrawClip::new();
        clip.add_clip(Some(Rect::new(3, 3, 0, 10)));
        clip.add_clip(Some(Rect::new(3, 3, 10, 0)));
        assert!(!clip.has_any_clip());

        clip.add_clip(Some(Rect::new(1, 1, 2, 2)));
        clip.add_clip(Some(Rect::new(100, 100, 0, 0)));
        assert_eq!(clip.bounding_rect(), Some(Rect::new(1, 1, 2, 2)));
    }

    #[test]
    fn repair_only_extends_bounded_clips() {
        let mut clip = RedrawClip::new();
        clip.union_repair(Rect::new(0, 0, 5, 5));
        assert!(!clip.has_any_clip());

        clip.add_clip(Some(Rect::new(10, 10, 5, 5)));
        clip.union_repair(Rect::new(0, 0, 5, 5));
        assert_eq!(clip.bounding_rect(), Some(Rect::new(0, 0, 15, 15)));
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut clip = RedrawClip::new();
        clip.add_clip(None);
        clip.reset();
        assert_eq!(clip, RedrawClip::default());
    }
}
