// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles.
//!
//! A [`Rect`] is used in two distinct spaces: *logical* stage space (view
//! layouts, redraw clips) and *physical* framebuffer pixels (scissor
//! rectangles, damage history, swap regions). The two are related by the
//! per-view scale factor and the type does not track which one it is in, so
//! field names at use sites say it instead (`logical`, `scissor`, `fb_*`).
//!
//! A zero-sized rectangle is only ever "empty". Whole-view redraws are
//! expressed with `Option<Rect>` being `None` or with an explicit mode, never
//! with a zero width.
//!
//! Edge arithmetic saturates at the `i32` range, so rectangles reaching past
//! it are clipped to it instead of overflowing.

use core::fmt;

/// An axis-aligned integer rectangle with its origin at the top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width; values `<= 0` make the rectangle empty.
    pub width: i32,
    /// Height; values `<= 0` make the rectangle empty.
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the given size anchored at the origin.
    #[inline]
    #[must_use]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns `true` if the rectangle covers no area.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Exclusive right edge, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Creates a rectangle from its edges (right and bottom exclusive).
    ///
    /// A span wider than `i32::MAX` is cut to `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }

    /// Returns the bounding box of `self` and `other`.
    ///
    /// Empty rectangles are the identity: the union with an empty rectangle
    /// is the other rectangle unchanged.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Self::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Returns the overlap of `self` and `other`, or `None` if they do not
    /// share any area.
    #[must_use]
    pub fn intersection(self, other: Self) -> Option<Self> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::from_edges(left, top, right, bottom))
    }

    /// Returns `true` if `other` lies entirely within `self`.
    ///
    /// Every rectangle contains the empty rectangle.
    #[must_use]
    pub const fn contains_rect(self, other: Self) -> bool {
        if other.is_empty() {
            return true;
        }
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    #[test]
    fn union_is_bounding_box() {
        let a = Rect::new(10, 10, 50, 50);
        let b = Rect::new(100, 100, 20, 20);
        assert_eq!(a.union(b), Rect::new(10, 10, 110, 110));
        assert_eq!(b.union(a), Rect::new(10, 10, 110, 110));
    }

    #[test]
    fn union_with_empty_is_identity() {
        let a = Rect::new(3, 4, 5, 6);
        assert_eq!(a.union(Rect::default()), a);
        assert_eq!(Rect::new(-7, 0, 0, 10).union(a), a);
    }

    #[test]
    fn intersection_of_disjoint_is_none() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersection(Rect::new(10, 0, 5, 5)), None);
        assert_eq!(a.intersection(Rect::new(20, 20, 5, 5)), None);
    }

    #[test]
    fn intersection_clamps_to_overlap() {
        let view = Rect::new(0, 0, 800, 600);
        let clip = Rect::new(780, -10, 40, 30);
        assert_eq!(view.intersection(clip), Some(Rect::new(780, 0, 20, 20)));
    }

    #[test]
    fn contains_rect_checks_all_edges() {
        let outer = Rect::new(0, 0, 100, 100);
        assert!(outer.contains_rect(Rect::new(0, 0, 100, 100)));
        assert!(outer.contains_rect(Rect::new(10, 10, 1, 1)));
        assert!(!outer.contains_rect(Rect::new(90, 90, 11, 1)));
        assert!(outer.contains_rect(Rect::new(500, 500, 0, 0)));
    }

    #[test]
    fn edges_saturate_at_the_end_of_the_range() {
        let far = Rect::new(i32::MAX - 10, i32::MAX - 5, 100, 100);
        assert_eq!(far.right(), i32::MAX);
        assert_eq!(far.bottom(), i32::MAX);

        let view = Rect::from_size(800, 600);
        assert_eq!(view.intersection(far), None);
        assert_eq!(
            view.union(far),
            Rect::new(0, 0, i32::MAX, i32::MAX),
            "union is cut at the end of the range"
        );

        let everything = Rect::from_edges(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(everything.width, i32::MAX);
        assert_eq!(far.translate(i32::MAX, 0).x, i32::MAX);
    }
}
