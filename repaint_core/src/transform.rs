// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offscreen to onscreen buffer transforms.
//!
//! A view on a rotated or mirrored output paints into an offscreen
//! framebuffer in its natural orientation, which is then blitted to the
//! onscreen buffer. Swap regions computed against the offscreen buffer have
//! to be mapped through the same transform before they are handed to the
//! driver.

use kurbo::Affine;

use crate::rect::Rect;

/// How a view's offscreen framebuffer is laid onto its onscreen buffer.
///
/// Rotations are clockwise. The flipped variants mirror horizontally before
/// rotating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum OnscreenTransform {
    /// No transform.
    #[default]
    Normal,
    /// Rotated 90 degrees.
    Rotate90,
    /// Rotated 180 degrees.
    Rotate180,
    /// Rotated 270 degrees.
    Rotate270,
    /// Mirrored horizontally.
    Flipped,
    /// Mirrored, then rotated 90 degrees.
    Flipped90,
    /// Mirrored, then rotated 180 degrees.
    Flipped180,
    /// Mirrored, then rotated 270 degrees.
    Flipped270,
}

impl OnscreenTransform {
    /// Returns `true` for [`Normal`](Self::Normal).
    #[inline]
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Returns `true` if the onscreen buffer has width and height swapped
    /// relative to the offscreen one.
    #[inline]
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        matches!(
            self,
            Self::Rotate90 | Self::Rotate270 | Self::Flipped90 | Self::Flipped270
        )
    }

    /// Pixel-space transform for an offscreen buffer of the given size.
    ///
    /// The matrices only contain `0`, `±1` and the buffer dimensions, so
    /// integer pixel coordinates map to integer pixel coordinates exactly.
    #[must_use]
    pub fn affine(self, width: f64, height: f64) -> Affine {
        let coeffs = match self {
            Self::Normal => [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            Self::Rotate90 => [0.0, 1.0, -1.0, 0.0, height, 0.0],
            Self::Rotate180 => [-1.0, 0.0, 0.0, -1.0, width, height],
            Self::Rotate270 => [0.0, -1.0, 1.0, 0.0, 0.0, width],
            Self::Flipped => [-1.0, 0.0, 0.0, 1.0, width, 0.0],
            Self::Flipped90 => [0.0, -1.0, -1.0, 0.0, height, width],
            Self::Flipped180 => [1.0, 0.0, 0.0, -1.0, 0.0, height],
            Self::Flipped270 => [0.0, 1.0, 1.0, 0.0, 0.0, 0.0],
        };
        Affine::new(coeffs)
    }

    /// Maps a rectangle in offscreen pixels to onscreen pixels.
    ///
    /// The result is the bounding box of the transformed rectangle, rounded
    /// outwards.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "corners are integral and bounded by the buffer size"
    )]
    pub fn map_rect(self, rect: Rect, offscreen_width: i32, offscreen_height: i32) -> Rect {
        if self.is_identity() {
            return rect;
        }
        let affine = self.affine(f64::from(offscreen_width), f64::from(offscreen_height));
        let source = kurbo::Rect::new(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.right()),
            f64::from(rect.bottom()),
        );
        let mapped = affine.transform_rect_bbox(source).expand();
        Rect::from_edges(
            mapped.x0 as i32,
            mapped.y0 as i32,
            mapped.x1 as i32,
            mapped.y1 as i32,
        )
    }
}
