// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view damage history for buffer-age repairs.
//!
//! A swap chain hands back buffers that were last presented some number of
//! frames ago (their *age*). To reuse such a buffer for a clipped redraw,
//! everything damaged since it was last current has to be repainted as well.
//! [`DamageHistory`] keeps the physical-pixel damage of the most recent
//! frames so that region can be computed.
//!
//! The history is a fixed ring indexed with a mask, so its capacity must be a
//! power of two.

use alloc::vec;
use alloc::vec::Vec;

use crate::rect::Rect;

/// Ring of the physical damage of recently presented frames.
#[derive(Clone, Debug)]
pub struct DamageHistory {
    entries: Vec<Rect>,
    write_index: usize,
}

impl DamageHistory {
    /// Creates an empty history holding up to `capacity` frames.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "damage history capacity must be a power of two, got {capacity}"
        );
        Self {
            entries: vec![Rect::default(); capacity],
            write_index: 0,
        }
    }

    /// Number of frames the ring can hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Total number of frames recorded since creation.
    #[inline]
    #[must_use]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    #[inline]
    fn mask(&self) -> usize {
        self.entries.len() - 1
    }

    /// Records the damage of the frame being presented.
    ///
    /// Called once per presented frame, full repaints included.
    pub fn record(&mut self, rect: Rect) {
        let slot = self.write_index & self.mask();
        self.entries[slot] = rect;
        self.write_index = self.write_index.wrapping_add(1);
    }

    /// Overwrites the most recently recorded entry.
    ///
    /// Used when a frame's tentative damage was recorded before it became
    /// clear the frame has to repaint more than that.
    pub fn replace_latest(&mut self, rect: Rect) {
        debug_assert!(self.write_index > 0, "no entry has been recorded yet");
        if self.write_index == 0 {
            self.record(rect);
            return;
        }
        let slot = (self.write_index - 1) & self.mask();
        self.entries[slot] = rect;
    }

    /// Returns the most recently recorded damage, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Rect> {
        if self.write_index == 0 {
            return None;
        }
        Some(self.entries[(self.write_index - 1) & self.mask()])
    }

    /// Returns `true` if a buffer of the given age can be repaired from this
    /// history.
    ///
    /// An age is usable when `0 < age < min(write_index, capacity)`: zero and
    /// negative ages are "unknown", and older buffers would need entries that
    /// were never written or were already overwritten.
    #[must_use]
    pub fn is_valid_age(&self, age: i32) -> bool {
        let Ok(age) = usize::try_from(age) else {
            return false;
        };
        age > 0 && age < self.write_index.min(self.capacity())
    }

    /// Returns the bounding box of the latest entry and the `age` entries
    /// before it.
    ///
    /// The latest entry is the current frame's tentative damage; the rest is
    /// what the `age`-frames-old buffer missed.
    ///
    /// # Panics
    ///
    /// Panics if `age` is not valid per [`is_valid_age`](Self::is_valid_age).
    #[must_use]
    pub fn union_over_age(&self, age: i32) -> Rect {
        assert!(self.is_valid_age(age), "invalid buffer age {age}");
        let mask = self.mask();
        let newest = self.write_index - 1;
        let age = usize::try_from(age).unwrap_or_default();
        (0..=age)
            .map(|back| self.entries[(newest - back) & mask])
            .fold(Rect::default(), Rect::union)
    }
}
