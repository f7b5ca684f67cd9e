// Copyright 2026 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View identification.
//!
//! [`ViewId`] is a lightweight handle identifying one rendering view of a
//! stage (typically one per physical display). Stages assign these; core
//! treats them as opaque.

use core::fmt;

/// Identifies one view of a stage.
///
/// Each view is damage-tracked independently; the id is carried through
/// trace events and presentation feedback so they can be routed back to the
/// right view.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ViewId(pub u32);

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({})", self.0)
    }
}
