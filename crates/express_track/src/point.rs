// SPDX-License-Identifier: MIT OR Apache-2.0
//! Switch points: binary routing state at a junction.

use crate::section::SectionId;

/// One end of a physical junction.
///
/// A point routes trains leaving its origin section onto one of two
/// candidate sections, chosen by its binary state. Queries from any other
/// section pass through unchanged, so an unexpected origin is a no-op
/// rather than an error.
#[derive(Debug, Clone)]
pub struct SwitchPoint {
    origin: SectionId,
    targets: [SectionId; 2],
    selected: usize,
}

impl SwitchPoint {
    /// Create a point routing out of `origin`, initially selecting the
    /// first target.
    pub fn new(origin: SectionId, targets: [SectionId; 2]) -> Self {
        Self {
            origin,
            targets,
            selected: 0,
        }
    }

    /// Flip the point to its other candidate target.
    pub fn toggle(&mut self) {
        self.selected ^= 1;
    }

    /// Section the point currently routes to when entered from `from`.
    ///
    /// Identity for any origin the point does not govern.
    pub fn resolve(&self, from: SectionId) -> SectionId {
        if from == self.origin {
            self.targets[self.selected]
        } else {
            from
        }
    }

    /// Section the point routes out of.
    pub fn origin(&self) -> SectionId {
        self.origin
    }

    /// Currently selected target section.
    pub fn selected_target(&self) -> SectionId {
        self.targets[self.selected]
    }
}
