// SPDX-License-Identifier: MIT OR Apache-2.0
//! Section identifiers and traversal direction.

use serde::{Deserialize, Serialize};

/// Identifier of one track section.
///
/// Each section is backed by exactly one pre-authored animation clip; the
/// numeric value is the index embedded in the clip name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionId(pub u32);

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traversal direction along a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward the section end (positive playback rate).
    Forward,
    /// Toward the section start (negative playback rate).
    Backward,
}

impl Direction {
    /// Direction implied by a signed speed; non-negative speeds run forward.
    pub fn from_speed(speed: f32) -> Self {
        if speed >= 0.0 {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    /// Column of this direction in a per-section routing row.
    pub fn routing_index(self) -> usize {
        match self {
            Self::Backward => 0,
            Self::Forward => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_speed() {
        assert_eq!(Direction::from_speed(2.5), Direction::Forward);
        assert_eq!(Direction::from_speed(0.0), Direction::Forward);
        assert_eq!(Direction::from_speed(-1.0), Direction::Backward);
    }

    #[test]
    fn test_routing_index() {
        assert_eq!(Direction::Backward.routing_index(), 0);
        assert_eq!(Direction::Forward.routing_index(), 1);
    }
}
