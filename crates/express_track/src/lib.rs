// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track topology for the railway express demo.
//!
//! This crate models the discrete track network the train runs on:
//! - Sections identified by index, each backed by one animation clip
//! - Switch points with binary routing state
//! - A junction whose points always toggle together
//! - A serializable topology description with validation
//!
//! The graph is deliberately small and deterministic: given a fixed switch
//! state, `next_section` always resolves the same way. Toggling the
//! junction only changes future queries; a train mid-section is unaffected
//! until it next asks for a route.

pub mod graph;
pub mod point;
pub mod section;

pub use graph::{PointSpec, Topology, TopologyError, TrackGraph};
pub use point::SwitchPoint;
pub use section::{Direction, SectionId};
