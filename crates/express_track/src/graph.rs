// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track graph: switch points plus the routing table.

use crate::point::SwitchPoint;
use crate::section::{Direction, SectionId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Description of one switch point in a [`Topology`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSpec {
    /// Section the point routes out of.
    pub origin: SectionId,
    /// Candidate next sections, selected by the point's binary state.
    pub targets: [SectionId; 2],
}

/// Serializable description of a track network.
///
/// All points belong to the single physical junction and toggle together.
/// Each routing row names the point responsible for leaving that section
/// in the backward and forward direction respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Switch points of the junction.
    pub points: Vec<PointSpec>,
    /// Per-section routing rows `[backward, forward]`, each entry an
    /// index into `points`.
    pub routing: IndexMap<SectionId, [usize; 2]>,
}

impl Topology {
    /// The 3-section / 2-point express network.
    ///
    /// Both points originate at section 0 and select between sections 1
    /// and 2; sections 1 and 2 route through the opposite point pair.
    pub fn express() -> Self {
        let point = PointSpec {
            origin: SectionId(0),
            targets: [SectionId(1), SectionId(2)],
        };
        let mut routing = IndexMap::new();
        routing.insert(SectionId(0), [0, 1]);
        routing.insert(SectionId(1), [1, 0]);
        routing.insert(SectionId(2), [1, 0]);
        Self {
            points: vec![point.clone(), point],
            routing,
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::express()
    }
}

/// Errors produced while validating a [`Topology`].
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// A routing row references a point index that does not exist.
    #[error("section {section} routes through unknown point {point}")]
    UnknownPoint {
        /// Section whose routing row is invalid.
        section: SectionId,
        /// Out-of-range point index.
        point: usize,
    },
    /// A point targets a section with no routing row.
    #[error("point {point} targets section {section} which has no routing row")]
    UnknownSection {
        /// Index of the offending point.
        point: usize,
        /// Target section missing from the routing table.
        section: SectionId,
    },
}

/// The track network: switch points plus a fixed routing table.
#[derive(Debug, Clone)]
pub struct TrackGraph {
    points: Vec<SwitchPoint>,
    routing: IndexMap<SectionId, [usize; 2]>,
}

impl TrackGraph {
    /// Build a graph from a topology description, validating every
    /// routing reference.
    pub fn from_topology(topology: &Topology) -> Result<Self, TopologyError> {
        for (&section, row) in &topology.routing {
            for &point in row {
                if point >= topology.points.len() {
                    return Err(TopologyError::UnknownPoint { section, point });
                }
            }
        }
        for (index, spec) in topology.points.iter().enumerate() {
            for target in spec.targets {
                if !topology.routing.contains_key(&target) {
                    return Err(TopologyError::UnknownSection {
                        point: index,
                        section: target,
                    });
                }
            }
        }

        let points = topology
            .points
            .iter()
            .map(|spec| SwitchPoint::new(spec.origin, spec.targets))
            .collect();
        Ok(Self {
            points,
            routing: topology.routing.clone(),
        })
    }

    /// The built-in express network in its default switch state.
    pub fn express() -> Self {
        Self::from_topology(&Topology::express()).expect("built-in topology is valid")
    }

    /// Section a train enters after leaving `from` heading `direction`.
    ///
    /// Deterministic under a fixed switch state. Sections outside the
    /// routing table, and queries the governing point does not recognize,
    /// resolve to `from` unchanged.
    pub fn next_section(&self, from: SectionId, direction: Direction) -> SectionId {
        let Some(row) = self.routing.get(&from) else {
            return from;
        };
        self.points[row[direction.routing_index()]].resolve(from)
    }

    /// Flip every switch point of the junction as one unit.
    ///
    /// Both rail ends of the physical junction switch together. A train
    /// currently consuming a section is unaffected until its next query.
    pub fn toggle_junction(&mut self) {
        for point in &mut self.points {
            point.toggle();
        }
    }

    /// All sections with a routing row.
    pub fn sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.routing.keys().copied()
    }

    /// Number of switch points in the junction.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

impl Default for TrackGraph {
    fn default() -> Self {
        Self::express()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_routing() {
        let mut graph = TrackGraph::express();
        assert_eq!(
            graph.next_section(SectionId(0), Direction::Forward),
            SectionId(1)
        );
        graph.toggle_junction();
        assert_eq!(
            graph.next_section(SectionId(0), Direction::Forward),
            SectionId(2)
        );
    }

    #[test]
    fn test_double_toggle_restores_routing() {
        let mut graph = TrackGraph::express();
        let sections: Vec<_> = graph.sections().collect();
        let before: Vec<_> = sections
            .iter()
            .flat_map(|&s| {
                [
                    graph.next_section(s, Direction::Forward),
                    graph.next_section(s, Direction::Backward),
                ]
            })
            .collect();

        graph.toggle_junction();
        graph.toggle_junction();

        let after: Vec<_> = sections
            .iter()
            .flat_map(|&s| {
                [
                    graph.next_section(s, Direction::Forward),
                    graph.next_section(s, Direction::Backward),
                ]
            })
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_next_section_is_deterministic() {
        let graph = TrackGraph::express();
        for _ in 0..3 {
            assert_eq!(
                graph.next_section(SectionId(0), Direction::Forward),
                SectionId(1)
            );
        }
    }

    #[test]
    fn test_branch_sections_resolve_identity() {
        // Points originate at section 0, so queries from the branches
        // pass through unchanged.
        let graph = TrackGraph::express();
        assert_eq!(
            graph.next_section(SectionId(1), Direction::Backward),
            SectionId(1)
        );
        assert_eq!(
            graph.next_section(SectionId(2), Direction::Backward),
            SectionId(2)
        );
    }

    #[test]
    fn test_unknown_section_resolves_identity() {
        let graph = TrackGraph::express();
        assert_eq!(
            graph.next_section(SectionId(9), Direction::Forward),
            SectionId(9)
        );
    }

    #[test]
    fn test_invalid_point_index_rejected() {
        let mut topology = Topology::express();
        topology.routing.insert(SectionId(3), [0, 9]);
        assert!(matches!(
            TrackGraph::from_topology(&topology),
            Err(TopologyError::UnknownPoint {
                section: SectionId(3),
                point: 9
            })
        ));
    }

    #[test]
    fn test_unrouted_target_rejected() {
        let mut topology = Topology::express();
        topology.points[0].targets[1] = SectionId(5);
        assert!(matches!(
            TrackGraph::from_topology(&topology),
            Err(TopologyError::UnknownSection {
                point: 0,
                section: SectionId(5)
            })
        ));
    }

    #[test]
    fn test_topology_serialization() {
        let topology = Topology::express();
        let text = ron::ser::to_string_pretty(&topology, ron::ser::PrettyConfig::default())
            .unwrap();
        let loaded: Topology = ron::from_str(&text).unwrap();
        assert_eq!(loaded, topology);
    }
}
