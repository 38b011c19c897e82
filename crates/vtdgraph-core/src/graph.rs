//! The immutable compiled graph.
//!
//! [`CompiledGraph`] is the single in-memory source for both the binary
//! encoder and the JSON mirrors. It is validated once in [`CompiledGraph::build`]
//! and never mutated afterwards, which is what lets the two output paths
//! agree on logical content.

use crate::adjacency::Adjacency;
use crate::checksum::checksum;
use crate::error::CompileError;
use crate::format;
use crate::geometry::Ring;
use crate::precinct::{Demographics, PrecinctCollection, PrecinctId, StateCode};

/// One node of a [`CompiledGraph`].
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    /// Dense id.
    pub id: PrecinctId,
    /// Precinct name, carried for the render mirrors.
    pub name: String,
    /// Land + water area.
    pub area: u64,
    /// Neighbor ids. Sorted and deduplicated by [`CompiledGraph::build`].
    pub neighbors: Vec<PrecinctId>,
    /// Raw race counts.
    pub demographics: Demographics,
    /// District id, 0 = unassigned.
    pub district: u32,
    /// Exterior ring, carried for the full render mirror.
    pub vertices: Ring,
}

/// A validated precinct graph for one state.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledGraph {
    state: StateCode,
    district_count: u32,
    nodes: Vec<GraphNode>,
    checksum: u32,
}

impl CompiledGraph {
    /// Validates `nodes` and derives the payload checksum.
    ///
    /// Checks, in order: ids are `0..N` in position order, neighbor ids name
    /// other existing nodes, the neighbor relation is symmetric, and every
    /// district is 0 or in `1..=district_count`. Field widths are checked by
    /// running the encoder, whose payload also yields the checksum.
    pub fn build(
        state: StateCode,
        district_count: u32,
        mut nodes: Vec<GraphNode>,
    ) -> Result<Self, CompileError> {
        let node_count = nodes.len();

        for (position, node) in nodes.iter_mut().enumerate() {
            if node.id.as_usize() != position {
                return Err(CompileError::NonDenseId {
                    position,
                    id: node.id.index(),
                });
            }
            node.neighbors.sort_unstable();
            node.neighbors.dedup();
            for &neighbor in &node.neighbors {
                if neighbor == node.id {
                    return Err(CompileError::SelfNeighbor(node.id.index()));
                }
                if neighbor.as_usize() >= node_count {
                    return Err(CompileError::UnknownNeighbor {
                        node: node.id.index(),
                        neighbor: neighbor.index(),
                    });
                }
            }
            if node.district > district_count {
                return Err(CompileError::InvalidDistrict {
                    precinct: node.id.index(),
                    district: node.district,
                    max: district_count,
                });
            }
        }

        for node in &nodes {
            for &neighbor in &node.neighbors {
                if nodes[neighbor.as_usize()]
                    .neighbors
                    .binary_search(&node.id)
                    .is_err()
                {
                    return Err(CompileError::AsymmetricNeighbors {
                        a: node.id.index(),
                        b: neighbor.index(),
                    });
                }
            }
        }

        let mut graph = Self {
            state,
            district_count,
            nodes,
            checksum: 0,
        };
        graph.checksum = checksum(&format::encode_payload(&graph)?);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "graph {}: {} nodes, {} edges, checksum {:#010X}",
            graph.state,
            graph.nodes.len(),
            graph.edge_count(),
            graph.checksum
        );

        Ok(graph)
    }

    /// Assembles nodes from a finalized collection and its adjacency.
    ///
    /// # Panics
    ///
    /// Panics if `adjacency` was built for a different number of precincts.
    pub fn from_collection(
        collection: &PrecinctCollection,
        adjacency: &Adjacency,
        state: StateCode,
        district_count: u32,
    ) -> Result<Self, CompileError> {
        assert_eq!(
            collection.len(),
            adjacency.len(),
            "adjacency does not match the collection"
        );
        let nodes = collection
            .iter()
            .zip(adjacency.to_lists())
            .map(|(precinct, neighbors)| GraphNode {
                id: precinct.id,
                name: precinct.name.clone(),
                area: precinct.area(),
                neighbors,
                demographics: precinct.demographics,
                district: precinct.district,
                vertices: precinct.geometry.clone(),
            })
            .collect();
        Self::build(state, district_count, nodes)
    }

    /// Two-letter state code.
    pub fn state(&self) -> StateCode {
        self.state
    }

    /// Number of districts the state is divided into.
    pub fn district_count(&self) -> u32 {
        self.district_count
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Looks up a node.
    pub fn node(&self, id: PrecinctId) -> Option<&GraphNode> {
        self.nodes.get(id.as_usize())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// CRC-32 of the record table and node data.
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }
}
