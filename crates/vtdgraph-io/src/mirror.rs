//! JSON mirrors of a compiled graph.
//!
//! [`DebugMirror`] restates the `.idx` structure field by field and is built
//! from the [`CompiledGraph`] directly, never by parsing the binary. Building
//! it a second time from a [`DecodedGraph`] and comparing the two is how the
//! binary gets cross-checked.
//!
//! [`RenderDocument`] and [`DistrictMapping`] are the payloads the map client
//! loads.

use serde::{Deserialize, Serialize};

use vtdgraph_core::format::{self, MAGIC};
use vtdgraph_core::{
    CompiledGraph, Coord, DecodedGraph, EncodedDemographics, FormatError, NodeRecord,
};

/// Node data as listed in the debug mirror.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorNode {
    /// Node id.
    pub id: u32,
    /// Land + water area.
    pub area: u32,
    /// Neighbor ids.
    pub neighbors: Vec<u32>,
    /// Encoded demographic sextuple.
    pub demographics: EncodedDemographics,
}

/// `{state}.idx.json`: the binary's structure in readable form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugMirror {
    /// Magic constant as uppercase hex.
    pub magic_num: String,
    /// Payload checksum.
    #[serde(rename = "checkSum")]
    pub checksum: u32,
    /// State postal code.
    #[serde(rename = "stCode")]
    pub state_code: String,
    /// Number of nodes.
    #[serde(rename = "numNodes")]
    pub node_count: u32,
    /// Number of districts.
    #[serde(rename = "numDistricts")]
    pub district_count: u32,
    /// Node-record table.
    pub node_records: Vec<NodeRecord>,
    /// Node data.
    pub nodes: Vec<MirrorNode>,
}

impl DebugMirror {
    /// Builds the mirror from the in-memory graph.
    pub fn from_graph(graph: &CompiledGraph) -> Result<Self, FormatError> {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| -> Result<MirrorNode, FormatError> {
                Ok(MirrorNode {
                    id: node.id.index(),
                    area: u32::try_from(node.area).map_err(|_| FormatError::Overflow {
                        field: "area",
                        value: node.area,
                    })?,
                    neighbors: node.neighbors.iter().map(|n| n.index()).collect(),
                    demographics: EncodedDemographics::encode(&node.demographics)?,
                })
            })
            .collect::<Result<Vec<_>, FormatError>>()?;

        Ok(Self {
            magic_num: format!("{MAGIC:08X}"),
            checksum: graph.checksum(),
            state_code: graph.state().to_string(),
            node_count: u32::try_from(graph.len()).map_err(|_| FormatError::Overflow {
                field: "node count",
                value: graph.len() as u64,
            })?,
            district_count: graph.district_count(),
            node_records: format::node_layout(graph)?,
            nodes,
        })
    }

    /// Builds the same mirror from a decoded file.
    pub fn from_decoded(decoded: &DecodedGraph) -> Self {
        Self {
            magic_num: format!("{:08X}", decoded.header.magic),
            checksum: decoded.header.checksum,
            state_code: decoded.header.state.to_string(),
            node_count: decoded.header.node_count,
            district_count: decoded.header.district_count,
            node_records: decoded.records.clone(),
            nodes: decoded
                .nodes
                .iter()
                .map(|n| MirrorNode {
                    id: n.id,
                    area: n.area,
                    neighbors: n.neighbors.clone(),
                    demographics: n.demographics,
                })
                .collect(),
        }
    }
}

/// A vertex in render order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude (the ring's y).
    pub lat: f64,
    /// Longitude (the ring's x).
    pub lng: f64,
}

impl From<Coord> for LatLng {
    fn from(c: Coord) -> Self {
        Self {
            lat: c.lat(),
            lng: c.lng(),
        }
    }
}

/// One precinct in a render document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderPrecinct {
    /// Precinct name.
    pub name: String,
    /// Node id.
    pub id: u32,
    /// Exterior ring, empty in the vertex-free variant.
    pub vertices: Vec<LatLng>,
    /// District id, 0 = unassigned.
    pub district: u32,
}

/// `{state}.json` and `{state}.novert.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDocument {
    /// State postal code.
    pub state: String,
    /// Number of districts.
    pub max_districts: u32,
    /// Two-digit FIPS code.
    pub fips: String,
    /// Precincts in id order.
    pub precincts: Vec<RenderPrecinct>,
}

impl RenderDocument {
    /// Builds the render payload, with or without ring vertices.
    pub fn from_graph(graph: &CompiledGraph, fips: &str, with_vertices: bool) -> Self {
        let precincts = graph
            .nodes()
            .iter()
            .map(|node| RenderPrecinct {
                name: node.name.clone(),
                id: node.id.index(),
                vertices: if with_vertices {
                    node.vertices.vertices().iter().copied().map(LatLng::from).collect()
                } else {
                    Vec::new()
                },
                district: node.district,
            })
            .collect();
        Self {
            state: graph.state().to_string(),
            max_districts: graph.district_count(),
            fips: fips.to_string(),
            precincts,
        }
    }
}

/// `{state}.districts.json`: `[precinct id, district id]` pairs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictMapping {
    /// State postal code.
    pub state: String,
    /// Pairs in precinct id order.
    pub map: Vec<[u32; 2]>,
}

impl DistrictMapping {
    /// Collects each node's district.
    pub fn from_graph(graph: &CompiledGraph) -> Self {
        Self {
            state: graph.state().to_string(),
            map: graph
                .nodes()
                .iter()
                .map(|n| [n.id.index(), n.district])
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtdgraph_core::{Demographics, GraphNode, PrecinctId, Ring, StateCode};

    fn graph() -> CompiledGraph {
        let node = |id: u32, n: &[u32], district: u32| GraphNode {
            id: PrecinctId::new(id),
            name: format!("Ward {id}"),
            area: 10 + u64::from(id),
            neighbors: n.iter().copied().map(PrecinctId::new).collect(),
            demographics: Demographics {
                total: 9,
                white: 4,
                black: 3,
                other: 1,
                multiracial: 1,
                ..Demographics::default()
            },
            district,
            vertices: Ring::rectangle(-93.5, 41.5, -93.0, 42.0),
        };
        CompiledGraph::build(
            StateCode::new("IA").unwrap(),
            4,
            vec![node(0, &[1], 2), node(1, &[0], 0)],
        )
        .unwrap()
    }

    #[test]
    fn debug_mirror_matches_decoded_binary() {
        let g = graph();
        let from_graph = DebugMirror::from_graph(&g).unwrap();
        let decoded = format::decode(&format::encode(&g).unwrap()).unwrap();
        assert_eq!(from_graph, DebugMirror::from_decoded(&decoded));
    }

    #[test]
    fn debug_mirror_keys() {
        let json = serde_json::to_value(DebugMirror::from_graph(&graph()).unwrap()).unwrap();
        assert_eq!(json["magic_num"], "BEEFCAFE");
        assert_eq!(json["stCode"], "IA");
        assert_eq!(json["numNodes"], 2);
        assert_eq!(json["numDistricts"], 4);
        assert_eq!(json["node_records"][1]["numNeighbors"], 1);
        assert_eq!(json["node_records"][1]["offset"], 36);
        assert_eq!(json["nodes"][0]["demographics"]["nativeAmerican"], 0);
        assert_eq!(json["nodes"][0]["demographics"]["other"], 2);
        assert!(json["checkSum"].is_u64());
    }

    #[test]
    fn render_vertices_are_lat_lng() {
        let doc = RenderDocument::from_graph(&graph(), "19", true);
        let first = doc.precincts[0].vertices[0];
        assert_eq!(first, LatLng { lat: 41.5, lng: -93.5 });
        assert_eq!(doc.precincts[0].vertices.len(), 5);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["maxDistricts"], 4);
        assert_eq!(json["fips"], "19");
        assert_eq!(json["precincts"][1]["district"], 0);
    }

    #[test]
    fn vertex_free_variant_keeps_empty_arrays() {
        let doc = RenderDocument::from_graph(&graph(), "19", false);
        assert!(doc.precincts.iter().all(|p| p.vertices.is_empty()));
        assert_eq!(doc.precincts[1].name, "Ward 1");
    }

    #[test]
    fn district_mapping_pairs() {
        let json = serde_json::to_string(&DistrictMapping::from_graph(&graph())).unwrap();
        assert_eq!(json, r#"{"state":"IA","map":[[0,2],[1,0]]}"#);
    }
}
