//! Property-based tests for graph compilation and the `.idx` layout.
//!
//! Random graphs are generated directly as symmetric edge sets, so these
//! properties exercise the model and codec independently of geometry.

use proptest::prelude::*;
use vtdgraph_core::format::{self, node_data_len};
use vtdgraph_core::{
    Adjacency, AdjacencyBuilder, CancelToken, CandidateStrategy, CompiledGraph, Demographics,
    GeometryEngine, GraphNode, PlanarEngine, PrecinctId, Ring, StateCode,
};

/// Node count plus an arbitrary pair list over those nodes.
fn edge_list() -> impl Strategy<Value = (usize, Vec<(u32, u32)>)> {
    (1usize..40).prop_flat_map(|n| {
        let pair = (0..n as u32, 0..n as u32);
        (Just(n), prop::collection::vec(pair, 0..120))
    })
}

fn demographics() -> impl Strategy<Value = Demographics> {
    prop::array::uniform8(0u64..100_000).prop_map(Demographics::from_array)
}

fn graph_from(n: usize, pairs: &[(u32, u32)], demo: &[Demographics]) -> CompiledGraph {
    let adjacency = Adjacency::from_pairs(
        n,
        pairs
            .iter()
            .map(|&(a, b)| (PrecinctId::new(a), PrecinctId::new(b))),
    );
    let nodes = adjacency
        .to_lists()
        .into_iter()
        .enumerate()
        .map(|(i, neighbors)| GraphNode {
            id: PrecinctId::new(i as u32),
            name: format!("P{i}"),
            area: 1000 + i as u64,
            neighbors,
            demographics: demo[i % demo.len()],
            district: 0,
            vertices: Ring::rectangle(0.0, 0.0, 1.0, 1.0),
        })
        .collect();
    CompiledGraph::build(StateCode::new("TX").unwrap(), 36, nodes).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Merging any pair list yields a symmetric relation without self-loops.
    #[test]
    fn merged_pairs_are_symmetric((n, pairs) in edge_list()) {
        let adjacency = Adjacency::from_pairs(
            n,
            pairs.iter().map(|&(a, b)| (PrecinctId::new(a), PrecinctId::new(b))),
        );
        prop_assert!(adjacency.is_symmetric());
        for i in 0..n as u32 {
            prop_assert!(!adjacency.neighbors(PrecinctId::new(i)).contains(&PrecinctId::new(i)));
        }
    }

    /// Consecutive offsets differ by 8 + 4 x neighbors + 24.
    #[test]
    fn offsets_obey_the_offset_law((n, pairs) in edge_list()) {
        let graph = graph_from(n, &pairs, &[Demographics::default()]);
        let records = format::node_layout(&graph).unwrap();
        prop_assert_eq!(records[0].offset, 0);
        for w in records.windows(2) {
            prop_assert_eq!(
                (w[1].offset - w[0].offset) as usize,
                node_data_len(w[0].neighbor_count as usize)
            );
        }
    }

    /// The reader reproduces counts, neighbor sets and sextuples.
    #[test]
    fn decode_reproduces_encoded_content(
        (n, pairs) in edge_list(),
        demo in prop::collection::vec(demographics(), 1..8),
    ) {
        let graph = graph_from(n, &pairs, &demo);
        let decoded = format::decode(&format::encode(&graph).unwrap()).unwrap();

        prop_assert_eq!(decoded.header.node_count as usize, graph.len());
        prop_assert_eq!(decoded.header.district_count, graph.district_count());
        prop_assert_eq!(decoded.header.checksum, graph.checksum());
        for (node, back) in graph.nodes().iter().zip(&decoded.nodes) {
            let ids: Vec<u32> = node.neighbors.iter().map(|p| p.index()).collect();
            prop_assert_eq!(&ids, &back.neighbors);
            let sextuple = node.demographics.sextuple().map(|v| v as u32);
            prop_assert_eq!(sextuple, back.demographics.to_array());
        }
    }

    /// Encoding the same graph twice gives identical bytes.
    #[test]
    fn encoding_is_deterministic((n, pairs) in edge_list()) {
        let graph = graph_from(n, &pairs, &[Demographics::default()]);
        let again = graph_from(n, &pairs, &[Demographics::default()]);
        prop_assert_eq!(format::encode(&graph).unwrap(), format::encode(&again).unwrap());
        prop_assert_eq!(graph.checksum(), again.checksum());
    }

    /// Pruned candidates give the same adjacency as the exhaustive scan.
    #[test]
    fn index_pruning_matches_exhaustive(
        cells in prop::collection::btree_set((0i32..6, 0i32..6), 1..20),
    ) {
        let engine = PlanarEngine::new();
        let shapes: Vec<_> = cells
            .iter()
            .map(|&(x, y)| {
                let (x, y) = (f64::from(x), f64::from(y));
                engine.prepare(&Ring::rectangle(x, y, x + 1.0, y + 1.0)).unwrap()
            })
            .collect();
        let cancel = CancelToken::new();
        let exhaustive = AdjacencyBuilder::new(&engine)
            .strategy(CandidateStrategy::Exhaustive)
            .build(&shapes, &cancel)
            .unwrap();
        let indexed = AdjacencyBuilder::new(&engine)
            .strategy(CandidateStrategy::Indexed)
            .build(&shapes, &cancel)
            .unwrap();
        prop_assert_eq!(exhaustive, indexed);
    }
}
