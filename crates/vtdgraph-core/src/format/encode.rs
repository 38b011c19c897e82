//! Two-pass encoder: payload first, then the header that hashes it.

use super::{
    EncodedDemographics, HEADER_LEN, Header, MAGIC, NodeRecord, RECORD_LEN, fit_u32,
    node_data_len,
};
use crate::checksum::checksum;
use crate::error::FormatError;
use crate::graph::CompiledGraph;

/// Computes the node-record table of `graph`.
pub fn node_layout(graph: &CompiledGraph) -> Result<Vec<NodeRecord>, FormatError> {
    layout_from_counts(graph.nodes().iter().map(|n| n.neighbors.len() as u64))
}

/// Record table for nodes with the given neighbor counts, in id order.
fn layout_from_counts(
    counts: impl ExactSizeIterator<Item = u64>,
) -> Result<Vec<NodeRecord>, FormatError> {
    let fixed = node_data_len(0) as u64;
    let mut records = Vec::with_capacity(counts.len());
    let mut offset = 0u64;
    for count in counts {
        records.push(NodeRecord {
            neighbor_count: fit_u32("neighbor count", count)?,
            offset: fit_u32("offset", offset)?,
        });
        offset += fixed + 4 * count;
    }
    Ok(records)
}

/// Serializes the record table followed by the node data.
///
/// These are exactly the bytes the header checksum covers.
pub fn encode_payload(graph: &CompiledGraph) -> Result<Vec<u8>, FormatError> {
    fit_u32("node count", graph.len() as u64)?;
    let records = node_layout(graph)?;
    let data_len: usize = graph
        .nodes()
        .iter()
        .map(|n| node_data_len(n.neighbors.len()))
        .sum();

    let mut out = Vec::with_capacity(records.len() * RECORD_LEN + data_len);
    for record in &records {
        put(&mut out, record.neighbor_count);
        put(&mut out, record.offset);
    }
    for node in graph.nodes() {
        put(&mut out, node.id.index());
        put(&mut out, fit_u32("area", node.area)?);
        for neighbor in &node.neighbors {
            put(&mut out, neighbor.index());
        }
        for value in EncodedDemographics::encode(&node.demographics)?.to_array() {
            put(&mut out, value);
        }
    }
    Ok(out)
}

/// Serializes the complete `.idx` file.
pub fn encode(graph: &CompiledGraph) -> Result<Vec<u8>, FormatError> {
    let payload = encode_payload(graph)?;
    let header = Header {
        magic: MAGIC,
        checksum: checksum(&payload),
        state: graph.state(),
        node_count: fit_u32("node count", graph.len() as u64)?,
        district_count: graph.district_count(),
    };

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

#[inline]
fn put(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
