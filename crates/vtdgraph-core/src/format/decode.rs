//! Independent `.idx` reader.
//!
//! Shares only the constants and plain data types with the encoder, so a
//! round-trip through [`decode`] actually cross-checks the layout.

use std::collections::BTreeSet;

use super::{EncodedDemographics, HEADER_LEN, Header, NodeRecord, RECORD_LEN};
use crate::checksum::checksum;
use crate::error::FormatError;

/// One node as read back from disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedNode {
    /// Node id.
    pub id: u32,
    /// Land + water area.
    pub area: u32,
    /// Neighbor ids in stored order.
    pub neighbors: Vec<u32>,
    /// Demographic sextuple.
    pub demographics: EncodedDemographics,
}

/// A fully validated `.idx` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedGraph {
    /// Parsed header.
    pub header: Header,
    /// Node-record table.
    pub records: Vec<NodeRecord>,
    /// Node data in id order.
    pub nodes: Vec<DecodedNode>,
}

impl DecodedGraph {
    /// First `(a, b)` where `a` lists `b` but `b` does not list `a`.
    pub fn asymmetric_pair(&self) -> Option<(u32, u32)> {
        let edges: BTreeSet<(u32, u32)> = self
            .nodes
            .iter()
            .flat_map(|n| n.neighbors.iter().map(move |&m| (n.id, m)))
            .collect();
        edges.iter().copied().find(|&(a, b)| !edges.contains(&(b, a)))
    }

    /// Whether the neighbor relation is symmetric.
    pub fn is_symmetric(&self) -> bool {
        self.asymmetric_pair().is_none()
    }

    /// Number of undirected edges, counting each stored direction once.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }
}

/// Bounds-checked big-endian cursor over an `.idx` buffer.
#[derive(Debug)]
pub struct IdxReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> IdxReader<'a> {
    /// Wraps a complete file.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Validates and decodes the whole file.
    ///
    /// Order of checks: header (length, magic, state code), checksum, record
    /// table, then each node's offset, id and neighbor range, and finally
    /// that nothing follows the last node.
    pub fn read(mut self) -> Result<DecodedGraph, FormatError> {
        let header = Header::parse(self.bytes)?;
        let actual = checksum(&self.bytes[HEADER_LEN..]);
        if actual != header.checksum {
            return Err(FormatError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }
        self.pos = HEADER_LEN;

        let node_count = header.node_count;
        let table_len = (node_count as usize)
            .checked_mul(RECORD_LEN)
            .ok_or(FormatError::Overflow {
                field: "record table",
                value: u64::from(node_count),
            })?;
        let table = self.take(table_len)?;
        let records: Vec<NodeRecord> = table
            .chunks_exact(RECORD_LEN)
            .map(|r| NodeRecord {
                neighbor_count: be(&r[0..4]),
                offset: be(&r[4..8]),
            })
            .collect();

        let data_start = self.pos;
        let mut nodes = Vec::with_capacity(records.len());
        for (position, record) in (0u32..).zip(&records) {
            let expected = self.pos - data_start;
            if expected != record.offset as usize {
                return Err(FormatError::OffsetMismatch {
                    node: position,
                    expected: u32::try_from(expected).unwrap_or(u32::MAX),
                    recorded: record.offset,
                });
            }

            let id = self.u32()?;
            if id != position {
                return Err(FormatError::NodeIdMismatch {
                    position,
                    found: id,
                });
            }
            let area = self.u32()?;

            let neighbor_len = (record.neighbor_count as usize)
                .checked_mul(4)
                .ok_or(FormatError::Overflow {
                    field: "neighbor count",
                    value: u64::from(record.neighbor_count),
                })?;
            let neighbors: Vec<u32> = self.take(neighbor_len)?.chunks_exact(4).map(be).collect();
            if let Some(&neighbor) = neighbors.iter().find(|&&n| n >= node_count) {
                return Err(FormatError::NeighborOutOfRange {
                    node: id,
                    neighbor,
                    node_count,
                });
            }

            let mut sextuple = [0u32; 6];
            for slot in &mut sextuple {
                *slot = self.u32()?;
            }

            nodes.push(DecodedNode {
                id,
                area,
                neighbors,
                demographics: EncodedDemographics::from_array(sextuple),
            });
        }

        let trailing = self.bytes.len() - self.pos;
        if trailing != 0 {
            return Err(FormatError::TrailingBytes(trailing));
        }

        Ok(DecodedGraph {
            header,
            records,
            nodes,
        })
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let available = self.bytes.len() - self.pos;
        if len > available {
            return Err(FormatError::Truncated {
                at: self.pos,
                needed: len,
                available,
            });
        }
        let bytes: &'a [u8] = self.bytes;
        let slice = &bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32, FormatError> {
        self.take(4).map(be)
    }
}

fn be(word: &[u8]) -> u32 {
    u32::from_be_bytes([word[0], word[1], word[2], word[3]])
}

/// Decodes and validates a complete `.idx` buffer.
pub fn decode(bytes: &[u8]) -> Result<DecodedGraph, FormatError> {
    IdxReader::new(bytes).read()
}
