//! Error types for graph compilation and the binary layout.

use thiserror::Error;

/// A precinct or district geometry the engine cannot work with.
///
/// Malformed shapes should have been filtered upstream, so reaching the
/// compiler with one aborts the state's run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The exterior ring has fewer than three distinct vertices.
    #[error("ring has {count} distinct vertices, at least 3 are required")]
    TooFewVertices {
        /// Number of distinct vertices found.
        count: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("ring contains a non-finite coordinate at vertex {vertex}")]
    NonFinite {
        /// Index of the offending vertex.
        vertex: usize,
    },

    /// The ring encloses no area.
    #[error("ring encloses zero area")]
    ZeroArea,

    /// Two edges of the ring cross or overlap.
    #[error("ring is not simple: edges {first} and {second} intersect")]
    SelfIntersecting {
        /// Lower edge index.
        first: usize,
        /// Higher edge index.
        second: usize,
    },
}

/// Errors raised while encoding or decoding the `.idx` layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A count, offset or value does not fit its fixed-width field.
    #[error("{field} value {value} does not fit in a 32-bit field")]
    Overflow {
        /// Field that overflowed.
        field: &'static str,
        /// Value that was rejected.
        value: u64,
    },

    /// The file does not start with the magic constant.
    #[error("bad magic number {0:#010X}")]
    BadMagic(u32),

    /// The input ended before a complete structure could be read.
    #[error("truncated input: needed {needed} bytes at offset {at}, {available} available")]
    Truncated {
        /// Byte position of the read.
        at: usize,
        /// Bytes required.
        needed: usize,
        /// Bytes left in the input.
        available: usize,
    },

    /// Bytes remain after the last node.
    #[error("{0} trailing bytes after the last node")]
    TrailingBytes(usize),

    /// The stored checksum disagrees with the payload.
    #[error("checksum mismatch: header says {expected:#010X}, payload hashes to {actual:#010X}")]
    ChecksumMismatch {
        /// Checksum stored in the header.
        expected: u32,
        /// Checksum recomputed over the payload.
        actual: u32,
    },

    /// A node record points somewhere other than where its node starts.
    #[error("node {node}: record offset {recorded} but node data starts at {expected}")]
    OffsetMismatch {
        /// Node index.
        node: u32,
        /// Offset derived from the preceding nodes.
        expected: u32,
        /// Offset stored in the record table.
        recorded: u32,
    },

    /// Node data is out of id order.
    #[error("node data at position {position} carries id {found}")]
    NodeIdMismatch {
        /// Position in the node-data section.
        position: u32,
        /// Id read from the data.
        found: u32,
    },

    /// A neighbor id does not name a node in the file.
    #[error("node {node} lists neighbor {neighbor} but the file has {node_count} nodes")]
    NeighborOutOfRange {
        /// Node index.
        node: u32,
        /// Offending neighbor id.
        neighbor: u32,
        /// Node count from the header.
        node_count: u32,
    },

    /// The header state code is not two ASCII uppercase letters.
    #[error("invalid state code bytes {0:?}")]
    InvalidStateCode([u8; 2]),
}

/// Fatal errors that abort compilation of a state.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A precinct geometry was rejected by the geometry engine.
    #[error("precinct {index}: {source}")]
    Geometry {
        /// Row index of the precinct.
        index: usize,
        /// Underlying geometry problem.
        #[source]
        source: GeometryError,
    },

    /// A district polygon was rejected by the geometry engine.
    #[error("district region {index}: {source}")]
    DistrictGeometry {
        /// Position of the district region.
        index: usize,
        /// Underlying geometry problem.
        #[source]
        source: GeometryError,
    },

    /// The graph cannot be represented in the binary layout.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A precinct carries a district id outside `0..=max`.
    #[error("precinct {precinct} has district {district}, expected 0 or 1..={max}")]
    InvalidDistrict {
        /// Precinct id.
        precinct: u32,
        /// District id found.
        district: u32,
        /// Configured district count.
        max: u32,
    },

    /// District regions must carry non-zero ids; 0 is the unassigned sentinel.
    #[error("district region {index} uses the reserved id 0")]
    ReservedDistrictId {
        /// Position of the district region.
        index: usize,
    },

    /// Node ids are not the dense sequence `0..N` in order.
    #[error("node at position {position} has id {id}")]
    NonDenseId {
        /// Position in the node list.
        position: usize,
        /// Id found.
        id: u32,
    },

    /// A neighbor reference names a node that does not exist.
    #[error("node {node} lists unknown neighbor {neighbor}")]
    UnknownNeighbor {
        /// Node id.
        node: u32,
        /// Neighbor id.
        neighbor: u32,
    },

    /// A node lists itself as its own neighbor.
    #[error("node {0} lists itself as a neighbor")]
    SelfNeighbor(u32),

    /// `b` is a neighbor of `a` but not the other way round.
    #[error("neighbor relation is not symmetric: {a} lists {b} but {b} does not list {a}")]
    AsymmetricNeighbors {
        /// Node that lists the neighbor.
        a: u32,
        /// Neighbor missing the back-reference.
        b: u32,
    },

    /// State code is not two ASCII letters.
    #[error("invalid state code '{0}', expected two ASCII letters")]
    InvalidStateCode(String),

    /// The run was cancelled between stages.
    #[error("compilation cancelled")]
    Cancelled,
}
