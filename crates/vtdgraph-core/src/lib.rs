//! vtdgraph Core - precinct adjacency graphs for map-rendering clients
//!
//! This crate turns a prepared collection of census precincts (VTDs) into a
//! [`CompiledGraph`]: every precinct becomes a node carrying its area,
//! demographics, district and the ids of the precincts it shares a boundary
//! with. The graph is then laid out in the fixed-width big-endian `.idx`
//! format described in [`format`].
//!
//! # Pipeline
//!
//! - [`geometry`] - the contract with the external GIS engine ([`GeometryEngine`])
//!   plus the [`PlanarEngine`] reference implementation
//! - [`adjacency`] - [`AdjacencyBuilder`] derives the symmetric touch-graph
//! - [`district`] - [`assign_districts`] picks the district of greatest overlap
//! - [`apportion`] - area-weighted redistribution of source demographics
//! - [`graph`] - the immutable [`CompiledGraph`]
//! - [`format`] - binary encoder and the independent reader
//! - [`checksum`] - CRC-32 over the record table and node data
//!
//! # Example
//!
//! ```rust,ignore
//! use vtdgraph_core::{
//!     AdjacencyBuilder, CancelToken, CompiledGraph, PlanarEngine, PrecinctCollection, StateCode,
//! };
//!
//! let engine = PlanarEngine::new();
//! let collection = PrecinctCollection::from_records(records)?;
//! let shapes = collection.prepare_shapes(&engine)?;
//! let adjacency = AdjacencyBuilder::new(&engine).build(&shapes, &CancelToken::new())?;
//! let graph = CompiledGraph::from_collection(&collection, &adjacency, StateCode::new("IA")?, 4)?;
//! let bytes = vtdgraph_core::format::encode(&graph)?;
//! ```

pub mod adjacency;
pub mod apportion;
pub mod cancel;
pub mod checksum;
pub mod district;
mod error;
pub mod format;
pub mod geometry;
pub mod graph;
pub mod precinct;
pub mod spatial;

pub use adjacency::{Adjacency, AdjacencyBuilder, CandidateStrategy};
pub use apportion::{Apportionment, ApportionmentReport, SourceRegion, apportion};
pub use cancel::CancelToken;
pub use checksum::{Checksum, checksum, checksum_reader};
pub use district::{DistrictRegion, UNASSIGNED_DISTRICT, assign_districts};
pub use error::{CompileError, FormatError, GeometryError};
pub use format::{DecodedGraph, DecodedNode, EncodedDemographics, Header, NodeRecord};
pub use geometry::{BoundingBox, Coord, GeometryEngine, PlanarEngine, PlanarShape, Ring};
pub use graph::{CompiledGraph, GraphNode};
pub use precinct::{Demographics, Precinct, PrecinctCollection, PrecinctId, PrecinctRecord, StateCode};
pub use spatial::SpatialIndex;
