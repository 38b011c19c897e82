//! One state's compilation, from finalized precincts to files on disk.
//!
//! The run is split into stages with a cancellation check between each:
//!
//! 1. **Prepare** - hand every ring to the geometry engine
//! 2. **Adjacency** - build the touch-graph once
//! 3. **Graph** - validate and checksum the [`CompiledGraph`]
//! 4. **Render** - produce every requested artifact in memory
//! 5. **Write** - stage all artifacts as temp files, then rename them in
//!
//! A failure in stages 1-4 leaves the output directory untouched, and a
//! failure while staging drops every temp file written so far.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use vtdgraph_config::{JobConfig, OutputKind, OutputSet, artifact_path};
use vtdgraph_core::format;
use vtdgraph_core::{
    AdjacencyBuilder, CancelToken, CandidateStrategy, CompiledGraph, GeometryEngine,
    PrecinctCollection, StateCode,
};

use crate::atomic::Staging;
use crate::mirror::{DebugMirror, DistrictMapping, RenderDocument};
use crate::Result;

/// Everything needed to compile one state.
#[derive(Clone, Debug, PartialEq)]
pub struct StateJob {
    /// Display name.
    pub state_name: String,
    /// Directory and file stem.
    pub slug: String,
    /// Postal code written to the header.
    pub code: StateCode,
    /// District count written to the header.
    pub max_districts: u32,
    /// FIPS code for the render documents.
    pub fips: String,
    /// Root of the output tree.
    pub output_dir: PathBuf,
    /// Artifacts to write.
    pub outputs: OutputSet,
    /// Shard adjacency rows across threads.
    pub parallel: bool,
    /// Candidate pair selection.
    pub strategy: CandidateStrategy,
}

impl StateJob {
    /// Resolves a job file against the state table.
    pub fn from_config(config: &JobConfig) -> Result<Self> {
        let meta = config.resolve()?;
        Ok(Self {
            code: StateCode::new(&meta.code)?,
            state_name: meta.name,
            slug: meta.slug,
            max_districts: meta.max_districts,
            fips: meta.fips,
            output_dir: config.output_dir.clone(),
            outputs: config.outputs.clone(),
            parallel: config.parallel,
            strategy: if config.index {
                CandidateStrategy::Indexed
            } else {
                CandidateStrategy::Exhaustive
            },
        })
    }

    /// Where `kind` is written for this state.
    pub fn artifact_path(&self, kind: OutputKind) -> PathBuf {
        artifact_path(&self.output_dir, &self.slug, kind)
    }
}

/// One written file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// What was written.
    pub kind: OutputKind,
    /// Final path.
    pub path: PathBuf,
    /// Size in bytes.
    pub bytes: u64,
}

/// Wall-clock time per stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageTimings {
    /// Shape preparation and adjacency.
    pub adjacency: Duration,
    /// Graph validation and checksum.
    pub graph: Duration,
    /// In-memory rendering of every artifact.
    pub render: Duration,
    /// Staging and renaming files.
    pub write: Duration,
}

/// Outcome of [`compile_state`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileSummary {
    /// State postal code.
    pub state: StateCode,
    /// Number of nodes.
    pub node_count: usize,
    /// Number of undirected edges.
    pub edge_count: usize,
    /// Payload checksum written to the header.
    pub checksum: u32,
    /// Files written, in emission order.
    pub artifacts: Vec<Artifact>,
    /// Stage timings.
    pub timings: StageTimings,
}

impl CompileSummary {
    /// Total bytes written.
    pub fn total_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.bytes).sum()
    }
}

/// Renders one artifact of `graph` to bytes.
pub fn render_artifact(graph: &CompiledGraph, job: &StateJob, kind: OutputKind) -> Result<Vec<u8>> {
    let bytes = match kind {
        OutputKind::Binary => format::encode(graph)?,
        OutputKind::Readable => serde_json::to_vec_pretty(&DebugMirror::from_graph(graph)?)?,
        OutputKind::FullJson => {
            serde_json::to_vec_pretty(&RenderDocument::from_graph(graph, &job.fips, true))?
        }
        OutputKind::VertexFreeJson => {
            serde_json::to_vec_pretty(&RenderDocument::from_graph(graph, &job.fips, false))?
        }
        OutputKind::DistrictMapping => {
            serde_json::to_vec_pretty(&DistrictMapping::from_graph(graph))?
        }
    };
    Ok(bytes)
}

/// Compiles a finalized precinct collection and writes the requested artifacts.
pub fn compile_state<E: GeometryEngine>(
    engine: &E,
    collection: &PrecinctCollection,
    job: &StateJob,
    cancel: &CancelToken,
) -> Result<CompileSummary> {
    let mut timings = StageTimings::default();
    tracing::info!(
        state = %job.state_name,
        precincts = collection.len(),
        outputs = %job.outputs,
        "compiling"
    );

    cancel.check()?;
    let start = Instant::now();
    let shapes = collection.prepare_shapes(engine)?;
    let adjacency = AdjacencyBuilder::new(engine)
        .strategy(job.strategy)
        .parallel(job.parallel)
        .build(&shapes, cancel)?;
    drop(shapes);
    timings.adjacency = start.elapsed();

    let start = Instant::now();
    let graph = CompiledGraph::from_collection(collection, &adjacency, job.code, job.max_districts)?;
    timings.graph = start.elapsed();

    cancel.check()?;
    let start = Instant::now();
    let rendered = job
        .outputs
        .iter()
        .map(|kind| -> Result<(OutputKind, Vec<u8>)> {
            Ok((kind, render_artifact(&graph, job, kind)?))
        })
        .collect::<Result<Vec<_>>>()?;
    timings.render = start.elapsed();

    cancel.check()?;
    let start = Instant::now();
    let mut staging = Staging::new();
    for (kind, bytes) in &rendered {
        staging.add(job.artifact_path(*kind), bytes)?;
    }
    let written = staging.commit()?;
    timings.write = start.elapsed();

    let artifacts: Vec<Artifact> = rendered
        .iter()
        .zip(written)
        .map(|((kind, _), (path, bytes))| Artifact {
            kind: *kind,
            path,
            bytes,
        })
        .collect();

    let summary = CompileSummary {
        state: job.code,
        node_count: graph.len(),
        edge_count: graph.edge_count(),
        checksum: graph.checksum(),
        artifacts,
        timings,
    };
    tracing::info!(
        state = %summary.state,
        nodes = summary.node_count,
        edges = summary.edge_count,
        checksum = %format_args!("{:#010X}", summary.checksum),
        files = summary.artifacts.len(),
        bytes = summary.total_bytes(),
        "compiled in {:.2?}",
        timings.adjacency + timings.graph + timings.render + timings.write
    );
    Ok(summary)
}
