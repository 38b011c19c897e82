//! File layer for vtdgraph.
//!
//! This crate provides:
//!
//! - **Atomic emission**: [`write_atomic`] and [`Staging`], which only ever
//!   expose complete files under their final names
//! - **`.idx` files**: [`write_idx`], [`read_idx`] and [`scan_idx`]
//! - **JSON mirrors**: [`DebugMirror`], [`RenderDocument`] and [`DistrictMapping`]
//! - **Orchestration**: [`compile_state`] runs one state's job end to end
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vtdgraph_config::JobConfig;
//! use vtdgraph_core::{CancelToken, PlanarEngine};
//! use vtdgraph_io::{StateJob, compile_state};
//!
//! let job = StateJob::from_config(&JobConfig::load("iowa.toml")?)?;
//! let summary = compile_state(&PlanarEngine::new(), &collection, &job, &CancelToken::new())?;
//! println!("wrote {} files", summary.artifacts.len());
//! ```

mod atomic;
mod idx;
mod mirror;
mod pipeline;

pub use atomic::{StagedFile, Staging, write_atomic};
pub use idx::{IdxScan, read_idx, scan_idx, write_idx};
pub use mirror::{
    DebugMirror, DistrictMapping, LatLng, MirrorNode, RenderDocument, RenderPrecinct,
};
pub use pipeline::{Artifact, CompileSummary, StageTimings, StateJob, compile_state, render_artifact};

use std::path::PathBuf;

/// Error types for artifact I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Graph compilation failed.
    #[error(transparent)]
    Compile(#[from] vtdgraph_core::CompileError),

    /// Encoding or decoding the binary layout failed.
    #[error("idx format error: {0}")]
    Format(#[from] vtdgraph_core::FormatError),

    /// Job configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] vtdgraph_config::ConfigError),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read a file.
    #[error("failed to read '{path}': {source}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or rename a file.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for artifact I/O.
pub type Result<T> = std::result::Result<T, Error>;
