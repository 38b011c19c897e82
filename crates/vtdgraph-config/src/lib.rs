//! Configuration for vtdgraph compilation jobs.
//!
//! This crate knows nothing about geometry or the binary layout. It answers
//! three questions for the layers above it:
//!
//! - **What to write**: [`OutputKind`] and the [`OutputSet`] selected for a run
//! - **For which state**: the [`STATES`] metadata table and [`JobConfig`], a
//!   TOML job file with optional overrides
//! - **Where to write it**: [`paths::artifact_path`] lays files out as
//!   `{output_dir}/{state}/{state}{suffix}`
//!
//! # Example
//!
//! ```rust,no_run
//! use vtdgraph_config::{JobConfig, OutputKind, OutputSet};
//!
//! let mut job = JobConfig::new("Iowa");
//! job.outputs = OutputSet::parse("binary, district-mapping").unwrap();
//! job.save("jobs/iowa.toml").unwrap();
//!
//! let job = JobConfig::load("jobs/iowa.toml").unwrap();
//! let meta = job.resolve().unwrap();
//! assert_eq!(meta.code, "IA");
//! assert!(job.outputs.contains(OutputKind::Binary));
//! ```

mod error;
mod job;
mod output;

/// Output file layout.
pub mod paths;

/// Per-state metadata.
pub mod states;

pub use error::ConfigError;
pub use job::{JobConfig, StateMeta};
pub use output::{OutputKind, OutputSet};
pub use paths::{artifact_path, is_valid_slug, state_dir, state_slug};
pub use states::{STATES, StateInfo, find_state};
