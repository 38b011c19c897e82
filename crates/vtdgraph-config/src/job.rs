//! TOML job files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::output::OutputSet;
use crate::paths::{DEFAULT_OUTPUT_DIR, is_valid_slug, state_slug};
use crate::states::find_state;

/// One state's compilation job.
///
/// # TOML Format
///
/// ```toml
/// state = "Iowa"
/// output_dir = "output"
/// outputs = ["binary", "readable", "district-mapping"]
/// parallel = true
///
/// # Only needed for states outside the built-in table, or to override it.
/// code = "IA"
/// max_districts = 4
/// fips = "19"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobConfig {
    /// State name, slug or postal code.
    pub state: String,

    /// Postal code override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// District count override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_districts: Option<u32>,

    /// FIPS code override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fips: Option<String>,

    /// Root of the output tree.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Artifacts to write (defaults to all).
    #[serde(default)]
    pub outputs: OutputSet,

    /// Shard adjacency rows across threads.
    #[serde(default)]
    pub parallel: bool,

    /// Prune adjacency candidates with an R-tree.
    #[serde(default = "default_index")]
    pub index: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_index() -> bool {
    true
}

/// State metadata after applying a job's overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMeta {
    /// Display name.
    pub name: String,
    /// Directory and file stem, e.g. `new_york`.
    pub slug: String,
    /// Two-letter postal code.
    pub code: String,
    /// FIPS code, empty if unknown.
    pub fips: String,
    /// Number of districts.
    pub max_districts: u32,
}

impl JobConfig {
    /// Create a job with default settings.
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            code: None,
            max_districts: None,
            fips: None,
            output_dir: default_output_dir(),
            outputs: OutputSet::default(),
            parallel: false,
            index: true,
        }
    }

    /// Load a job from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a job from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let job: Self = toml::from_str(toml_str)?;
        if job.outputs.is_empty() {
            return Err(ConfigError::EmptyOutputSet);
        }
        Ok(job)
    }

    /// Save the job to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the job to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Looks the state up in the metadata table and applies overrides.
    ///
    /// A state missing from the table is accepted when both `code` and
    /// `max_districts` are given.
    pub fn resolve(&self) -> Result<StateMeta, ConfigError> {
        match find_state(&self.state) {
            Some(info) => Ok(StateMeta {
                name: info.name.to_string(),
                slug: state_slug(info.name),
                code: self.code.clone().unwrap_or_else(|| info.code.to_string()),
                fips: self.fips.clone().unwrap_or_else(|| info.fips.to_string()),
                max_districts: self.max_districts.unwrap_or(info.districts),
            }),
            None => {
                let slug = state_slug(&self.state);
                if slug.is_empty() {
                    return Err(ConfigError::UnknownState(self.state.clone()));
                }
                if !is_valid_slug(&slug) {
                    return Err(ConfigError::InvalidStateName {
                        state: self.state.clone(),
                        slug,
                    });
                }
                let missing = |field| ConfigError::MissingOverride {
                    state: self.state.clone(),
                    field,
                };
                Ok(StateMeta {
                    name: self.state.trim().to_string(),
                    slug,
                    code: self.code.clone().ok_or_else(|| missing("code"))?,
                    fips: self.fips.clone().unwrap_or_default(),
                    max_districts: self.max_districts.ok_or_else(|| missing("max_districts"))?,
                })
            }
        }
    }
}
