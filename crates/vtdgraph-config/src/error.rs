//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or resolving a job configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// State is not in the metadata table and has no overrides
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// A state outside the table whose slug is not a plain directory name
    #[error("state '{state}' gives slug '{slug}', which may only use a-z, 0-9 and '_'")]
    InvalidStateName {
        /// State as configured.
        state: String,
        /// Slug derived from it.
        slug: String,
    },

    /// A state outside the table is missing a required override
    #[error("state '{state}' is not in the metadata table, set '{field}' explicitly")]
    MissingOverride {
        /// State as configured.
        state: String,
        /// Name of the missing key.
        field: &'static str,
    },

    /// Output kind name not recognized
    #[error("unknown output kind '{0}', expected one of: binary, readable, full-json, vertex-free-json, district-mapping")]
    UnknownOutputKind(String),

    /// No output kinds selected
    #[error("no output kinds selected")]
    EmptyOutputSet,
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = ConfigError::read_file("/jobs/iowa.toml", mock_io_err());
        assert!(
            matches!(err, ConfigError::ReadFile { ref path, .. } if path == std::path::Path::new("/jobs/iowa.toml"))
        );
        assert!(err.to_string().contains("failed to read file"));
        assert!(err.source().is_some(), "ReadFile must expose I/O source");
    }

    #[test]
    fn create_dir_display() {
        let err = ConfigError::create_dir("/out/iowa", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to create directory"), "got: {msg}");
        assert!(msg.contains("/out/iowa"), "got: {msg}");
    }

    #[test]
    fn unknown_state_display() {
        let err = ConfigError::UnknownState("Atlantis".to_string());
        assert_eq!(err.to_string(), "unknown state: Atlantis");
        assert!(err.source().is_none());
    }

    #[test]
    fn invalid_state_name_shows_slug() {
        let err = ConfigError::InvalidStateName {
            state: "../x".to_string(),
            slug: "../x".to_string(),
        };
        assert!(err.to_string().contains("slug '../x'"), "got: {err}");
    }

    #[test]
    fn missing_override_names_the_key() {
        let err = ConfigError::MissingOverride {
            state: "Guam".to_string(),
            field: "max_districts",
        };
        assert_eq!(
            err.to_string(),
            "state 'Guam' is not in the metadata table, set 'max_districts' explicitly"
        );
    }
}
