//! Filesystem-specific error type wrapping IO and serialization errors.

use std::path::PathBuf;

use locmode_domain::error::LocModeError;

/// Errors originating from the Home Assistant filesystem adapter.
#[derive(Debug, thiserror::Error)]
pub enum PackageFsError {
    /// A file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file or its parent directory could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the preference document.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to serialize the package document.
    #[error("YAML serialization error")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<PackageFsError> for LocModeError {
    fn from(err: PackageFsError) -> Self {
        Self::Io(Box::new(err))
    }
}
