//! Error types for scene files and asset decoding.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing a scene directory.
#[derive(Debug, Error)]
pub enum SceneError {
    /// One of the three scene files (tiles, colliders, settings) is missing.
    #[error("scene file not found: {}", path.display())]
    NotFound {
        /// Missing file.
        path: PathBuf,
    },
    /// File I/O error
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Settings record could not be parsed or written
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// Tile or collider table could not be parsed or written
    #[error("table error in {}: {source}", path.display())]
    Csv {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },
    /// A table row parsed but carried an unusable value.
    #[error("invalid record {row} in {}: {reason}", path.display())]
    InvalidRecord {
        /// Table file.
        path: PathBuf,
        /// One-based data row.
        row: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// Save was requested before a directory and scene name were chosen.
    #[error("no save directory or scene name chosen")]
    SaveTargetUnspecified,
}

/// Result alias used by the scene store.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised by an [`crate::assets::AssetLoader`].
#[derive(Debug, Error)]
pub enum AssetError {
    /// No file at `path`.
    #[error("asset not found: {}", path.display())]
    Missing {
        /// Requested file.
        path: PathBuf,
    },
    /// The file exists but is not a usable image.
    #[error("failed to decode {}: {reason}", path.display())]
    Decode {
        /// Requested file.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
}

impl SceneError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SceneError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        SceneError::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>, row: usize, reason: impl Into<String>) -> Self {
        SceneError::InvalidRecord {
            path: path.into(),
            row,
            reason: reason.into(),
        }
    }
}
