//! Error taxonomy for artifact reconciliation.
//!
//! Every variant is scoped to a single artifact or checksum computation; batch
//! operations collect these per artifact instead of aborting.

use std::path::PathBuf;

use crate::remote::RemoteFetchError;

pub type Result<T> = std::result::Result<T, ArtifactError>;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// Digest algorithm name outside {"MD5", "SHA1"}.
    #[error("could not find checksum algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Read or write failure on a local path.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A download target already exists as a directory.
    #[error("file can't override an existing directory: {}", .path.display())]
    DirectoryConflict { path: PathBuf },

    /// Failure reported by the remote artifact source, passed through as-is.
    #[error(transparent)]
    RemoteFetch(#[from] RemoteFetchError),

    /// Missing required input (e.g. no target repository).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArtifactError::Io {
            path: path.into(),
            source,
        }
    }
}
