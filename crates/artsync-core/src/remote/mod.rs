//! Boundary to the remote artifact repository.
//!
//! The engine only depends on `RemoteArtifactSource`; `HttpArtifactSource` is
//! the curl-backed implementation talking to an artifact server.

mod http;

pub use http::{HttpArtifactSource, HttpOptions};

use std::io::Read;

use crate::artifact::ArtifactCoordinate;

/// Error surfaced by a remote source (network, HTTP status, local spooling).
/// Not retried by the engine.
#[derive(Debug, thiserror::Error)]
pub enum RemoteFetchError {
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("invalid artifact URL {0}")]
    InvalidUrl(String),

    #[error("failed to buffer response body: {0}")]
    Spool(#[from] std::io::Error),

    #[error("artifact not available: {0}")]
    Unavailable(String),
}

/// Supplies artifact byte streams.
pub trait RemoteArtifactSource: Send + Sync {
    fn fetch(&self, coordinate: &ArtifactCoordinate) -> Result<Box<dyn Read + Send>, RemoteFetchError>;
}

impl<T: RemoteArtifactSource + ?Sized> RemoteArtifactSource for &T {
    fn fetch(&self, coordinate: &ArtifactCoordinate) -> Result<Box<dyn Read + Send>, RemoteFetchError> {
        (**self).fetch(coordinate)
    }
}

impl<T: RemoteArtifactSource + ?Sized> RemoteArtifactSource for Box<T> {
    fn fetch(&self, coordinate: &ArtifactCoordinate) -> Result<Box<dyn Read + Send>, RemoteFetchError> {
        (**self).fetch(coordinate)
    }
}
