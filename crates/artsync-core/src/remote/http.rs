//! Artifact server source over HTTP (libcurl).
//!
//! `GET {server_url}/{repo}/{path}`, following redirects. The body is spooled
//! to an anonymous temp file and handed back as the stream, so a dropped
//! connection surfaces here instead of halfway through a local save.

use std::collections::HashMap;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::time::Duration;

use super::{RemoteArtifactSource, RemoteFetchError};
use crate::artifact::ArtifactCoordinate;
use crate::error::{ArtifactError, Result};

/// Transfer settings for `HttpArtifactSource`.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Extra request headers (e.g. an API key header set in config).
    pub headers: HashMap<String, String>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Fetches artifacts from an artifact server's repository download URLs.
#[derive(Debug, Clone)]
pub struct HttpArtifactSource {
    base: url::Url,
    options: HttpOptions,
}

impl HttpArtifactSource {
    pub fn new(server_url: &str, options: HttpOptions) -> Result<Self> {
        if server_url.trim().is_empty() {
            return Err(ArtifactError::Configuration(
                "no artifact server URL specified".to_string(),
            ));
        }
        let mut base = url::Url::parse(server_url.trim()).map_err(|e| {
            ArtifactError::Configuration(format!("invalid server URL {}: {}", server_url, e))
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, options })
    }

    /// Download URL for `coordinate`.
    pub fn artifact_url(&self, coordinate: &ArtifactCoordinate) -> std::result::Result<url::Url, RemoteFetchError> {
        let relative = format!(
            "{}/{}",
            coordinate.repo.trim_matches('/'),
            coordinate.path.trim_start_matches('/')
        );
        self.base
            .join(&relative)
            .map_err(|_| RemoteFetchError::InvalidUrl(relative))
    }
}

impl RemoteArtifactSource for HttpArtifactSource {
    fn fetch(&self, coordinate: &ArtifactCoordinate) -> std::result::Result<Box<dyn Read + Send>, RemoteFetchError> {
        let url = self.artifact_url(coordinate)?.to_string();
        let transport = |source: curl::Error| RemoteFetchError::Transport {
            url: url.clone(),
            source,
        };

        let mut spool = tempfile::tempfile()?;
        let mut spool_error: Option<io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        easy.url(&url).map_err(transport)?;
        easy.follow_location(true).map_err(transport)?;
        easy.max_redirections(10).map_err(transport)?;
        easy.connect_timeout(self.options.connect_timeout)
            .map_err(transport)?;
        easy.timeout(self.options.timeout).map_err(transport)?;

        let mut list = curl::easy::List::new();
        for (k, v) in &self.options.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))
                .map_err(transport)?;
        }
        if !self.options.headers.is_empty() {
            easy.http_headers(list).map_err(transport)?;
        }

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match spool.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        spool_error = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(transport)?;
            transfer.perform()
        };
        if let Some(e) = spool_error {
            return Err(RemoteFetchError::Spool(e));
        }
        performed.map_err(transport)?;

        let code = easy.response_code().map_err(transport)?;
        if !(200..300).contains(&code) {
            return Err(RemoteFetchError::Status { url, code });
        }
        tracing::debug!(url = %url, "fetched artifact");

        spool.seek(SeekFrom::Start(0))?;
        Ok(Box::new(spool))
    }
}
