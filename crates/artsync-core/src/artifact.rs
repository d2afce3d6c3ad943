//! Artifact descriptors consumed by the engine and the records it produces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::checksum::ChecksumPair;

/// Remote repository coordinate: repository name plus path inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactCoordinate {
    pub repo: String,
    pub path: String,
}

impl ArtifactCoordinate {
    pub fn new(repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repo, self.path.trim_start_matches('/'))
    }
}

/// Checksums the resolver expects the artifact to have. Blank values never
/// match, so an artifact without them is always fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedChecksums {
    #[serde(default)]
    pub md5: String,
    #[serde(default)]
    pub sha1: String,
}

/// How the resolver matched the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Download only.
    #[default]
    Normal,
    /// Download, then delete anything next to it that is no longer resolved.
    Delete,
}

/// One artifact to materialize locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadableArtifact {
    pub coordinate: ArtifactCoordinate,
    /// Directory (relative to the working directory) the artifact lands in.
    #[serde(default)]
    pub target_dir: String,
    /// Path placed under `target_dir`; defaults to the coordinate path.
    #[serde(default)]
    pub relative_path: Option<String>,
    #[serde(default)]
    pub expected: ExpectedChecksums,
    /// Flat layout when `Some(true)`; callers fill `None` from their configured default.
    #[serde(default)]
    pub flat: Option<bool>,
    #[serde(default)]
    pub pattern_type: PatternType,
}

impl DownloadableArtifact {
    pub fn new(coordinate: ArtifactCoordinate, target_dir: impl Into<String>) -> Self {
        Self {
            coordinate,
            target_dir: target_dir.into(),
            relative_path: None,
            expected: ExpectedChecksums::default(),
            flat: None,
            pattern_type: PatternType::Normal,
        }
    }

    pub fn with_expected(mut self, md5: impl Into<String>, sha1: impl Into<String>) -> Self {
        self.expected = ExpectedChecksums {
            md5: md5.into(),
            sha1: sha1.into(),
        };
        self
    }

    pub fn with_flat(mut self, flat: bool) -> Self {
        self.flat = Some(flat);
        self
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    pub fn with_pattern_type(mut self, pattern_type: PatternType) -> Self {
        self.pattern_type = pattern_type;
        self
    }

    /// Path placed under the target directory.
    pub fn relative_path(&self) -> &str {
        self.relative_path
            .as_deref()
            .unwrap_or(&self.coordinate.path)
    }

    pub fn is_flat(&self) -> bool {
        self.flat.unwrap_or(false)
    }
}

/// Whether processing reused the local file or wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Already present with matching checksums.
    Skipped,
    /// Downloaded and saved during this run.
    Fetched,
}

/// Outcome of processing one `DownloadableArtifact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalArtifactRecord {
    pub coordinate: ArtifactCoordinate,
    pub local_path: PathBuf,
    /// Checksums of the file as it exists on disk now.
    pub checksums: ChecksumPair,
    pub outcome: Outcome,
    pub pattern_type: PatternType,
}
