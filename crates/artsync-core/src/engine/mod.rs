//! Reconciliation engine.
//!
//! For each requested artifact: resolve its local path, skip it when the file
//! on disk already carries the expected MD5 and SHA1, otherwise fetch it from
//! the remote source and save it atomically. After a batch, stale siblings of
//! deletion candidates are swept unless they are (or prefix) a resolved path.

mod batch;
mod cleanup;

pub use batch::{ArtifactFailure, BatchReport, DuplicateTarget};
pub use cleanup::{is_resolved_or_parent_of_resolved, remove_unused_artifacts, SweepReport};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::artifact::{DownloadableArtifact, ExpectedChecksums, LocalArtifactRecord, Outcome, PatternType};
use crate::checksum::{self, ChecksumPair};
use crate::error::{ArtifactError, Result};
use crate::layout;
use crate::remote::RemoteArtifactSource;
use crate::store::LocalFileStore;

/// Skip-or-fetch verdict for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Local file is present with both expected checksums.
    Skip(ChecksumPair),
    /// Download needed; `overriding` is set when an existing file will be replaced.
    Fetch { overriding: bool },
}

/// Result of a full reconcile: downloads, then the cleanup sweep.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub batch: BatchReport,
    pub sweep: SweepReport,
}

/// Drives downloads into `working_dir` from a remote source.
pub struct ReconciliationEngine<S> {
    working_dir: PathBuf,
    source: S,
    store: LocalFileStore,
}

impl<S: RemoteArtifactSource> ReconciliationEngine<S> {
    pub fn new(working_dir: impl Into<PathBuf>, source: S) -> Self {
        Self {
            working_dir: working_dir.into(),
            source,
            store: LocalFileStore,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Absolute local path for `artifact`.
    pub fn target_path(&self, artifact: &DownloadableArtifact) -> PathBuf {
        layout::resolve_target_path(
            &self.working_dir,
            &artifact.target_dir,
            artifact.relative_path(),
            artifact.is_flat(),
        )
    }

    /// Decides whether `artifact` must be downloaded.
    ///
    /// Fails with `DirectoryConflict` when the target is a directory, and
    /// propagates checksum errors for an unreadable local file.
    pub fn decide(&self, artifact: &DownloadableArtifact) -> Result<Decision> {
        self.decide_at(&self.target_path(artifact), &artifact.expected)
    }

    fn decide_at(&self, path: &Path, expected: &ExpectedChecksums) -> Result<Decision> {
        if !self.store.exists(path) {
            return Ok(Decision::Fetch { overriding: false });
        }
        if self.store.is_directory(path) {
            return Err(ArtifactError::DirectoryConflict {
                path: path.to_path_buf(),
            });
        }

        let actual = checksum::calculate_pair(path)?;
        if checksums_match(expected, &actual) {
            return Ok(Decision::Skip(actual));
        }

        tracing::info!("Overriding existing file: {}", path.display());
        Ok(Decision::Fetch { overriding: true })
    }

    /// Materializes one artifact and reports the checksums of the file now on disk.
    pub fn process(&self, artifact: &DownloadableArtifact) -> Result<LocalArtifactRecord> {
        validate(artifact)?;
        let local_path = self.target_path(artifact);
        self.process_at(artifact, local_path)
    }

    fn process_at(
        &self,
        artifact: &DownloadableArtifact,
        local_path: PathBuf,
    ) -> Result<LocalArtifactRecord> {
        let (checksums, outcome) = match self.decide_at(&local_path, &artifact.expected)? {
            Decision::Skip(checksums) => {
                tracing::debug!(artifact = %artifact.coordinate, path = %local_path.display(), "up to date, skipping");
                (checksums, Outcome::Skipped)
            }
            Decision::Fetch { .. } => {
                tracing::debug!(artifact = %artifact.coordinate, path = %local_path.display(), "downloading");
                let mut stream = self.source.fetch(&artifact.coordinate)?;
                self.store.save(&mut stream, &local_path)?;
                (checksum::calculate_pair(&local_path)?, Outcome::Fetched)
            }
        };
        Ok(LocalArtifactRecord {
            coordinate: artifact.coordinate.clone(),
            local_path,
            checksums,
            outcome,
            pattern_type: artifact.pattern_type,
        })
    }

    /// Deletes siblings of each deletion candidate that are not resolved.
    /// Best-effort: failures are collected in the report, never returned.
    pub fn remove_unused_artifacts(
        &self,
        resolved: &BTreeSet<PathBuf>,
        candidates: &BTreeSet<PathBuf>,
    ) -> SweepReport {
        cleanup::remove_unused_artifacts(&self.store, resolved, candidates)
    }

    /// Downloads every artifact, then sweeps around `Delete`-pattern artifacts.
    ///
    /// The sweep starts only after every download has finished. Target paths of
    /// failed artifacts count as resolved, so a failed refresh never deletes the
    /// previous copy.
    pub fn reconcile(
        &self,
        artifacts: &[DownloadableArtifact],
        max_concurrent: usize,
    ) -> ReconcileReport {
        let batch = self.download_all(artifacts, max_concurrent);

        let mut resolved: BTreeSet<PathBuf> =
            batch.records.iter().map(|r| r.local_path.clone()).collect();
        resolved.extend(batch.failures.iter().map(|f| f.local_path.clone()));

        let candidates: BTreeSet<PathBuf> = batch
            .records
            .iter()
            .filter(|r| r.pattern_type == PatternType::Delete)
            .map(|r| r.local_path.clone())
            .collect();

        let sweep = if candidates.is_empty() {
            SweepReport::default()
        } else {
            self.remove_unused_artifacts(&resolved, &candidates)
        };
        ReconcileReport { batch, sweep }
    }
}

/// Both expected values must be non-blank and equal to the actual ones.
pub fn checksums_match(expected: &ExpectedChecksums, actual: &ChecksumPair) -> bool {
    !expected.md5.trim().is_empty()
        && expected.md5 == actual.md5
        && !expected.sha1.trim().is_empty()
        && expected.sha1 == actual.sha1
}

fn validate(artifact: &DownloadableArtifact) -> Result<()> {
    if artifact.coordinate.repo.trim().is_empty() {
        return Err(ArtifactError::Configuration(format!(
            "no target repository specified for {}",
            artifact.coordinate.path
        )));
    }
    Ok(())
}
