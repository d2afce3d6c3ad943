//! Batch processing with bounded parallelism.
//!
//! Each artifact is decided and fetched independently; a failure is recorded
//! against its artifact and never stops the rest of the batch.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};

use super::{validate, ReconciliationEngine};
use crate::artifact::{ArtifactCoordinate, DownloadableArtifact, LocalArtifactRecord, Outcome};
use crate::error::{ArtifactError, Result};
use crate::remote::RemoteArtifactSource;

/// An artifact that could not be materialized.
#[derive(Debug)]
pub struct ArtifactFailure {
    pub coordinate: ArtifactCoordinate,
    pub local_path: PathBuf,
    pub error: ArtifactError,
}

/// An artifact dropped because an earlier one resolves to the same local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTarget {
    pub coordinate: ArtifactCoordinate,
    pub local_path: PathBuf,
}

/// Per-artifact results of `download_all`; records keep input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<LocalArtifactRecord>,
    pub failures: Vec<ArtifactFailure>,
    pub duplicates: Vec<DuplicateTarget>,
}

impl BatchReport {
    pub fn fetched(&self) -> usize {
        self.count(Outcome::Fetched)
    }

    pub fn skipped(&self) -> usize {
        self.count(Outcome::Skipped)
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }
}

impl<S: RemoteArtifactSource> ReconciliationEngine<S> {
    /// Processes `artifacts` with at most `max_concurrent` in flight (minimum 1).
    ///
    /// Artifacts resolving to a local path already claimed by an earlier entry
    /// are not processed and are listed in `duplicates`.
    pub fn download_all(
        &self,
        artifacts: &[DownloadableArtifact],
        max_concurrent: usize,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut work: VecDeque<(usize, &DownloadableArtifact, PathBuf)> = VecDeque::new();

        for (index, artifact) in artifacts.iter().enumerate() {
            let local_path = self.target_path(artifact);
            if let Err(error) = validate(artifact) {
                report.failures.push(ArtifactFailure {
                    coordinate: artifact.coordinate.clone(),
                    local_path,
                    error,
                });
                continue;
            }
            if !claimed.insert(local_path.clone()) {
                tracing::warn!(
                    artifact = %artifact.coordinate,
                    path = %local_path.display(),
                    "another artifact already targets this path, ignoring"
                );
                report.duplicates.push(DuplicateTarget {
                    coordinate: artifact.coordinate.clone(),
                    local_path,
                });
                continue;
            }
            work.push_back((index, artifact, local_path));
        }

        if work.is_empty() {
            return report;
        }

        let num_workers = max_concurrent.max(1).min(work.len());
        let work = Mutex::new(work);
        let (tx, rx) = mpsc::channel();
        std::thread::scope(|scope| {
            for _ in 0..num_workers {
                let tx = tx.clone();
                let work = &work;
                scope.spawn(move || loop {
                    let next = match work.lock() {
                        Ok(mut queue) => queue.pop_front(),
                        Err(_) => None,
                    };
                    let Some((index, artifact, local_path)) = next else {
                        break;
                    };
                    let result = self.process_at(artifact, local_path.clone());
                    if tx.send((index, artifact, local_path, result)).is_err() {
                        break;
                    }
                });
            }
        });
        drop(tx);

        let mut results: Vec<(usize, &DownloadableArtifact, PathBuf, Result<LocalArtifactRecord>)> =
            rx.into_iter().collect();
        results.sort_by_key(|(index, ..)| *index);

        for (_, artifact, local_path, result) in results {
            match result {
                Ok(record) => report.records.push(record),
                Err(error) => {
                    tracing::warn!(artifact = %artifact.coordinate, "failed: {}", error);
                    report.failures.push(ArtifactFailure {
                        coordinate: artifact.coordinate.clone(),
                        local_path,
                        error,
                    });
                }
            }
        }
        report
    }
}
