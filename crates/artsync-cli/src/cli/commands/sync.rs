//! `artsync sync`: download a manifest's artifacts and sweep stale files.

use anyhow::{Context, Result};
use artsync_core::artifact::{DownloadableArtifact, Outcome};
use artsync_core::build_info::{self, Build};
use artsync_core::config::SyncConfig;
use artsync_core::engine::{ReconcileReport, ReconciliationEngine};
use artsync_core::remote::HttpArtifactSource;
use std::path::{Path, PathBuf};

const DEFAULT_MODULE_ID: &str = "artsync";

/// Options for one sync run, already merged with CLI defaults.
#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub manifest: PathBuf,
    pub working_dir: PathBuf,
    pub flat: bool,
    pub jobs: Option<usize>,
    pub server: Option<String>,
    pub module: Option<String>,
    pub build_info: Option<PathBuf>,
}

pub fn read_manifest(path: &Path) -> Result<Vec<DownloadableArtifact>> {
    let data =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parse manifest {}", path.display()))
}

/// Settles every artifact's layout: `force_flat` flattens all of them,
/// otherwise entries without a choice take `default_flat`.
pub fn apply_layout(artifacts: &mut [DownloadableArtifact], force_flat: bool, default_flat: bool) {
    for artifact in artifacts.iter_mut() {
        if force_flat {
            artifact.flat = Some(true);
        } else {
            artifact.flat.get_or_insert(default_flat);
        }
    }
}

/// Returns `Ok(false)` when at least one artifact failed.
pub async fn run_sync(cfg: SyncConfig, args: SyncArgs) -> Result<bool> {
    let mut artifacts = read_manifest(&args.manifest)?;
    apply_layout(&mut artifacts, args.flat, cfg.flat_download);

    let server_url = args
        .server
        .clone()
        .or_else(|| cfg.server_url.clone())
        .unwrap_or_default();
    let source = HttpArtifactSource::new(&server_url, cfg.http_options())?;
    let jobs = args.jobs.unwrap_or_else(|| cfg.effective_concurrency());
    let working_dir = args.working_dir.clone();
    tracing::info!(
        artifacts = artifacts.len(),
        jobs,
        working_dir = %working_dir.display(),
        "starting sync"
    );

    let report = tokio::task::spawn_blocking(move || {
        ReconciliationEngine::new(working_dir, source).reconcile(&artifacts, jobs)
    })
    .await
    .context("sync task join")?;

    print_report(&report);

    if let Some(out) = &args.build_info {
        let module_id = args
            .module
            .clone()
            .or_else(|| build_info::read_go_module_name(&args.working_dir).ok())
            .unwrap_or_else(|| DEFAULT_MODULE_ID.to_string());
        let build = Build::single_module(
            module_id,
            build_info::dependencies_from_records(&report.batch.records),
        );
        let json = serde_json::to_string_pretty(&build)?;
        std::fs::write(out, json).with_context(|| format!("write {}", out.display()))?;
        tracing::info!("wrote build info to {}", out.display());
    }

    Ok(report.batch.is_success())
}

fn print_report(report: &ReconcileReport) {
    for record in &report.batch.records {
        let verb = match record.outcome {
            Outcome::Fetched => "fetched",
            Outcome::Skipped => "skipped",
        };
        println!("{:8} {}  {}", verb, record.coordinate, record.local_path.display());
    }
    for dup in &report.batch.duplicates {
        println!("{:8} {}  {}", "dup", dup.coordinate, dup.local_path.display());
    }
    for failure in &report.batch.failures {
        println!("{:8} {}  {}", "failed", failure.coordinate, failure.error);
    }
    for path in &report.sweep.deleted {
        println!("{:8} {}", "deleted", path.display());
    }
    for (path, err) in &report.sweep.failed {
        println!("{:8} {}  {}", "kept", path.display(), err);
    }
    println!(
        "{} fetched, {} skipped, {} failed, {} deleted",
        report.batch.fetched(),
        report.batch.skipped(),
        report.batch.failures.len(),
        report.sweep.deleted.len()
    );
}
