//! Tests for the sync subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_sync_minimal() {
    match parse(&["artsync", "sync", "--manifest", "deps.json"]) {
        CliCommand::Sync {
            manifest,
            working_dir,
            flat,
            jobs,
            server,
            module,
            build_info,
        } => {
            assert_eq!(manifest, Path::new("deps.json"));
            assert!(working_dir.is_none());
            assert!(!flat);
            assert!(jobs.is_none());
            assert!(server.is_none());
            assert!(module.is_none());
            assert!(build_info.is_none());
        }
        _ => panic!("expected Sync"),
    }
}

#[test]
fn cli_parse_sync_all_options() {
    match parse(&[
        "artsync",
        "sync",
        "--manifest",
        "deps.json",
        "--working-dir",
        "/tmp/w",
        "--flat",
        "--jobs",
        "8",
        "--server",
        "https://repo.example.com/artifactory",
        "--module",
        "example.com/m",
        "--build-info",
        "build.json",
    ]) {
        CliCommand::Sync {
            working_dir,
            flat,
            jobs,
            server,
            module,
            build_info,
            ..
        } => {
            assert_eq!(working_dir.as_deref(), Some(Path::new("/tmp/w")));
            assert!(flat);
            assert_eq!(jobs, Some(8));
            assert_eq!(server.as_deref(), Some("https://repo.example.com/artifactory"));
            assert_eq!(module.as_deref(), Some("example.com/m"));
            assert_eq!(build_info.as_deref(), Some(Path::new("build.json")));
        }
        _ => panic!("expected Sync with options"),
    }
}

#[test]
fn cli_parse_sync_requires_manifest() {
    assert!(Cli::try_parse_from(["artsync", "sync"]).is_err());
}

#[test]
fn cli_parse_sync_rejects_non_numeric_jobs() {
    assert!(Cli::try_parse_from(["artsync", "sync", "--manifest", "m.json", "--jobs", "many"]).is_err());
}
