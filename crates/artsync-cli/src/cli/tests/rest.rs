//! Tests for checksum, target-path and module-name subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_checksum() {
    match parse(&["artsync", "checksum", "/tmp/x.jar"]) {
        CliCommand::Checksum { path } => assert_eq!(path, Path::new("/tmp/x.jar")),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_target_path() {
    match parse(&["artsync", "target-path", "out", "a/b/c.txt", "--flat"]) {
        CliCommand::TargetPath {
            target_dir,
            relative_path,
            flat,
            working_dir,
        } => {
            assert_eq!(target_dir, "out");
            assert_eq!(relative_path, "a/b/c.txt");
            assert!(flat);
            assert!(working_dir.is_none());
        }
        _ => panic!("expected TargetPath"),
    }
}

#[test]
fn cli_parse_module_name() {
    match parse(&["artsync", "module-name"]) {
        CliCommand::ModuleName { dir } => assert!(dir.is_none()),
        _ => panic!("expected ModuleName"),
    }
    match parse(&["artsync", "module-name", "/src/mod"]) {
        CliCommand::ModuleName { dir } => assert_eq!(dir.as_deref(), Some(Path::new("/src/mod"))),
        _ => panic!("expected ModuleName with dir"),
    }
}

#[test]
fn cli_parse_unknown_subcommand_fails() {
    assert!(Cli::try_parse_from(["artsync", "upload"]).is_err());
}
