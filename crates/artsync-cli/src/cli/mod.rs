//! CLI for the artsync reconciliation engine.

mod commands;

use anyhow::Result;
use artsync_core::config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_checksum, run_module_name, run_sync, run_target_path, SyncArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "artsync")]
#[command(about = "artsync: mirror artifact repository files into a working directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the artifacts listed in a JSON manifest, skipping unchanged files.
    Sync {
        /// JSON file with an array of downloadable artifacts.
        #[arg(long)]
        manifest: PathBuf,
        /// Directory artifacts are placed under (default: current directory).
        #[arg(long)]
        working_dir: Option<PathBuf>,
        /// Flatten every artifact's relative path to its file name.
        #[arg(long)]
        flat: bool,
        /// Download up to N artifacts concurrently (default from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
        /// Artifact server base URL (overrides config).
        #[arg(long)]
        server: Option<String>,
        /// Module id for the build info (default: go.mod module name, if any).
        #[arg(long)]
        module: Option<String>,
        /// Write build info (module + dependencies) as JSON to this file.
        #[arg(long)]
        build_info: Option<PathBuf>,
    },

    /// Print MD5 and SHA1 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print the local path an artifact would be placed at.
    TargetPath {
        /// Target directory (relative to the working directory).
        target_dir: String,
        /// Relative path of the artifact.
        relative_path: String,
        /// Use the flat layout.
        #[arg(long)]
        flat: bool,
        /// Working directory (default: current directory).
        #[arg(long)]
        working_dir: Option<PathBuf>,
    },

    /// Print the module name declared in a go.mod.
    ModuleName {
        /// Module root containing go.mod (default: current directory).
        dir: Option<PathBuf>,
    },
}

fn current_dir_or(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(d) => Ok(d),
        None => Ok(std::env::current_dir()?),
    }
}

impl CliCommand {
    /// Runs the parsed command. `Ok(false)` means it ran but some artifact failed.
    pub async fn run_from_args() -> Result<bool> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Sync {
                manifest,
                working_dir,
                flat,
                jobs,
                server,
                module,
                build_info,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let args = SyncArgs {
                    manifest,
                    working_dir: current_dir_or(working_dir)?,
                    flat,
                    jobs,
                    server,
                    module,
                    build_info,
                };
                return run_sync(cfg, args).await;
            }
            CliCommand::Checksum { path } => run_checksum(&path)?,
            CliCommand::TargetPath {
                target_dir,
                relative_path,
                flat,
                working_dir,
            } => {
                let working_dir = current_dir_or(working_dir)?;
                run_target_path(&working_dir, &target_dir, &relative_path, flat);
            }
            CliCommand::ModuleName { dir } => run_module_name(&current_dir_or(dir)?)?,
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests;
