//! Build-metadata records assembled from reconciled artifacts.
//!
//! The engine reports what it materialized; this module turns those records
//! into the dependency list of a build module, and reads a Go module's name
//! from its `go.mod` so the module can be identified.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::artifact::LocalArtifactRecord;

/// Name of the Go module file inside a module root.
pub const GO_MOD_FILENAME: &str = "go.mod";

/// A dependency as attached to a build module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: String,
    pub md5: String,
    pub sha1: String,
    pub local_path: PathBuf,
}

impl From<&LocalArtifactRecord> for Dependency {
    /// Uses the file name as id and the checksums measured on disk.
    fn from(record: &LocalArtifactRecord) -> Self {
        let id = record
            .local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| record.coordinate.path.clone());
        Self {
            id,
            md5: record.checksums.md5.clone(),
            sha1: record.checksums.sha1.clone(),
            local_path: record.local_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub modules: Vec<Module>,
}

impl Build {
    pub fn single_module(id: impl Into<String>, dependencies: Vec<Dependency>) -> Self {
        Self {
            modules: vec![Module {
                id: id.into(),
                dependencies,
            }],
        }
    }
}

/// Dependencies for every record, in order.
pub fn dependencies_from_records(records: &[LocalArtifactRecord]) -> Vec<Dependency> {
    records.iter().map(Dependency::from).collect()
}

fn module_directive() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^module\s+"?([\w.@:%+\-~#?&/]+?[\w])"?\s*(?://.*)?$"#)
            .expect("module directive regex")
    })
}

/// Module path declared by the `module` directive of go.mod text, if any.
/// The last matching directive wins.
pub fn parse_go_module_name(go_mod: &str) -> Option<String> {
    go_mod
        .lines()
        .filter_map(|line| module_directive().captures(line.trim()))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .last()
}

/// Reads `<module_dir>/go.mod` and returns its module name.
pub fn read_go_module_name(module_dir: &Path) -> Result<String> {
    let path = module_dir.join(GO_MOD_FILENAME);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read {}", path.display()))?;
    parse_go_module_name(&text)
        .with_context(|| format!("no module directive in {}", path.display()))
}
