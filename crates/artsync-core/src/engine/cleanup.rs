//! Sweep of stale local files around deletion candidates.
//!
//! Protection is a plain string-prefix test against the resolved paths: a
//! sibling survives if it equals a resolved path or is a textual prefix of one.
//! That keeps ancestor directories of live files, and also keeps any sibling
//! whose name merely prefixes a resolved path (`kee` next to `keep.txt`).
//! Deletion behavior depends on this, so it is not tree containment.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::store::LocalFileStore;

/// What a sweep removed and what it failed to remove.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// True if `path` equals a resolved path or is a string prefix of one.
pub fn is_resolved_or_parent_of_resolved(resolved: &BTreeSet<PathBuf>, path: &Path) -> bool {
    let path = path.to_string_lossy();
    resolved
        .iter()
        .any(|r| r.to_string_lossy().starts_with(path.as_ref()))
}

/// For every candidate, deletes each entry of its parent directory that is not
/// resolved or a prefix of a resolved path. Each deletion is independent; a
/// failure is recorded and the sweep moves on.
pub fn remove_unused_artifacts(
    store: &LocalFileStore,
    resolved: &BTreeSet<PathBuf>,
    candidates: &BTreeSet<PathBuf>,
) -> SweepReport {
    let mut report = SweepReport::default();
    // One candidate per parent directory; the listing is the same for all of them.
    let mut by_parent: BTreeMap<&Path, &Path> = BTreeMap::new();
    for candidate in candidates {
        if let Some(parent) = candidate.parent() {
            by_parent.entry(parent).or_insert(candidate.as_path());
        }
    }

    for (parent, candidate) in by_parent {
        let siblings = match store.list_siblings(candidate) {
            Ok(siblings) => siblings,
            Err(e) => {
                tracing::warn!(dir = %parent.display(), "failed to list directory: {}", e);
                report.failed.push((parent.to_path_buf(), e));
                continue;
            }
        };
        for sibling in siblings {
            if is_resolved_or_parent_of_resolved(resolved, &sibling) {
                continue;
            }
            match store.delete(&sibling) {
                Ok(()) => {
                    tracing::info!("Deleted unresolved file '{}'", sibling.display());
                    report.deleted.push(sibling);
                }
                Err(e) => {
                    tracing::warn!(path = %sibling.display(), "failed to delete unresolved file: {}", e);
                    report.failed.push((sibling, e));
                }
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn set(paths: &[PathBuf]) -> BTreeSet<PathBuf> {
        paths.iter().cloned().collect()
    }

    #[test]
    fn stale_sibling_is_deleted_and_resolved_kept() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        fs::create_dir(&a).unwrap();
        let keep = a.join("keep.txt");
        let stale = a.join("stale.txt");
        fs::write(&keep, b"k").unwrap();
        fs::write(&stale, b"s").unwrap();

        let report =
            remove_unused_artifacts(&LocalFileStore, &set(&[keep.clone()]), &set(&[keep.clone()]));

        assert!(keep.exists());
        assert!(!stale.exists());
        assert_eq!(report.deleted, vec![stale]);
        assert!(report.is_clean());
    }

    #[test]
    fn ancestor_directory_of_resolved_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub/deeper");
        fs::create_dir_all(&nested).unwrap();
        let live = nested.join("live.txt");
        let top = dir.path().join("top.txt");
        let old_dir = dir.path().join("old");
        fs::write(&live, b"l").unwrap();
        fs::write(&top, b"t").unwrap();
        fs::create_dir(&old_dir).unwrap();
        fs::write(old_dir.join("x.txt"), b"x").unwrap();

        let report = remove_unused_artifacts(
            &LocalFileStore,
            &set(&[live.clone(), top.clone()]),
            &set(&[top.clone()]),
        );

        assert!(live.exists());
        assert!(top.exists());
        assert!(!old_dir.exists());
        assert_eq!(report.deleted, vec![old_dir]);
    }

    #[test]
    fn textual_prefix_sibling_is_protected_even_if_not_an_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("keep.txt");
        let prefix_named = dir.path().join("kee");
        let other = dir.path().join("other.txt");
        fs::write(&keep, b"k").unwrap();
        fs::write(&prefix_named, b"p").unwrap();
        fs::write(&other, b"o").unwrap();

        remove_unused_artifacts(&LocalFileStore, &set(&[keep.clone()]), &set(&[keep.clone()]));

        assert!(keep.exists());
        assert!(prefix_named.exists(), "string-prefix match protects it");
        assert!(!other.exists());
    }

    #[test]
    fn empty_resolved_set_clears_candidate_directory() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let report = remove_unused_artifacts(&LocalFileStore, &BTreeSet::new(), &set(&[a.clone()]));

        assert!(!a.exists());
        assert!(!b.exists());
        assert_eq!(report.deleted.len(), 2);
    }

    #[test]
    fn missing_candidate_directory_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone/x.txt");
        let report = remove_unused_artifacts(&LocalFileStore, &BTreeSet::new(), &set(&[gone]));
        assert!(report.deleted.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn candidates_sharing_a_parent_sweep_it_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let stale = dir.path().join("stale.txt");
        for p in [&a, &b, &stale] {
            fs::write(p, b"x").unwrap();
        }
        let report = remove_unused_artifacts(
            &LocalFileStore,
            &set(&[a.clone(), b.clone()]),
            &set(&[a.clone(), b.clone()]),
        );
        assert_eq!(report.deleted, vec![stale]);
        assert!(report.is_clean());
    }

    #[test]
    fn prefix_check() {
        let resolved = set(&[PathBuf::from("/w/a/keep.txt")]);
        assert!(is_resolved_or_parent_of_resolved(&resolved, Path::new("/w/a/keep.txt")));
        assert!(is_resolved_or_parent_of_resolved(&resolved, Path::new("/w/a")));
        assert!(is_resolved_or_parent_of_resolved(&resolved, Path::new("/w/a/kee")));
        assert!(!is_resolved_or_parent_of_resolved(&resolved, Path::new("/w/a/stale.txt")));
        assert!(!is_resolved_or_parent_of_resolved(&resolved, Path::new("/w/a/keep.txt.bak")));
    }
}
