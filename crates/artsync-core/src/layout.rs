//! Local placement of downloaded artifacts.
//!
//! A target path is `working_dir / target_dir / relative_path`, where the
//! relative path is either kept whole (hierarchical layout) or reduced to its
//! last segment (flat layout). Pure path arithmetic; nothing here touches disk.

use std::path::{Path, PathBuf};

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Lexically normalizes `path` into segments: drops empty and `.` segments,
/// and lets `..` remove the previous segment but never climb above the start.
fn normalized_segments(path: &str) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for segment in path.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    out
}

/// Returns the part of `relative_path` that is placed under the target
/// directory: the final segment when `flat` is set and the path is nested,
/// otherwise the path unchanged.
pub fn download_relative_path(relative_path: &str, flat: bool) -> &str {
    if flat {
        if let Some(idx) = relative_path.rfind(is_separator) {
            return &relative_path[idx + 1..];
        }
    }
    relative_path
}

/// Resolves the absolute local path of an artifact.
///
/// `target_dir` is always taken relative to `working_dir` and cannot climb out
/// of it; `relative_path` likewise cannot climb out of the target directory.
///
/// # Examples
///
/// - `("/w", "out", "a/b/c.txt", true)` → `/w/out/c.txt`
/// - `("/w", "out", "a/b/c.txt", false)` → `/w/out/a/b/c.txt`
pub fn resolve_target_path(
    working_dir: &Path,
    target_dir: &str,
    relative_path: &str,
    flat: bool,
) -> PathBuf {
    let mut path = working_dir.to_path_buf();
    for segment in normalized_segments(target_dir) {
        path.push(segment);
    }
    for segment in normalized_segments(download_relative_path(relative_path, flat)) {
        path.push(segment);
    }
    path
}
