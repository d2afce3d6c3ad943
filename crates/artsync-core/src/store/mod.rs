//! Local file-system adapter.
//!
//! Existence and directory checks, atomic save of a byte stream (write to
//! `.part`, sync, rename), sibling enumeration and deletion.

mod writer;

pub use writer::PartFileWriter;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{ArtifactError, Result};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `lib.jar` → `lib.jar.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// File-system operations used by the reconciliation engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    pub fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// Writes `reader` to `path`, creating parent directories as needed.
    /// Returns the number of bytes written.
    ///
    /// The bytes land in `<path>.part` first and are renamed into place only
    /// after a full copy and sync; on any failure the temp file is removed and
    /// `path` is left as it was. Fails with `DirectoryConflict` if `path` is a
    /// directory.
    pub fn save(&self, reader: &mut dyn Read, path: &Path) -> Result<u64> {
        if path.is_dir() {
            return Err(ArtifactError::DirectoryConflict {
                path: path.to_path_buf(),
            });
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))?;
        }

        let mut writer = PartFileWriter::create(&temp_path(path))?;
        let written = writer.copy_from(reader)?;
        writer.sync()?;
        writer.finalize(path)?;
        tracing::debug!(path = %path.display(), bytes = written, "saved artifact");
        Ok(written)
    }

    /// Entries of `path`'s parent directory (including `path` itself if it exists).
    /// A missing parent yields an empty list.
    pub fn list_siblings(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let Some(parent) = path.parent() else {
            return Ok(Vec::new());
        };
        list_dir(parent)
    }

    /// Deletes a file, or a directory with everything under it.
    pub fn delete(&self, path: &Path) -> io::Result<()> {
        let meta = fs::symlink_metadata(path)?;
        if meta.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}

/// Entries of `dir`, sorted; a missing directory yields an empty list.
fn list_dir(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut out = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    out.sort();
    Ok(out)
}
