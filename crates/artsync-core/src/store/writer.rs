//! Sequential writer for `.part` temp files with rename-on-finalize.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{ArtifactError, Result};

/// Writer for a temp download file. Dropping it without `finalize` removes the
/// temp file, so an interrupted save never leaves a half-written artifact behind.
pub struct PartFileWriter {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
}

impl PartFileWriter {
    /// Create a new temp file at `temp_path` (e.g. `destination.part`).
    /// Truncates a stale temp file left by an earlier crash.
    pub fn create(temp_path: &Path) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .map_err(|e| ArtifactError::io(temp_path, e))?;
        Ok(PartFileWriter {
            file: Some(BufWriter::new(file)),
            temp_path: temp_path.to_path_buf(),
        })
    }

    /// Copies `reader` to the end of the temp file. Returns bytes copied.
    pub fn copy_from(&mut self, reader: &mut dyn Read) -> Result<u64> {
        let temp_path = self.temp_path.clone();
        let file = self.file_mut()?;
        io::copy(reader, file).map_err(|e| ArtifactError::io(temp_path, e))
    }

    /// Flush buffered bytes and sync file data to disk.
    pub fn sync(&mut self) -> Result<()> {
        let temp_path = self.temp_path.clone();
        let file = self.file_mut()?;
        file.flush()
            .and_then(|_| file.get_ref().sync_all())
            .map_err(|e| ArtifactError::io(temp_path, e))
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Atomically rename the temp file to the final path. Consumes the writer and closes the file.
    pub fn finalize(mut self, final_path: &Path) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .map_err(|e| ArtifactError::io(&self.temp_path, e))?;
        }
        fs::rename(&self.temp_path, final_path).map_err(|e| ArtifactError::io(final_path, e))?;
        self.temp_path = PathBuf::new();
        Ok(())
    }

    fn file_mut(&mut self) -> Result<&mut BufWriter<File>> {
        let temp_path = &self.temp_path;
        self.file.as_mut().ok_or_else(|| {
            ArtifactError::io(
                temp_path,
                io::Error::new(io::ErrorKind::Other, "temp file already closed"),
            )
        })
    }
}

impl Drop for PartFileWriter {
    fn drop(&mut self) {
        self.file.take();
        if self.temp_path.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.temp_path.display(), "failed to remove temp file: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn create_copy_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let tp = dir.path().join("out.bin.part");
        let final_path = dir.path().join("out.bin");

        let mut writer = PartFileWriter::create(&tp).unwrap();
        assert_eq!(writer.temp_path(), tp.as_path());
        writer.copy_from(&mut Cursor::new(b"hello ".to_vec())).unwrap();
        writer.copy_from(&mut Cursor::new(b"world".to_vec())).unwrap();
        writer.sync().unwrap();
        writer.finalize(&final_path).unwrap();

        assert!(!tp.exists());
        assert_eq!(fs::read(&final_path).unwrap(), b"hello world");
    }

    #[test]
    fn drop_without_finalize_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let tp = dir.path().join("abandoned.part");
        {
            let mut writer = PartFileWriter::create(&tp).unwrap();
            writer.copy_from(&mut Cursor::new(vec![1u8; 1024])).unwrap();
            assert!(tp.exists());
        }
        assert!(!tp.exists());
    }

    #[test]
    fn create_truncates_stale_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let tp = dir.path().join("stale.part");
        fs::write(&tp, b"stale bytes from a crash").unwrap();
        let mut writer = PartFileWriter::create(&tp).unwrap();
        writer.copy_from(&mut Cursor::new(b"new".to_vec())).unwrap();
        let final_path = dir.path().join("stale");
        writer.finalize(&final_path).unwrap();
        assert_eq!(fs::read(&final_path).unwrap(), b"new");
    }
}
