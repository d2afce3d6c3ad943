//! Checksum command: MD5 and SHA1 of a file.

use anyhow::Result;
use artsync_core::checksum;
use std::path::Path;

pub fn run_checksum(path: &Path) -> Result<()> {
    let pair = checksum::calculate_pair(path)?;
    println!("MD5   {}  {}", pair.md5, path.display());
    println!("SHA1  {}  {}", pair.sha1, path.display());
    Ok(())
}
