//! MD5 + SHA1 checksums for local files, computed in a single read pass.
//!
//! Every requested algorithm gets its own hasher; each chunk read from disk is
//! fed to all of them before the next read, so large artifacts are read once
//! no matter how many digests are asked for.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{ArtifactError, Result};

const BUF_SIZE: usize = 64 * 1024;

pub const MD5_ALGORITHM_NAME: &str = "MD5";
pub const SHA1_ALGORITHM_NAME: &str = "SHA1";

/// Digest algorithms recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
}

impl ChecksumAlgorithm {
    /// Literal identifier used in checksum maps ("MD5" / "SHA1").
    pub fn name(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => MD5_ALGORITHM_NAME,
            ChecksumAlgorithm::Sha1 => SHA1_ALGORITHM_NAME,
        }
    }

    /// Case-sensitive lookup; anything but "MD5" or "SHA1" is rejected.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            MD5_ALGORITHM_NAME => Ok(ChecksumAlgorithm::Md5),
            SHA1_ALGORITHM_NAME => Ok(ChecksumAlgorithm::Sha1),
            other => Err(ArtifactError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    fn hasher(self) -> Hasher {
        match self {
            ChecksumAlgorithm::Md5 => Hasher::Md5(Md5::new()),
            ChecksumAlgorithm::Sha1 => Hasher::Sha1(Sha1::new()),
        }
    }
}

enum Hasher {
    Md5(Md5),
    Sha1(Sha1),
}

impl Hasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Md5(h) => h.update(data),
            Hasher::Sha1(h) => h.update(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Hasher::Md5(h) => hex::encode(h.finalize()),
            Hasher::Sha1(h) => hex::encode(h.finalize()),
        }
    }
}

/// The (MD5, SHA1) pair used jointly to confirm file identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumPair {
    pub md5: String,
    pub sha1: String,
}

/// Computes the requested digests of `path` and returns them keyed by algorithm
/// name, as lowercase hex.
///
/// All names are validated before the file is opened, so an unsupported name
/// yields an error and no digests at all.
pub fn calculate_checksums(path: &Path, algorithms: &[&str]) -> Result<BTreeMap<String, String>> {
    let algorithms = algorithms
        .iter()
        .map(|name| ChecksumAlgorithm::from_name(name))
        .collect::<Result<Vec<_>>>()?;
    let digests = digest_file(path, &algorithms)?;
    Ok(digests
        .into_iter()
        .map(|(algorithm, hex)| (algorithm.name().to_string(), hex))
        .collect())
}

/// MD5 and SHA1 of `path` in one pass.
pub fn calculate_pair(path: &Path) -> Result<ChecksumPair> {
    let mut digests = digest_file(path, &[ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha1])?;
    let sha1 = digests.pop().map(|(_, hex)| hex).unwrap_or_default();
    let md5 = digests.pop().map(|(_, hex)| hex).unwrap_or_default();
    Ok(ChecksumPair { md5, sha1 })
}

fn digest_file(
    path: &Path,
    algorithms: &[ChecksumAlgorithm],
) -> Result<Vec<(ChecksumAlgorithm, String)>> {
    let mut f = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
    let mut hashers: Vec<(ChecksumAlgorithm, Hasher)> =
        algorithms.iter().map(|a| (*a, a.hasher())).collect();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf).map_err(|e| ArtifactError::io(path, e))?;
        if n == 0 {
            break;
        }
        for (_, hasher) in hashers.iter_mut() {
            hasher.update(&buf[..n]);
        }
    }
    Ok(hashers
        .into_iter()
        .map(|(algorithm, hasher)| (algorithm, hasher.finalize_hex()))
        .collect())
}
