//! Streaming SHA-256 digest computation.
//!
//! Artifacts can be multiple gigabytes, so file digests are computed with a
//! bounded, reusable buffer rather than reading whole files into memory.
//! The manifest is hashed from its serialized bytes after writing, so a
//! byte-slice variant is provided as well.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Buffer size for reading files during digest calculation (256 KiB).
const BUFFER_SIZE: usize = 256 * 1024;

/// Calculate the SHA-256 digest of a file.
///
/// Reads the file in fixed-size chunks; memory use is independent of file
/// size.
///
/// # Returns
///
/// The lowercase hexadecimal SHA-256 hash of the file contents.
///
/// # Errors
///
/// Propagates any I/O error from opening or reading the file.
pub fn file_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Calculate the SHA-256 digest of an in-memory byte slice.
pub fn bytes_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
