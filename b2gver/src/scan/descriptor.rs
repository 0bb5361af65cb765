//! Line scanning of INI-style descriptor files.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::ScanError;

/// Scan `path` line by line for the first line containing `key` and an
/// `=` separator, yielding the portion after the first `=`.
///
/// A line that contains the key but no separator is not a usable
/// assignment and scanning continues past it.
pub async fn scan_for_key(path: &Path, key: &str) -> Result<String, ScanError> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    while let Some(line) = lines.next_line().await? {
        if !line.contains(key) {
            continue;
        }
        let Some((_, value)) = line.split_once('=') else {
            continue;
        };
        return Ok(value.to_string());
    }

    Err(ScanError::NotFound {
        path: path.to_path_buf(),
        needle: key.to_string(),
    })
}
