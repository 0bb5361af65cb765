//! Sequential zip entry extraction.
//!
//! Application bundles are scanned as a forward-only stream of entries
//! rather than through the central directory, so a bundle with hundreds
//! of irrelevant entries costs no memory: every entry before the target
//! is drained to the sink and never buffered.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use zip::read::read_zipfile_from_stream;

use crate::error::ExtractError;

/// Where a scan currently stands.
///
/// A scan advances `NotStarted -> Scanning -> Found | Exhausted` and can
/// be driven exactly once; the underlying reader is consumed as entries
/// stream past, so there is no rewinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No entry has been read yet.
    NotStarted,
    /// Entries are being read and discarded.
    Scanning,
    /// The target entry was located and handed to the caller.
    Found,
    /// The archive ended without the target entry appearing.
    Exhausted,
}

/// Forward-only scan over the entries of a zip archive.
pub struct ArchiveScan<R: Read> {
    reader: R,
    state: ScanState,
}

impl ArchiveScan<BufReader<File>> {
    /// Open a scan over an archive on disk.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> ArchiveScan<R> {
    /// Create a scan over any byte source positioned at the start of an
    /// archive.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: ScanState::NotStarted,
        }
    }

    /// Current scan state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Advance to the entry named `target` and hand its byte stream to
    /// `read`.
    ///
    /// Entries ahead of the target are fully drained before the scan
    /// moves on; the local headers are read sequentially and an
    /// undrained entry would stall the stream. Once the target is found
    /// no further entry is read.
    pub fn extract<T, F>(&mut self, target: &str, mut read: F) -> Result<T, ExtractError>
    where
        F: FnMut(&mut dyn Read) -> io::Result<T>,
    {
        if self.state != ScanState::NotStarted {
            return Err(ExtractError::ScanComplete);
        }
        self.state = ScanState::Scanning;

        loop {
            match read_zipfile_from_stream(&mut self.reader)? {
                None => {
                    self.state = ScanState::Exhausted;
                    return Err(ExtractError::EntryNotFound {
                        entry: target.to_string(),
                    });
                }
                Some(mut entry) => {
                    if entry.name() == target {
                        self.state = ScanState::Found;
                        return Ok(read(&mut entry)?);
                    }
                    io::copy(&mut entry, &mut io::sink())?;
                }
            }
        }
    }
}

/// Read the first line of a byte stream, without consuming the rest.
pub fn first_line(reader: &mut dyn Read) -> io::Result<String> {
    let mut buffered = BufReader::new(reader);
    let mut line = String::new();
    buffered.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
