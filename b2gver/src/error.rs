//! Error types for b2gver.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for b2gver operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Device transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// File retrieval errors
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Archive extraction errors
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Manifest/descriptor scanning errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

/// Transport layer errors (adb invocation, remote command execution).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to spawn the transport binary
    #[error("Failed to invoke '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Remote command reported failure
    #[error("Device command exited with status {status:?}: {stderr}")]
    CommandFailed {
        status: Option<i32>,
        stderr: String,
    },

    /// Remote command did not finish in time
    #[error("Device command timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Retrieval errors (copying a remote file into local staging).
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Could not allocate a local staging directory
    #[error("Failed to stage a temporary directory: {0}")]
    Staging(#[source] io::Error),

    /// The device copy command failed
    #[error("Device copy of '{remote}' failed: {source}")]
    CopyFailed {
        remote: String,
        #[source]
        source: TransportError,
    },

    /// The copy command reported success but the file never arrived.
    /// Some devices report a successful copy for paths that do not exist.
    #[error("'{remote}' reported copied but is missing locally")]
    MissingAfterCopy { remote: String },

    /// Every candidate location failed
    #[error("All {attempts} candidate locations failed, last error: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: Box<RetrievalError>,
    },

    /// The candidate list was empty
    #[error("No candidate locations to try")]
    NoCandidates,
}

/// Archive extraction errors (sequential zip entry scanning).
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The archive was fully scanned and the entry never appeared
    #[error("Archive entry '{entry}' not found")]
    EntryNotFound { entry: String },

    /// The scan was already driven to completion
    #[error("Archive scan can only be driven once")]
    ScanComplete,

    /// Malformed or unsupported archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error while reading the archive
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Scanning errors (XML manifest and INI descriptor extraction).
#[derive(Error, Debug)]
pub enum ScanError {
    /// The document was fully scanned and the target never matched
    #[error("'{needle}' not found in {}", path.display())]
    NotFound { path: PathBuf, needle: String },

    /// Malformed XML document
    #[error("Manifest error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute
    #[error("Manifest attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// I/O error while reading the document
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using b2gver's Error.
pub type Result<T> = std::result::Result<T, Error>;
