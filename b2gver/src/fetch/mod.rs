//! Remote file retrieval into scoped local staging.
//!
//! Retrieval is the only device contact the resolver makes: a candidate
//! file is pulled into a fresh temporary directory and handed to a
//! format scanner. The staging directory lives exactly as long as the
//! [`Fetched`] handle.

mod fallback;

pub use fallback::{Exhausted, first_ok};

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, warn};
use tempfile::TempDir;

use crate::device::Candidate;
use crate::error::RetrievalError;
use crate::transport::DeviceTransport;

/// A remote file staged on the local filesystem.
///
/// Owns the staging directory; dropping the handle removes the directory
/// and the file, on success and failure paths alike.
#[derive(Debug)]
pub struct Fetched {
    staging: TempDir,
    filename: String,
}

impl Fetched {
    /// Local path of the staged file.
    pub fn path(&self) -> PathBuf {
        self.staging.path().join(&self.filename)
    }

    /// Filename the file was retrieved under.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Copies remote files into local staging directories.
pub struct Fetcher {
    transport: Arc<dyn DeviceTransport>,
}

impl Fetcher {
    /// Create a fetcher over the given transport.
    pub fn new(transport: Arc<dyn DeviceTransport>) -> Self {
        Self { transport }
    }

    /// Retrieve `dir/filename` from the device.
    ///
    /// The transport reporting success is not trusted on its own: some
    /// devices report successful copies of nonexistent paths, so the
    /// staged file is confirmed present before the handle is returned.
    pub async fn fetch(&self, dir: &str, filename: &str) -> Result<Fetched, RetrievalError> {
        let staging = tempfile::Builder::new()
            .prefix("b2gver-")
            .tempdir()
            .map_err(RetrievalError::Staging)?;

        let remote = format!("{}/{}", dir.trim_end_matches('/'), filename);
        debug!("pulling {remote} into {}", staging.path().display());

        self.transport
            .pull(&remote, staging.path())
            .await
            .map_err(|source| RetrievalError::CopyFailed {
                remote: remote.clone(),
                source,
            })?;

        let local = staging.path().join(filename);
        if tokio::fs::metadata(&local).await.is_err() {
            return Err(RetrievalError::MissingAfterCopy { remote });
        }

        Ok(Fetched {
            staging,
            filename: filename.to_string(),
        })
    }

    /// Retrieve the first candidate that succeeds, in declared order.
    pub async fn fetch_first(&self, candidates: &[Candidate]) -> Result<Fetched, RetrievalError> {
        first_ok(candidates, |candidate| self.attempt(candidate))
            .await
            .map_err(|Exhausted { attempts, last }| match last {
                Some(last) => RetrievalError::Exhausted {
                    attempts,
                    last: Box::new(last),
                },
                None => RetrievalError::NoCandidates,
            })
    }

    async fn attempt(&self, candidate: &Candidate) -> Result<Fetched, RetrievalError> {
        match self.fetch(&candidate.dir, &candidate.filename).await {
            Ok(fetched) => Ok(fetched),
            Err(err) => {
                warn!("retrieval of {} failed: {err}", candidate.remote_path());
                Err(err)
            }
        }
    }
}
