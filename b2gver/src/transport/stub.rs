//! Scripted transport used by unit tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::DeviceTransport;
use crate::error::TransportError;

/// Per-path behavior of the stub.
pub(crate) enum Outcome {
    /// The pull succeeds and this body lands in the staging directory.
    Body(Vec<u8>),
    /// The pull fails outright.
    Fail,
    /// The pull reports success but writes nothing, like devices that
    /// claim to have copied a path that does not exist.
    Phantom,
}

/// Transport stub that serves canned files and records every call.
#[derive(Default)]
pub(crate) struct StubTransport {
    outcomes: HashMap<String, Outcome>,
    pulls: Mutex<Vec<String>>,
    shells: Mutex<Vec<String>>,
    refuse: AtomicBool,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(mut self, remote: impl Into<String>, body: &[u8]) -> Self {
        self.outcomes.insert(remote.into(), Outcome::Body(body.to_vec()));
        self
    }

    pub(crate) fn with_failure(mut self, remote: impl Into<String>) -> Self {
        self.outcomes.insert(remote.into(), Outcome::Fail);
        self
    }

    pub(crate) fn with_phantom(mut self, remote: impl Into<String>) -> Self {
        self.outcomes.insert(remote.into(), Outcome::Phantom);
        self
    }

    /// Remote paths pulled so far, in call order.
    pub(crate) fn pulls(&self) -> Vec<String> {
        self.pulls.lock().unwrap().clone()
    }

    /// Shell commands issued so far, in call order.
    pub(crate) fn shells(&self) -> Vec<String> {
        self.shells.lock().unwrap().clone()
    }

    /// Make every pull from now on fail, canned files included.
    pub(crate) fn refuse_further_pulls(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DeviceTransport for StubTransport {
    async fn pull(&self, remote: &str, local_dir: &Path) -> Result<(), TransportError> {
        self.pulls.lock().unwrap().push(remote.to_string());

        if self.refuse.load(Ordering::SeqCst) {
            return Err(TransportError::CommandFailed {
                status: Some(1),
                stderr: "device unreachable".to_string(),
            });
        }

        match self.outcomes.get(remote) {
            Some(Outcome::Body(body)) => {
                let filename = remote.rsplit('/').next().unwrap_or(remote);
                std::fs::write(local_dir.join(filename), body)?;
                Ok(())
            }
            Some(Outcome::Phantom) => Ok(()),
            Some(Outcome::Fail) | None => Err(TransportError::CommandFailed {
                status: Some(1),
                stderr: format!("remote object '{remote}' does not exist"),
            }),
        }
    }

    async fn shell(&self, command: &str) -> Result<String, TransportError> {
        self.shells.lock().unwrap().push(command.to_string());
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shell_with_env_prefixes_assignments() {
        let stub = StubTransport::new();
        let env = vec![
            ("TZ".to_string(), "UTC".to_string()),
            ("LC_ALL".to_string(), "C".to_string()),
        ];
        stub.shell_with_env("date", &env).await.unwrap();
        assert_eq!(stub.shells(), vec!["TZ=UTC LC_ALL=C date".to_string()]);
    }

    #[tokio::test]
    async fn test_shell_with_empty_env_is_plain_shell() {
        let stub = StubTransport::new();
        stub.shell_with_env("date", &[]).await.unwrap();
        assert_eq!(stub.shells(), vec!["date".to_string()]);
    }
}
