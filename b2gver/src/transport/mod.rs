//! Device transport layer wrapping adb.
//!
//! This module defines the command-based transport boundary the resolver
//! depends on, plus the default implementation that shells out to the
//! `adb` binary.

pub mod config;
mod adb;

#[cfg(test)]
pub(crate) mod stub;

pub use adb::AdbTransport;
pub use config::AdbConfig;

use std::path::Path;

use async_trait::async_trait;

use crate::error::TransportError;

/// Trait for command-based device transports.
///
/// The revision resolver only ever calls [`pull`](DeviceTransport::pull);
/// the shell operations are part of the same device boundary and are used
/// by surrounding tooling.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Copy the named remote file into `local_dir`, keeping its filename.
    ///
    /// A successful return means the transport *reported* success; callers
    /// that need certainty must confirm the file arrived.
    async fn pull(&self, remote: &str, local_dir: &Path) -> Result<(), TransportError>;

    /// Run a remote shell command and capture its standard output.
    async fn shell(&self, command: &str) -> Result<String, TransportError>;

    /// Run a remote shell command with named variables set for exactly
    /// this invocation.
    async fn shell_with_env(
        &self,
        command: &str,
        env: &[(String, String)],
    ) -> Result<String, TransportError> {
        if env.is_empty() {
            return self.shell(command).await;
        }
        let assignments: Vec<String> = env
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        self.shell(&format!("{} {}", assignments.join(" "), command))
            .await
    }
}
