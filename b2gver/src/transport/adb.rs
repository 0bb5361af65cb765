//! Adb transport implementation spawning the adb binary per command.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;
use tokio::time::timeout;

use super::DeviceTransport;
use super::config::AdbConfig;
use crate::error::TransportError;

/// Device transport backed by the `adb` command-line tool.
///
/// Every operation is a single subprocess invocation; there is no
/// connection state to manage. The adb server multiplexes access to the
/// device underneath.
pub struct AdbTransport {
    config: AdbConfig,
}

impl AdbTransport {
    /// Create a transport with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AdbConfig::default())
    }

    /// Create a transport with an explicit configuration.
    pub fn with_config(config: AdbConfig) -> Self {
        Self { config }
    }

    /// Get the configuration used by this transport.
    pub fn config(&self) -> &AdbConfig {
        &self.config
    }

    /// Base adb invocation with serial selection applied.
    fn command(&self) -> Command {
        let mut command = Command::new(&self.config.adb_path);
        if let Some(serial) = &self.config.serial {
            command.arg("-s").arg(serial);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Run an adb invocation to completion and capture stdout.
    async fn run(&self, mut command: Command) -> Result<String, TransportError> {
        debug!("running {command:?}");

        let output = timeout(self.config.timeout, command.output())
            .await
            .map_err(|_| TransportError::Timeout(self.config.timeout))?
            .map_err(|source| TransportError::Spawn {
                program: self.config.adb_path.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(TransportError::CommandFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for AdbTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceTransport for AdbTransport {
    async fn pull(&self, remote: &str, local_dir: &Path) -> Result<(), TransportError> {
        let mut command = self.command();
        command.arg("pull").arg(remote).arg(local_dir);
        self.run(command).await.map(drop)
    }

    async fn shell(&self, shell_command: &str) -> Result<String, TransportError> {
        let mut command = self.command();
        command.arg("shell").arg(shell_command);
        self.run(command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_selection() {
        let transport =
            AdbTransport::with_config(AdbConfig::default().with_serial("1a2b3c4d"));
        let command = transport.command();
        let args: Vec<_> = command.as_std().get_args().collect();
        assert_eq!(args[0], "-s");
        assert_eq!(args[1], "1a2b3c4d");
    }

    #[test]
    fn test_no_serial_by_default() {
        let transport = AdbTransport::new();
        let command = transport.command();
        assert_eq!(command.as_std().get_args().count(), 0);
    }
}
