//! Adb transport configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the adb-backed transport.
#[derive(Debug, Clone)]
pub struct AdbConfig {
    /// Path to the adb binary (default: resolved from `PATH`).
    pub adb_path: PathBuf,

    /// Device serial, for hosts with more than one device attached.
    pub serial: Option<String>,

    /// Timeout applied to each adb invocation.
    pub timeout: Duration,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            adb_path: PathBuf::from("adb"),
            serial: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AdbConfig {
    /// Target a specific device serial.
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Set the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
