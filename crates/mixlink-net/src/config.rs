//! Connection configuration.

use crate::Result;
use mixlink_core::Error as CoreError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// TCP port consoles listen on for remote control.
pub const DEFAULT_PORT: u16 = 49280;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    /// Minimum delay between outbound lines.
    pub pacing_ms: u64,
    pub connect_timeout_ms: u64,
    /// Socket read chunk size.
    pub read_buffer: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "192.168.0.128".to_string(),
            port: DEFAULT_PORT,
            pacing_ms: 40,
            connect_timeout_ms: 5000,
            read_buffer: 4096,
        }
    }
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(CoreError::InvalidConfig("host must not be empty".to_string()).into());
        }
        if self.port == 0 {
            return Err(CoreError::InvalidConfig("port must not be 0".to_string()).into());
        }
        if !(1..=1000).contains(&self.pacing_ms) {
            return Err(CoreError::InvalidConfig(format!(
                "pacing_ms {} out of range (1-1000)",
                self.pacing_ms
            ))
            .into());
        }
        if self.connect_timeout_ms == 0 {
            return Err(
                CoreError::InvalidConfig("connect_timeout_ms must not be 0".to_string()).into(),
            );
        }
        if self.read_buffer < 256 {
            return Err(CoreError::InvalidConfig(format!(
                "read_buffer {} too small (minimum 256)",
                self.read_buffer
            ))
            .into());
        }
        Ok(())
    }
}
