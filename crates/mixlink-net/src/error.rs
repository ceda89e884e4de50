//! Error types for the console connection

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] mixlink_core::Error),

    #[error("Connection to {host} timed out after {timeout_ms}ms")]
    ConnectTimeout { host: String, timeout_ms: u64 },

    #[error("Connection closed by console")]
    ConnectionClosed,

    #[error("Console session is no longer running")]
    ChannelClosed,

    #[error("Console session task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ConnectTimeout {
            host: "192.168.0.128:49280".to_string(),
            timeout_ms: 5000,
        };
        assert!(err.to_string().contains("5000ms"));
        assert!(err.to_string().contains("192.168.0.128"));

        assert_eq!(
            Error::ConnectionClosed.to_string(),
            "Connection closed by console"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: Error = mixlink_core::Error::UnrecognizedCommand("MIXER:Nope".into()).into();
        assert_eq!(err.to_string(), "Unrecognized command: MIXER:Nope");
    }
}
