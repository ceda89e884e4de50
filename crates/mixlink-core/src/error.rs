//! Error types for mixlink-core.

use crate::codec::Direction;
use thiserror::Error;

/// Error type for mixlink-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No parameter catalog available for console model: {0}")]
    CatalogUnavailable(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Unrecognized command: {0}")]
    UnrecognizedCommand(String),

    #[error("Malformed line: {0}")]
    MalformedLine(String),

    #[error("Unrecognized verb: {0}")]
    UnrecognizedVerb(String),

    #[error("No cached value for {address} [{x}, {y}]")]
    ValueUnavailable { address: String, x: u32, y: u32 },

    #[error("Invalid value for {address}: {reason}")]
    InvalidValue { address: String, reason: String },

    #[error("Coordinate [{x}, {y}] out of range for {address}")]
    InvalidCoordinate { address: String, x: u32, y: u32 },

    #[error("{direction} not permitted on {address}")]
    AccessDenied {
        address: String,
        direction: Direction,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mixlink-core operations.
pub type Result<T> = std::result::Result<T, Error>;
