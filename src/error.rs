//! Centralized error type for the mixlink umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] mixlink_core::Error),

    #[cfg(feature = "net")]
    #[error("Net: {0}")]
    Net(#[from] mixlink_net::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
