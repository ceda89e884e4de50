//! TCP transport for mixlink console sessions.
//!
//! One tokio task owns each [`Session`](mixlink_core::Session): it reads
//! from the socket, writes one paced line per tick, and serves requests
//! from any number of [`ConsoleHandle`] clones.
//!
//! ```ignore
//! use mixlink_core::{Catalog, Session, SessionConfig};
//! use mixlink_net::{connect, ConnectionConfig};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load("CL/QL")?);
//! let session = Session::new(catalog, SessionConfig::default())?;
//! let (console, task) = connect(ConnectionConfig::new("192.168.0.128"), session).await?;
//!
//! console.set("MIXER:Current/InCh/Fader/On", 0, 0, "Toggle").await?;
//! ```

mod actor;
pub mod config;
mod connection;
pub mod error;
mod status;

pub use config::{ConnectionConfig, DEFAULT_PORT};
pub use connection::{connect, ConsoleConnection, ConsoleHandle, SessionTask};
pub use error::{Error, Result};
pub use status::ConnectionStatus;
