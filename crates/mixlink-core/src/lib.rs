//! Protocol engine for Yamaha-style remote control of digital mixing consoles.
//!
//! Consoles speak a line-based text protocol on TCP port 49280. This crate
//! implements everything above the socket and performs no I/O itself:
//!
//! - [`Catalog`]: per-model table of addressable controls
//! - [`codec`]: line framing, parsing and formatting
//! - [`resolver`]: surface values to raw wire values and back
//! - [`DataStore`]: change-detecting cache of console state
//! - [`CommandQueue`]: deduplicating, paced outbound queue
//! - [`Session`]: ties the above together for one console
//!
//! # Example
//!
//! ```
//! use mixlink_core::{Catalog, Session, SessionConfig};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load("CL/QL")?);
//! let mut session = Session::new(catalog, SessionConfig::default())?;
//!
//! session.set("MIXER:Current/InCh/Fader/Level", 0, 0, "-Inf")?;
//! assert_eq!(
//!     session.on_tick().as_deref(),
//!     Some("set MIXER:Current/InCh/Fader/Level 0 0 -32768")
//! );
//! # Ok::<(), mixlink_core::Error>(())
//! ```

pub mod catalog;
pub mod codec;
pub mod config;
pub mod device;
pub mod error;
pub mod model;
pub mod queue;
pub mod resolver;
pub mod session;
pub mod store;
pub mod value;

pub use catalog::{Access, Catalog, CommandClass, CommandDescriptor, ValueKind};
pub use codec::{Direction, Message};
pub use config::SessionConfig;
pub use device::{DeviceInfo, SceneState};
pub use error::{Error, Result};
pub use model::{ConsoleModel, SceneStyle};
pub use queue::{CommandQueue, CommandState, CommandValue, ParamCommand, QueuedCommand};
pub use resolver::ResolveOptions;
pub use session::Session;
pub use store::{DataStore, StoreEvent};
pub use value::{RawValue, UiValue};
