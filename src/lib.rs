//! # mixlink - Yamaha Console Remote Control
//!
//! Talks the line-based remote control protocol spoken by Yamaha digital
//! mixing consoles on TCP port 49280.
//!
//! ## Architecture
//!
//! mixlink is an umbrella crate that coordinates:
//! - **mixlink-core** - Parameter catalog, codec, value resolver, data store, command queue, session
//! - **mixlink-net** - tokio TCP transport, session actor, `mixlink-monitor` binary
//!
//! ## Quick Start
//!
//! ```ignore
//! use mixlink::prelude::*;
//!
//! let bridge = MixlinkBridge::builder()
//!     .host("192.168.0.128")
//!     .model("CL/QL")
//!     .build()?;
//!
//! let (console, task) = bridge.connect().await?;
//!
//! // Mute input 1 and pull its fader all the way down
//! console.set("MIXER:Current/InCh/Fader/On", 0, 0, "0").await?;
//! console.set("MIXER:Current/InCh/Fader/Level", 0, 0, "-Inf").await?;
//!
//! // Follow the console
//! let events = console.store_events().await?;
//! ```
//!
//! Without a transport, a [`Session`] can be driven by hand:
//!
//! ```
//! use mixlink::prelude::*;
//!
//! let bridge = MixlinkBridge::builder().model("TF").build().unwrap();
//! let mut session = bridge.session().unwrap();
//! session.set("MIXER:Current/InCh/Fader/Level", 0, 0, "-Inf").unwrap();
//! assert_eq!(
//!     session.on_tick().as_deref(),
//!     Some("set MIXER:Current/InCh/Fader/Level 0 0 -32768")
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Core plus transport
//! - `net` - tokio transport and session actor

/// Re-export of mixlink-core for direct access
pub use mixlink_core as core;

// Core types
pub use mixlink_core::{
    Access,
    // Catalog
    Catalog,
    CommandClass,
    CommandDescriptor,
    // Queue
    CommandQueue,
    CommandState,
    CommandValue,
    ConsoleModel,
    // Store
    DataStore,
    DeviceInfo,
    Direction,
    Message,
    ParamCommand,
    QueuedCommand,
    RawValue,
    ResolveOptions,
    SceneState,
    SceneStyle,
    // Session
    Session,
    SessionConfig,
    StoreEvent,
    UiValue,
    ValueKind,
};

// Transport
#[cfg(feature = "net")]
pub use mixlink_net as net;

#[cfg(feature = "net")]
pub use mixlink_net::{
    ConnectionConfig, ConnectionStatus, ConsoleConnection, ConsoleHandle, SessionTask,
    DEFAULT_PORT,
};

mod bridge;
mod builder;
mod error;

pub use bridge::MixlinkBridge;
pub use builder::MixlinkBridgeBuilder;
pub use error::{Error, Result};

/// Convenience prelude for common imports
pub mod prelude {
    // Main bridge
    pub use crate::{MixlinkBridge, MixlinkBridgeBuilder};

    // Essential types
    pub use crate::core::{
        Catalog, ConsoleModel, RawValue, Session, SessionConfig, StoreEvent, UiValue,
    };

    // Transport
    #[cfg(feature = "net")]
    pub use crate::net::{ConnectionConfig, ConnectionStatus, ConsoleHandle, SessionTask};

    pub use crate::{Error, Result};
}
