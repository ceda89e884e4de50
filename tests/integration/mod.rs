//! Integration test modules for mixlink
//!
//! - bridge: Builder validation and catalog loading
//! - session: Offline protocol exchanges per console model
//! - connection: Live session task against a scripted console

pub mod bridge;
#[cfg(feature = "net")]
pub mod connection;
pub mod session;
