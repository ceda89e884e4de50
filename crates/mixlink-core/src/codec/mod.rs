//! Line protocol codec.
//!
//! - [`tokenize`]: whitespace split with double-quoted tokens
//! - [`LineFramer`]: transport chunks to complete lines
//! - [`parse_line`]: one line to a [`Message`] (never fails)
//! - [`format_command`] / [`format_query`]: outbound lines

mod format;
mod framer;
mod message;
mod tokenize;

pub use format::{format_command, format_query, DeviceField, FormatContext, Query};
pub use framer::{LineFramer, MAX_FRAGMENT_LEN};
pub use message::{parse_line, Direction, MeterSamples, Message, SceneKind, Status, Verb};
pub use tokenize::tokenize;
