//! Builder for configuring and constructing a `MixlinkBridge`.

use crate::core::{Catalog, Error as CoreError, SessionConfig};
use crate::{MixlinkBridge, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "net")]
use crate::net::ConnectionConfig;

/// The console model selects the built-in parameter catalog unless
/// `.catalog_file()` points at a parameter dump captured from a real console.
/// Configuration is validated in `build()`, so a bad model or an unreadable
/// dump fails at startup rather than on the first request.
///
/// # Example
///
/// ```ignore
/// use mixlink::prelude::*;
///
/// let bridge = MixlinkBridge::builder()
///     .host("192.168.0.128")
///     .model("TF")
///     .pacing_ms(40)
///     .build()?;
///
/// let (console, task) = bridge.connect().await?;
/// console.set("MIXER:Current/InCh/Fader/Level", 0, 0, "-Inf").await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MixlinkBridgeBuilder {
    session: SessionConfig,
    catalog_file: Option<PathBuf>,

    #[cfg(feature = "net")]
    connection: ConnectionConfig,
}

impl MixlinkBridgeBuilder {
    /// Default: `CL/QL`
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.session.model = model.into();
        self
    }

    /// Default: 100
    pub fn meter_interval_ms(mut self, interval: u32) -> Self {
        self.session.meter_interval_ms = interval;
        self
    }

    /// Default: 50
    pub fn get_timeout_ticks(mut self, ticks: u32) -> Self {
        self.session.get_timeout_ticks = ticks;
        self
    }

    /// Default: 8
    pub fn max_resolve_attempts(mut self, attempts: u32) -> Self {
        self.session.max_resolve_attempts = attempts;
        self
    }

    /// Load the catalog from a parameter dump instead of the built-in one.
    pub fn catalog_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_file = Some(path.into());
        self
    }

    /// Replaces every session setting made so far.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session = config;
        self
    }

    #[cfg(feature = "net")]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.connection.host = host.into();
        self
    }

    /// Default: 49280
    #[cfg(feature = "net")]
    pub fn port(mut self, port: u16) -> Self {
        self.connection.port = port;
        self
    }

    /// Default: 40
    #[cfg(feature = "net")]
    pub fn pacing_ms(mut self, pacing: u64) -> Self {
        self.connection.pacing_ms = pacing;
        self
    }

    /// Default: 5000
    #[cfg(feature = "net")]
    pub fn connect_timeout_ms(mut self, timeout: u64) -> Self {
        self.connection.connect_timeout_ms = timeout;
        self
    }

    /// Replaces every connection setting made so far.
    #[cfg(feature = "net")]
    pub fn connection_config(mut self, config: ConnectionConfig) -> Self {
        self.connection = config;
        self
    }

    pub fn build(self) -> Result<MixlinkBridge> {
        self.session.validate()?;

        #[cfg(feature = "net")]
        self.connection.validate()?;

        let model = self.session.console_model()?;
        let catalog = match &self.catalog_file {
            Some(path) => Catalog::load_file(model, path).map_err(|e| match e {
                CoreError::Io(err) => {
                    CoreError::CatalogUnavailable(format!("{}: {err}", path.display()))
                }
                other => other,
            })?,
            None => Catalog::for_model(model)?,
        };
        debug!(
            model = %model,
            commands = catalog.len(),
            "Catalog ready"
        );

        Ok(MixlinkBridge::from_parts(
            Arc::new(catalog),
            self.session,
            #[cfg(feature = "net")]
            self.connection,
        ))
    }
}
