//! MixlinkBridge that ties a catalog to sessions and connections

use crate::core::{Catalog, ConsoleModel, Session, SessionConfig};
use crate::Result;
use std::sync::Arc;

#[cfg(feature = "net")]
use crate::net::{ConnectionConfig, ConsoleConnection, ConsoleHandle, SessionTask};
#[cfg(feature = "net")]
use tracing::info;

/// Validated configuration plus the loaded parameter catalog.
///
/// The catalog is shared: every session built from one bridge points at the
/// same `Arc<Catalog>`.
///
/// # Example
///
/// ```ignore
/// use mixlink::prelude::*;
///
/// let bridge = MixlinkBridge::builder().model("PM").build()?;
///
/// // Offline: drive the protocol by hand
/// let mut session = bridge.session()?;
/// session.set("MIXER:Current/InCh/Fader/On", 0, 0, "0")?;
///
/// // Online: one task per console
/// let (console, task) = bridge.connect().await?;
/// ```
#[derive(Debug, Clone)]
pub struct MixlinkBridge {
    catalog: Arc<Catalog>,
    session_config: SessionConfig,

    #[cfg(feature = "net")]
    connection_config: ConnectionConfig,
}

impl MixlinkBridge {
    /// Create a new bridge builder
    pub fn builder() -> crate::MixlinkBridgeBuilder {
        crate::MixlinkBridgeBuilder::default()
    }

    pub(crate) fn from_parts(
        catalog: Arc<Catalog>,
        session_config: SessionConfig,
        #[cfg(feature = "net")] connection_config: ConnectionConfig,
    ) -> Self {
        Self {
            catalog,
            session_config,
            #[cfg(feature = "net")]
            connection_config,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn model(&self) -> ConsoleModel {
        self.catalog.model()
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    #[cfg(feature = "net")]
    pub fn connection_config(&self) -> &ConnectionConfig {
        &self.connection_config
    }

    /// A fresh session with no transport attached.
    pub fn session(&self) -> Result<Session> {
        Ok(Session::new(
            Arc::clone(&self.catalog),
            self.session_config.clone(),
        )?)
    }

    /// Connect to the console and start its session task.
    #[cfg(feature = "net")]
    pub async fn connect(&self) -> Result<(ConsoleHandle, SessionTask)> {
        let session = self.session()?;
        let connection = ConsoleConnection::connect(self.connection_config.clone()).await?;
        info!(
            peer = %self.connection_config.address(),
            model = %self.model(),
            "Console connected"
        );
        Ok(connection.spawn(session))
    }
}
