//! Connecting to a console and talking to the running session.

use crate::actor::{ActorCommand, SessionActor};
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::status::ConnectionStatus;
use crossbeam_channel::Receiver;
use mixlink_core::{DeviceInfo, Direction, RawValue, SceneState, Session, StoreEvent, UiValue};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::info;

/// An open TCP connection to a console, not yet driving a session.
pub struct ConsoleConnection {
    stream: TcpStream,
    config: ConnectionConfig,
}

impl ConsoleConnection {
    /// Open the connection, giving up after `connect_timeout_ms`.
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let address = config.address();
        info!("Connecting to console at {address}");

        let stream = tokio::time::timeout(config.connect_timeout(), TcpStream::connect(&address))
            .await
            .map_err(|_| Error::ConnectTimeout {
                host: address.clone(),
                timeout_ms: config.connect_timeout_ms,
            })??;
        stream.set_nodelay(true)?;

        Ok(Self { stream, config })
    }

    /// Spawn the session task on the current tokio runtime.
    pub fn spawn(self, session: Session) -> (ConsoleHandle, SessionTask) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);

        let actor = SessionActor {
            session,
            stream: self.stream,
            commands: command_rx,
            status: status_tx,
            pacing: self.config.pacing(),
            read_buffer: self.config.read_buffer,
            peer: self.config.address(),
        };
        let join = tokio::spawn(actor.run());

        let handle = ConsoleHandle {
            commands: command_tx,
            status: status_rx,
        };
        (handle, SessionTask { join: Some(join) })
    }
}

/// Connect and start a session in one step.
pub async fn connect(
    config: ConnectionConfig,
    session: Session,
) -> Result<(ConsoleHandle, SessionTask)> {
    let connection = ConsoleConnection::connect(config).await?;
    Ok(connection.spawn(session))
}

/// Owner of the running session task.
///
/// Aborts the task on drop.
pub struct SessionTask {
    join: Option<JoinHandle<Result<()>>>,
}

impl SessionTask {
    /// Wait for the session to end.
    pub async fn join(mut self) -> Result<()> {
        match self.join.take() {
            Some(join) => join.await.map_err(|e| Error::TaskFailed(e.to_string()))?,
            None => Ok(()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(|j| j.is_finished())
    }
}

impl Drop for SessionTask {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

/// Cloneable handle to a running console session.
///
/// Every call is forwarded to the session task; calls fail with
/// [`Error::ChannelClosed`] once the session has ended.
#[derive(Clone)]
pub struct ConsoleHandle {
    commands: mpsc::UnboundedSender<ActorCommand>,
    status: watch::Receiver<ConnectionStatus>,
}

impl ConsoleHandle {
    /// Queue a get or set, see [`Session::request`].
    pub async fn request(
        &self,
        direction: Direction,
        id: &str,
        x: u32,
        y: u32,
        value: &str,
        relative: bool,
    ) -> Result<()> {
        let id = id.to_string();
        let value = value.to_string();
        self.call(|reply| ActorCommand::Request {
            direction,
            id,
            x,
            y,
            value,
            relative,
            reply,
        })
        .await??;
        Ok(())
    }

    pub async fn set(&self, id: &str, x: u32, y: u32, value: &str) -> Result<()> {
        self.request(Direction::Set, id, x, y, value, false).await
    }

    /// Relative set: `delta` is added to the current value.
    pub async fn nudge(&self, id: &str, x: u32, y: u32, delta: &str) -> Result<()> {
        self.request(Direction::Set, id, x, y, delta, true).await
    }

    pub async fn get(&self, id: &str, x: u32, y: u32) -> Result<()> {
        self.request(Direction::Get, id, x, y, "", false).await
    }

    pub async fn subscribe_value(&self, id: &str, x: u32, y: u32) -> Result<()> {
        let id = id.to_string();
        self.call(|reply| ActorCommand::SubscribeValue { id, x, y, reply })
            .await??;
        Ok(())
    }

    pub async fn value(&self, id: &str, x: u32, y: u32) -> Result<Option<RawValue>> {
        let id = id.to_string();
        self.call(|reply| ActorCommand::Value { id, x, y, reply })
            .await
    }

    pub async fn ui_value(&self, id: &str, x: u32, y: u32) -> Result<Option<UiValue>> {
        let id = id.to_string();
        self.call(|reply| ActorCommand::UiValue { id, x, y, reply })
            .await
    }

    pub async fn device_info(&self) -> Result<DeviceInfo> {
        self.call(ActorCommand::DeviceInfo).await
    }

    pub async fn scene(&self) -> Result<SceneState> {
        self.call(ActorCommand::Scene).await
    }

    /// New receiver of data store changes.
    pub async fn store_events(&self) -> Result<Receiver<StoreEvent>> {
        self.call(ActorCommand::StoreEvents).await
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    /// Watch channel following status changes.
    pub fn status_watch(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.status.borrow().is_connected()
    }

    /// Ask the session to end. Queued requests are dropped.
    pub fn shutdown(&self) {
        let _ = self.commands.send(ActorCommand::Shutdown);
    }

    async fn call<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> ActorCommand) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .map_err(|_| Error::ChannelClosed)?;
        rx.await.map_err(|_| Error::ChannelClosed)
    }
}
