//! Session actor: the single task that owns a console session.

use crate::error::{Error, Result};
use crate::status::ConnectionStatus;
use crossbeam_channel::Receiver;
use mixlink_core::{DeviceInfo, Direction, RawValue, SceneState, Session, StoreEvent, UiValue};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

type Reply<T> = oneshot::Sender<T>;

/// Requests from [`ConsoleHandle`](crate::ConsoleHandle) to the actor.
pub(crate) enum ActorCommand {
    Request {
        direction: Direction,
        id: String,
        x: u32,
        y: u32,
        value: String,
        relative: bool,
        reply: Reply<mixlink_core::Result<()>>,
    },
    SubscribeValue {
        id: String,
        x: u32,
        y: u32,
        reply: Reply<mixlink_core::Result<()>>,
    },
    Value {
        id: String,
        x: u32,
        y: u32,
        reply: Reply<Option<RawValue>>,
    },
    UiValue {
        id: String,
        x: u32,
        y: u32,
        reply: Reply<Option<UiValue>>,
    },
    DeviceInfo(Reply<DeviceInfo>),
    Scene(Reply<SceneState>),
    StoreEvents(Reply<Receiver<StoreEvent>>),
    Shutdown,
}

pub(crate) struct SessionActor {
    pub(crate) session: Session,
    pub(crate) stream: TcpStream,
    pub(crate) commands: mpsc::UnboundedReceiver<ActorCommand>,
    pub(crate) status: watch::Sender<ConnectionStatus>,
    pub(crate) pacing: Duration,
    pub(crate) read_buffer: usize,
    pub(crate) peer: String,
}

impl SessionActor {
    /// Drive the session until the socket closes or a shutdown is requested.
    pub(crate) async fn run(self) -> Result<()> {
        let SessionActor {
            mut session,
            stream,
            mut commands,
            status,
            pacing,
            read_buffer,
            peer,
        } = self;

        let (mut reader, mut writer) = stream.into_split();
        let mut buf = vec![0u8; read_buffer];
        let mut ticker = tokio::time::interval(pacing);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        session.on_connected();
        let _ = status.send(ConnectionStatus::Connected);
        info!("Connected to console at {peer}");

        let result = loop {
            tokio::select! {
                read = reader.read(&mut buf) => match read {
                    Ok(0) => break Err(Error::ConnectionClosed),
                    Ok(n) => {
                        let handled = session.on_transport_data(&buf[..n]);
                        trace!("Read {n} bytes, {handled} messages");
                    }
                    Err(e) => break Err(e.into()),
                },
                _ = ticker.tick() => {
                    if let Some(line) = session.on_tick() {
                        let mut bytes = line.into_bytes();
                        bytes.push(b'\n');
                        if let Err(e) = writer.write_all(&bytes).await {
                            break Err(e.into());
                        }
                    }
                }
                command = commands.recv() => match command {
                    Some(ActorCommand::Shutdown) | None => break Ok(()),
                    Some(command) => handle_command(&mut session, command),
                },
            }
        };

        session.on_disconnected();
        let reason = match &result {
            Ok(()) => {
                info!("Console session with {peer} shut down");
                let _ = writer.shutdown().await;
                "shutdown".to_string()
            }
            Err(e) => {
                warn!("Console connection to {peer} lost: {e}");
                e.to_string()
            }
        };
        let _ = status.send(ConnectionStatus::Disconnected(reason));
        result
    }
}

fn handle_command(session: &mut Session, command: ActorCommand) {
    match command {
        ActorCommand::Request {
            direction,
            id,
            x,
            y,
            value,
            relative,
            reply,
        } => {
            let result = session.request(direction, &id, x, y, &value, relative);
            if let Err(e) = &result {
                debug!("Rejected {direction} {id} [{x}, {y}]: {e}");
            }
            let _ = reply.send(result);
        }
        ActorCommand::SubscribeValue { id, x, y, reply } => {
            let _ = reply.send(session.subscribe_value(&id, x, y));
        }
        ActorCommand::Value { id, x, y, reply } => {
            let _ = reply.send(session.value(&id, x, y).cloned());
        }
        ActorCommand::UiValue { id, x, y, reply } => {
            let _ = reply.send(session.ui_value(&id, x, y));
        }
        ActorCommand::DeviceInfo(reply) => {
            let _ = reply.send(session.device_info().clone());
        }
        ActorCommand::Scene(reply) => {
            let _ = reply.send(session.scene().clone());
        }
        ActorCommand::StoreEvents(reply) => {
            let _ = reply.send(session.subscribe());
        }
        // handled by the run loop
        ActorCommand::Shutdown => {}
    }
}
