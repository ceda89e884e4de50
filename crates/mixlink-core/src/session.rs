//! Per-console protocol session.
//!
//! A [`Session`] owns all mutable state of one console connection. It does
//! no I/O: the transport feeds it bytes with [`Session::on_transport_data`]
//! and asks it for the next line to write with [`Session::on_tick`].

use crate::catalog::{Catalog, CommandDescriptor, ValueKind};
use crate::codec::{
    parse_line, DeviceField, Direction, FormatContext, LineFramer, MeterSamples, Message, Query,
    SceneKind, Verb,
};
use crate::config::SessionConfig;
use crate::device::{DeviceInfo, SceneState};
use crate::queue::{CommandQueue, CommandValue, ParamCommand, QueueLimits, TickContext};
use crate::resolver::{from_wire, needs_current, to_wire, ResolveOptions};
use crate::store::{DataStore, StoreEvent};
use crate::value::{RawValue, UiValue};
use crate::{Error, Result};
use crossbeam_channel::Receiver;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

pub struct Session {
    catalog: Arc<Catalog>,
    config: SessionConfig,
    format: FormatContext,
    store: DataStore,
    queue: CommandQueue,
    framer: LineFramer,
    device: DeviceInfo,
    scene: SceneState,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        if config.console_model()? != catalog.model() {
            warn!(
                "Session configured for {} but catalog is for {}",
                config.model,
                catalog.model()
            );
        }
        let format = FormatContext::new(catalog.model(), config.meter_interval_ms);
        let queue = CommandQueue::new(QueueLimits {
            get_timeout_ticks: config.get_timeout_ticks,
            max_resolve_attempts: config.max_resolve_attempts,
        });
        Ok(Self {
            catalog,
            config,
            format,
            store: DataStore::new(),
            queue,
            framer: LineFramer::new(),
            device: DeviceInfo::default(),
            scene: SceneState::default(),
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    /// Subscribe to data store changes.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        self.store.subscribe()
    }

    /// Queue a get or set for an address or action id.
    ///
    /// `value` is surface input (`-3.5`, `-Inf`, `Toggle`, text) and is
    /// ignored for gets. With `relative`, a number is a delta from the
    /// cached value.
    pub fn request(
        &mut self,
        direction: Direction,
        id: &str,
        x: u32,
        y: u32,
        value: &str,
        relative: bool,
    ) -> Result<()> {
        let descriptor = self.checked_descriptor(direction, id, x, y)?;
        let address = descriptor.address.clone();

        let command = match direction {
            Direction::Get => ParamCommand::get(address, x, y),
            Direction::Set => {
                let ui = parse_input(descriptor, value);
                let options = ResolveOptions { relative };
                let value = if needs_current(&ui, options) {
                    CommandValue::Ui { value: ui, options }
                } else {
                    CommandValue::Raw(to_wire(descriptor, &ui, options, &self.store, x, y)?)
                };
                ParamCommand::set(address, x, y, value)
            }
        };

        debug!(address = %command.address, x, y, "Queued {direction}");
        self.queue.enqueue(command);
        Ok(())
    }

    pub fn get(&mut self, id: &str, x: u32, y: u32) -> Result<()> {
        self.request(Direction::Get, id, x, y, "", false)
    }

    pub fn set(&mut self, id: &str, x: u32, y: u32, value: &str) -> Result<()> {
        self.request(Direction::Set, id, x, y, value, false)
    }

    /// Make sure a value is, or will be, cached. Queues a get only when nothing is cached.
    pub fn subscribe_value(&mut self, id: &str, x: u32, y: u32) -> Result<()> {
        let descriptor = self.checked_descriptor(Direction::Get, id, x, y)?;
        if self.store.get(&descriptor.address, x, y).is_none() {
            let get = ParamCommand::get(descriptor.address.clone(), x, y);
            self.queue.enqueue(get);
        }
        Ok(())
    }

    /// Cached raw value for an address or action id.
    pub fn value(&self, id: &str, x: u32, y: u32) -> Option<&RawValue> {
        let descriptor = self.catalog.lookup(id)?;
        self.store.get(&descriptor.address, x, y)
    }

    /// Cached value in surface units.
    pub fn ui_value(&self, id: &str, x: u32, y: u32) -> Option<UiValue> {
        let descriptor = self.catalog.lookup(id)?;
        let raw = self.store.get(&descriptor.address, x, y)?;
        Some(from_wire(descriptor, raw))
    }

    /// Queue the initial device poll and current-scene read.
    pub fn on_connected(&mut self) {
        info!("Console session started ({})", self.catalog.model());
        self.poll_device();
        if let Some(recall) = self.catalog.scene_recall().filter(|d| d.is_readable()) {
            let get = ParamCommand::get(recall.address.clone(), 0, 0);
            self.queue.enqueue(get);
        }
    }

    /// Feed bytes read from the transport. Returns the number of messages handled.
    pub fn on_transport_data(&mut self, chunk: &[u8]) -> usize {
        let lines = self.framer.push(chunk);
        for line in &lines {
            trace!("<- {line}");
            self.on_message(parse_line(line));
        }
        lines.len()
    }

    /// Next line to write, without its terminator.
    pub fn on_tick(&mut self) -> Option<String> {
        let mut cx = TickContext {
            catalog: self.catalog.as_ref(),
            store: &mut self.store,
            format: &self.format,
        };
        let line = self.queue.on_tick(&mut cx);
        if let Some(line) = &line {
            trace!("-> {line}");
        }
        line
    }

    /// Drop everything tied to the connection.
    pub fn on_disconnected(&mut self) {
        info!("Console session ended, {} queued requests dropped", self.queue.len());
        self.queue.clear();
        self.framer.clear();
        self.store.clear();
        self.device = DeviceInfo::default();
        self.scene = SceneState::default();
    }

    pub fn on_message(&mut self, message: Message) {
        match message {
            Message::Param {
                address, x, y, value, ..
            } => {
                self.queue.correlate(&address, x, y);
                if let Some(descriptor) = self.catalog.get(&address) {
                    let value = descriptor.coerce(value);
                    self.store.put(&address, x, y, value);
                } else {
                    debug!(address = %address, "Value for address outside the catalog");
                }
            }
            Message::Scene {
                kind,
                target,
                number,
                scene_status,
                ..
            } => self.handle_scene(kind, &target, number, scene_status),
            Message::SceneInfo {
                number,
                name,
                comment,
                ..
            } => {
                if self.scene.number.as_deref() == Some(number.as_str()) {
                    info!("Scene {number}: {name}");
                    self.scene.name = Some(name);
                    self.scene.comment = Some(comment);
                }
            }
            Message::DeviceInfo { field, value } => self.handle_device_info(&field, &value),
            Message::Meter { address, samples } => self.handle_meter(&address, &samples),
            Message::Ack { verb, address } => trace!("{verb} acknowledged for {address}"),
            Message::Error { verb, reason } => {
                warn!("Console rejected {verb}: {reason}");
                if matches!(
                    Verb::from_token(&verb),
                    Some(Verb::Get | Verb::SsCurrent | Verb::SsCurrentT)
                ) {
                    self.queue.drop_oldest_in_flight();
                }
            }
            Message::Unknown { line, reason } => debug!("Unknown command '{line}': {reason}"),
        }
    }

    fn checked_descriptor(
        &self,
        direction: Direction,
        id: &str,
        x: u32,
        y: u32,
    ) -> Result<&CommandDescriptor> {
        let descriptor = self
            .catalog
            .lookup(id)
            .ok_or_else(|| Error::UnrecognizedCommand(id.to_string()))?;
        if !descriptor.contains(x, y) {
            return Err(Error::InvalidCoordinate {
                address: descriptor.address.clone(),
                x,
                y,
            });
        }
        let allowed = match direction {
            Direction::Get => descriptor.is_readable(),
            Direction::Set => descriptor.is_writable(),
        };
        if !allowed {
            return Err(Error::AccessDenied {
                address: descriptor.address.clone(),
                direction,
            });
        }
        Ok(descriptor)
    }

    fn poll_device(&mut self) {
        for field in DeviceField::POLL {
            self.queue.enqueue(Query::DeviceInfo(field));
        }
    }

    fn handle_scene(
        &mut self,
        kind: SceneKind,
        target: &str,
        number: String,
        scene_status: Option<String>,
    ) {
        if kind == SceneKind::Store {
            info!("Scene {number} stored");
            return;
        }

        let bank = u32::from(target == "scene_b");
        let changed = kind == SceneKind::Recall
            || self
                .scene
                .number
                .as_ref()
                .is_some_and(|n| *n != number || self.scene.bank != bank);

        if changed {
            info!("Scene {number} recalled, refreshing console state");
            self.store.clear();
            self.scene.name = None;
            self.scene.comment = None;
        }
        self.scene.number = Some(number.clone());
        self.scene.bank = bank;
        self.scene.status = scene_status;

        if let Some(recall) = self.catalog.scene_recall() {
            let address = recall.address.clone();
            let banks = recall.y_count.max(1);
            // a current-scene read is answered for whichever bank is active
            for b in 0..banks {
                self.queue.correlate(&address, 0, b);
            }
            self.store
                .put(&address, 0, bank.min(banks - 1), RawValue::from_token(&number));
        }

        if changed {
            self.poll_device();
        }
        if changed || self.scene.name.is_none() {
            self.queue.enqueue(Query::SceneInfo { bank, number });
        }
    }

    fn handle_device_info(&mut self, field: &str, value: &str) {
        match self.device.apply(field, value) {
            Some(DeviceField::ProductName) => match self.device.detected_model {
                Some(model) if model != self.catalog.model() => warn!(
                    "Console reports {value} ({model}) but the catalog is for {}",
                    self.catalog.model()
                ),
                Some(_) => info!("Connected to {value}"),
                None => warn!("Unrecognized console product: {value}"),
            },
            Some(field) => debug!("devinfo {field} = {value}"),
            None => debug!("Ignoring devinfo {field}"),
        }
    }

    fn handle_meter(&mut self, address: &str, samples: &MeterSamples) {
        let Some(descriptor) = self.catalog.get(address) else {
            debug!(address = %address, "Meter data for address outside the catalog");
            return;
        };
        let pickoffs = descriptor.y_count.max(1);
        for (i, sample) in samples.iter().enumerate() {
            let i = i as u32;
            self.store
                .put(address, i / pickoffs, i % pickoffs, RawValue::Int(i64::from(*sample)));
        }
    }
}

/// Interpret surface input for a descriptor.
fn parse_input(descriptor: &CommandDescriptor, input: &str) -> UiValue {
    let input = input.trim();
    match descriptor.kind {
        ValueKind::String => UiValue::Text(input.to_string()),
        _ if input.is_empty() => from_wire(descriptor, &descriptor.default),
        ValueKind::Scene if input.parse::<i64>().is_err() => UiValue::Text(input.to_string()),
        _ => UiValue::parse(input),
    }
}
