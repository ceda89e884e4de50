//! Outbound command queue.
//!
//! Requests are deduplicated on entry and drained one per tick. Gets stay
//! queued in [`CommandState::Sent`] until a response with the same
//! `(address, x, y)` arrives, or until they time out twice. Sets whose value
//! depends on an uncached current value are rotated to the back while a
//! get fetches it.

use crate::catalog::{Catalog, CommandClass};
use crate::codec::{format_command, format_query, Direction, FormatContext, Query};
use crate::resolver::{to_wire, ResolveOptions};
use crate::store::DataStore;
use crate::value::{RawValue, UiValue};
use crate::Error;
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Value carried by a queued set.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandValue {
    /// Already resolved.
    Raw(RawValue),
    /// Resolved at transmit time against the store.
    Ui {
        value: UiValue,
        options: ResolveOptions,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamCommand {
    pub direction: Direction,
    pub address: String,
    pub x: u32,
    pub y: u32,
    /// `None` for gets.
    pub value: Option<CommandValue>,
}

impl ParamCommand {
    pub fn get(address: impl Into<String>, x: u32, y: u32) -> Self {
        Self {
            direction: Direction::Get,
            address: address.into(),
            x,
            y,
            value: None,
        }
    }

    pub fn set(address: impl Into<String>, x: u32, y: u32, value: CommandValue) -> Self {
        Self {
            direction: Direction::Set,
            address: address.into(),
            x,
            y,
            value: Some(value),
        }
    }

    fn is_get_for(&self, address: &str, x: u32, y: u32) -> bool {
        self.direction == Direction::Get && self.address == address && self.x == x && self.y == y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueuedCommand {
    Param(ParamCommand),
    Query(Query),
}

impl QueuedCommand {
    fn same_key(&self, other: &QueuedCommand) -> bool {
        match (self, other) {
            (QueuedCommand::Param(a), QueuedCommand::Param(b)) => {
                a.direction == b.direction && a.address == b.address && a.x == b.x && a.y == b.y
            }
            (QueuedCommand::Query(a), QueuedCommand::Query(b)) => a == b,
            _ => false,
        }
    }

    fn is_get_for(&self, address: &str, x: u32, y: u32) -> bool {
        matches!(self, QueuedCommand::Param(p) if p.is_get_for(address, x, y))
    }

    fn is_get(&self) -> bool {
        matches!(self, QueuedCommand::Param(p) if p.direction == Direction::Get)
    }
}

impl From<ParamCommand> for QueuedCommand {
    fn from(cmd: ParamCommand) -> Self {
        QueuedCommand::Param(cmd)
    }
}

impl From<Query> for QueuedCommand {
    fn from(query: Query) -> Self {
        QueuedCommand::Query(query)
    }
}

/// Lifecycle of a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    /// Needs the current value before it can be resolved.
    Pending,
    /// Resolution failed at least once; a get is fetching the value.
    AwaitingCurrentValue,
    Ready,
    /// Transmitted get waiting for its response.
    Sent,
}

#[derive(Debug, Clone)]
pub struct QueueEntry {
    command: QueuedCommand,
    state: CommandState,
    attempts: u32,
    age_ticks: u32,
    resent: bool,
}

impl QueueEntry {
    fn new(command: QueuedCommand) -> Self {
        let state = match &command {
            QueuedCommand::Param(ParamCommand {
                value: Some(CommandValue::Ui { .. }),
                ..
            }) => CommandState::Pending,
            _ => CommandState::Ready,
        };
        Self {
            command,
            state,
            attempts: 0,
            age_ticks: 0,
            resent: false,
        }
    }

    fn sent(command: QueuedCommand) -> Self {
        Self {
            state: CommandState::Sent,
            ..Self::new(command)
        }
    }

    pub fn command(&self) -> &QueuedCommand {
        &self.command
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    /// Resolution attempts spent so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Timeout and retry limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueLimits {
    pub get_timeout_ticks: u32,
    pub max_resolve_attempts: u32,
}

impl Default for QueueLimits {
    fn default() -> Self {
        Self {
            get_timeout_ticks: 50,
            max_resolve_attempts: 8,
        }
    }
}

/// Everything a tick needs besides the queue itself.
pub struct TickContext<'a> {
    pub catalog: &'a Catalog,
    pub store: &'a mut DataStore,
    pub format: &'a FormatContext,
}

enum Step {
    Emit(String),
    Next,
    Removed,
}

#[derive(Debug, Default)]
pub struct CommandQueue {
    entries: VecDeque<QueueEntry>,
    limits: QueueLimits,
}

impl CommandQueue {
    pub fn new(limits: QueueLimits) -> Self {
        Self {
            entries: VecDeque::new(),
            limits,
        }
    }

    /// Add a command, replacing a queued one with the same key.
    ///
    /// A get already in flight is left alone; its response will answer
    /// the new request too.
    pub fn enqueue(&mut self, command: impl Into<QueuedCommand>) {
        let command = command.into();
        match self.entries.iter_mut().find(|e| e.command.same_key(&command)) {
            Some(existing) if existing.state == CommandState::Sent => {
                trace!("Request already in flight: {:?}", command);
            }
            Some(existing) => *existing = QueueEntry::new(command),
            None => self.entries.push_back(QueueEntry::new(command)),
        }
    }

    /// Produce at most one line to transmit.
    pub fn on_tick(&mut self, cx: &mut TickContext<'_>) -> Option<String> {
        self.expire_in_flight();

        let mut remaining = self.entries.len();
        let mut i = 0;
        while remaining > 0 && i < self.entries.len() {
            remaining -= 1;
            if self.entries[i].state == CommandState::Sent {
                i += 1;
                continue;
            }
            match self.dispatch(i, cx) {
                Step::Emit(line) => return Some(line),
                Step::Next => i += 1,
                Step::Removed => {}
            }
        }
        None
    }

    /// Drop the queued get answered by a response for `(address, x, y)`.
    pub fn correlate(&mut self, address: &str, x: u32, y: u32) -> bool {
        match self
            .entries
            .iter()
            .position(|e| e.command.is_get_for(address, x, y))
        {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop the oldest get still waiting for a response.
    pub fn drop_oldest_in_flight(&mut self) -> Option<QueuedCommand> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.state == CommandState::Sent && e.command.is_get())?;
        self.entries.remove(pos).map(|e| e.command)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn limits(&self) -> QueueLimits {
        self.limits
    }

    fn expire_in_flight(&mut self) {
        let timeout = self.limits.get_timeout_ticks;
        self.entries.retain_mut(|entry| {
            if entry.state != CommandState::Sent {
                return true;
            }
            entry.age_ticks += 1;
            if entry.age_ticks < timeout {
                return true;
            }
            if entry.resent {
                warn!("Dropping unanswered request: {:?}", entry.command);
                false
            } else {
                debug!("Request timed out, sending again: {:?}", entry.command);
                entry.resent = true;
                entry.age_ticks = 0;
                entry.state = CommandState::Ready;
                true
            }
        });
    }

    fn dispatch(&mut self, i: usize, cx: &mut TickContext<'_>) -> Step {
        let cmd = match &self.entries[i].command {
            QueuedCommand::Query(query) => {
                let line = format_query(cx.format, query);
                self.entries.remove(i);
                return Step::Emit(line);
            }
            QueuedCommand::Param(cmd) => cmd.clone(),
        };

        let Some(descriptor) = cx.catalog.get(&cmd.address) else {
            warn!(address = %cmd.address, "Dropping request for unknown address");
            self.entries.remove(i);
            return Step::Removed;
        };
        let class = descriptor.class();

        if cmd.direction == Direction::Get {
            let line = format_command(cx.format, descriptor, Direction::Get, cmd.x, cmd.y, None);
            match class {
                // answered by an ack or a stream, never by a value
                CommandClass::SceneStep | CommandClass::Meter => {
                    self.entries.remove(i);
                }
                CommandClass::Parameter | CommandClass::Scene => {
                    let entry = &mut self.entries[i];
                    entry.state = CommandState::Sent;
                    entry.age_ticks = 0;
                }
            }
            return Step::Emit(line);
        }

        let resolved = match &cmd.value {
            Some(CommandValue::Raw(value)) => Ok(value.clone()),
            Some(CommandValue::Ui { value, options }) => {
                to_wire(descriptor, value, *options, &*cx.store, cmd.x, cmd.y)
            }
            None => Err(Error::InvalidValue {
                address: cmd.address.clone(),
                reason: "set without a value".to_string(),
            }),
        };

        match resolved {
            Ok(value) => {
                let line = format_command(
                    cx.format,
                    descriptor,
                    Direction::Set,
                    cmd.x,
                    cmd.y,
                    Some(&value),
                );
                if matches!(class, CommandClass::Parameter | CommandClass::Scene) {
                    cx.store.put(&cmd.address, cmd.x, cmd.y, value);
                }
                self.entries.remove(i);
                Step::Emit(line)
            }
            Err(Error::ValueUnavailable { .. }) if descriptor.is_readable() => {
                let mut entry = match self.entries.remove(i) {
                    Some(entry) => entry,
                    None => return Step::Removed,
                };
                entry.state = CommandState::AwaitingCurrentValue;
                let get_queued = self
                    .entries
                    .iter()
                    .any(|e| e.command.is_get_for(&cmd.address, cmd.x, cmd.y));
                if get_queued {
                    // the in-flight get has its own timeout
                    self.entries.push_back(entry);
                    return Step::Removed;
                }

                entry.attempts += 1;
                if entry.attempts > self.limits.max_resolve_attempts {
                    warn!(
                        address = %cmd.address,
                        x = cmd.x,
                        y = cmd.y,
                        "Dropping set: no current value after {} attempts",
                        self.limits.max_resolve_attempts
                    );
                    return Step::Removed;
                }
                self.entries.push_back(entry);
                let get = ParamCommand::get(cmd.address.clone(), cmd.x, cmd.y);
                let line = format_command(cx.format, descriptor, Direction::Get, cmd.x, cmd.y, None);
                self.entries.push_back(QueueEntry::sent(get.into()));
                Step::Emit(line)
            }
            Err(e) => {
                warn!("Dropping set: {e}");
                self.entries.remove(i);
                Step::Removed
            }
        }
    }
}
