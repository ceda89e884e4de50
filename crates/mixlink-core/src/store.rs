//! Change-detecting cache of console state.

use crate::value::RawValue;
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashMap;

/// Notification raised by [`DataStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Changed {
        address: String,
        x: u32,
        y: u32,
        value: RawValue,
    },
    Cleared,
}

/// Last-known values keyed by `(address, x, y)`.
///
/// Only writes that change a value notify subscribers.
#[derive(Debug, Default)]
pub struct DataStore {
    values: HashMap<String, HashMap<(u32, u32), RawValue>>,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &str, x: u32, y: u32) -> Option<&RawValue> {
        self.values.get(address)?.get(&(x, y))
    }

    /// Store a value. Returns `false`, without notifying, if it was already current.
    pub fn put(&mut self, address: &str, x: u32, y: u32, value: RawValue) -> bool {
        let slot = self.values.entry(address.to_string()).or_default();
        if slot.get(&(x, y)) == Some(&value) {
            return false;
        }
        slot.insert((x, y), value.clone());
        self.notify(StoreEvent::Changed {
            address: address.to_string(),
            x,
            y,
            value,
        });
        true
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.notify(StoreEvent::Cleared);
    }

    /// Receive every change from now on.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Number of cached `(address, x, y)` entries.
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(HashMap::is_empty)
    }

    /// Cached coordinates and values of one address, in no particular order.
    pub fn iter_address<'a>(
        &'a self,
        address: &str,
    ) -> impl Iterator<Item = (u32, u32, &'a RawValue)> + 'a {
        self.values
            .get(address)
            .into_iter()
            .flat_map(|slot| slot.iter().map(|(&(x, y), v)| (x, y, v)))
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
