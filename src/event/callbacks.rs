// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closure-based [`EventHandler`].
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`Callbacks`] - Registry of closures, dispatched by notification kind

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::device::DeviceState;
use crate::error::ChannelError;

use super::EventHandler;

/// Unique identifier for a subscription.
///
/// Returned when registering a callback; pass it to
/// [`Callbacks::unsubscribe`] to remove the callback again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type CommandCallback = Arc<dyn Fn(&str, &DeviceState) + Send + Sync>;
type TemperatureCallback = Arc<dyn Fn(&str, f64) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&ChannelError) + Send + Sync>;

/// Registry of notification closures.
///
/// Callbacks can be added and removed at any time, including while the
/// channel is running. They run in registration order. Each dispatch
/// snapshots the registered callbacks first, so a callback may itself
/// subscribe or unsubscribe.
///
/// # Examples
///
/// ```
/// use smartcielo::event::Callbacks;
///
/// let callbacks = Callbacks::new();
/// let id = callbacks.on_temperature(|mac, temp| println!("{mac}: {temp}"));
/// callbacks.on_error(|err| eprintln!("channel lost: {err}"));
///
/// assert_eq!(callbacks.callback_count(), 2);
/// assert!(callbacks.unsubscribe(id));
/// ```
pub struct Callbacks {
    next_id: AtomicU64,
    command_callbacks: RwLock<BTreeMap<SubscriptionId, CommandCallback>>,
    temperature_callbacks: RwLock<BTreeMap<SubscriptionId, TemperatureCallback>>,
    error_callbacks: RwLock<BTreeMap<SubscriptionId, ErrorCallback>>,
}

impl Callbacks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            command_callbacks: RwLock::new(BTreeMap::new()),
            temperature_callbacks: RwLock::new(BTreeMap::new()),
            error_callbacks: RwLock::new(BTreeMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for state-change notifications.
    pub fn on_command<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, &DeviceState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.command_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for room temperature updates.
    pub fn on_temperature<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, f64) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.temperature_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for channel closure and transport errors.
    pub fn on_error<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChannelError) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.error_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Removes a callback.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.command_callbacks.write().remove(&id).is_some()
            || self.temperature_callbacks.write().remove(&id).is_some()
            || self.error_callbacks.write().remove(&id).is_some()
    }

    /// Removes every callback.
    pub fn clear(&self) {
        self.command_callbacks.write().clear();
        self.temperature_callbacks.write().clear();
        self.error_callbacks.write().clear();
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.command_callbacks.read().len()
            + self.temperature_callbacks.read().len()
            + self.error_callbacks.read().len()
    }

    /// Returns `true` if no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl EventHandler for Callbacks {
    fn on_command(&self, mac_address: &str, state: &DeviceState) {
        let callbacks: Vec<_> = self.command_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(mac_address, state);
        }
    }

    fn on_temperature(&self, mac_address: &str, room_temperature: f64) {
        let callbacks: Vec<_> = self
            .temperature_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(mac_address, room_temperature);
        }
    }

    fn on_error(&self, error: &ChannelError) {
        let callbacks: Vec<_> = self.error_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(error);
        }
    }
}

impl Default for Callbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
