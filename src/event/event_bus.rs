// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting channel events.

use tokio::sync::broadcast;

use crate::device::DeviceState;
use crate::error::ChannelError;

use super::{ChannelEvent, EventHandler};

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// [`EventHandler`] that republishes every notification on a tokio
/// broadcast channel.
///
/// This is the default handler of a
/// [`ConnectionManager`](crate::ConnectionManager). Each subscriber gets its
/// own copy of each event.
///
/// # Capacity
///
/// The bus has a fixed capacity (default 256). A subscriber that falls
/// behind loses the oldest events and receives `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use smartcielo::event::{ChannelEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ChannelEvent::RoomTemperature {
///     mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
///     room_temperature: 70.0,
/// });
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChannelEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// Without subscribers the event is discarded.
    pub fn publish(&self, event: ChannelEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for EventBus {
    fn on_command(&self, mac_address: &str, state: &DeviceState) {
        self.publish(ChannelEvent::StateChanged {
            mac_address: mac_address.to_string(),
            state: state.clone(),
        });
    }

    fn on_temperature(&self, mac_address: &str, room_temperature: f64) {
        self.publish(ChannelEvent::RoomTemperature {
            mac_address: mac_address.to_string(),
            room_temperature,
        });
    }

    fn on_error(&self, error: &ChannelError) {
        self.publish(ChannelEvent::Error(error.clone()));
    }
}
