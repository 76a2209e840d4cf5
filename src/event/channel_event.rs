// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events published on the [`EventBus`](super::EventBus).

use crate::device::DeviceState;
use crate::error::ChannelError;

/// One push notification from the real-time channel.
///
/// # Examples
///
/// ```
/// use smartcielo::event::ChannelEvent;
///
/// let event = ChannelEvent::RoomTemperature {
///     mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
///     room_temperature: 71.0,
/// };
/// assert_eq!(event.mac_address(), Some("AA:BB:CC:DD:EE:FF"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// A device's control group changed.
    StateChanged {
        /// Device MAC address.
        mac_address: String,
        /// The new control group.
        state: DeviceState,
    },

    /// A device's room temperature changed.
    RoomTemperature {
        /// Device MAC address.
        mac_address: String,
        /// The new room temperature.
        room_temperature: f64,
    },

    /// The channel closed or its transport failed.
    Error(ChannelError),
}

impl ChannelEvent {
    /// Returns the device this event concerns, if any.
    #[must_use]
    pub fn mac_address(&self) -> Option<&str> {
        match self {
            Self::StateChanged { mac_address, .. } | Self::RoomTemperature { mac_address, .. } => {
                Some(mac_address)
            }
            Self::Error(_) => None,
        }
    }

    /// Returns `true` for error events.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
