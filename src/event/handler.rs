// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer interface of the real-time channel.

use crate::device::DeviceState;
use crate::error::ChannelError;

/// Receives the real-time channel's push notifications.
///
/// Methods run on the channel's reader task, in the order the transport
/// delivered the messages, after the registry has been updated. Keep them
/// short; a slow handler delays every later message.
///
/// All methods default to doing nothing.
///
/// # Examples
///
/// ```
/// use smartcielo::ChannelError;
/// use smartcielo::device::DeviceState;
/// use smartcielo::event::EventHandler;
///
/// struct Printer;
///
/// impl EventHandler for Printer {
///     fn on_command(&self, mac_address: &str, state: &DeviceState) {
///         println!("{mac_address}: power {}", state.power());
///     }
///
///     fn on_error(&self, error: &ChannelError) {
///         eprintln!("channel lost: {error}");
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync + 'static {
    /// A state-change notification was applied to the device `mac_address`.
    fn on_command(&self, mac_address: &str, state: &DeviceState) {
        let _ = (mac_address, state);
    }

    /// A heartbeat updated the room temperature of `mac_address`.
    fn on_temperature(&self, mac_address: &str, room_temperature: f64) {
        let _ = (mac_address, room_temperature);
    }

    /// The channel closed or its transport failed.
    fn on_error(&self, error: &ChannelError) {
        let _ = error;
    }
}
