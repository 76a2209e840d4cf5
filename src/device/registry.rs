// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered collection of the session's devices.

use super::{Device, DeviceState};

/// The session's device records, in backend order.
///
/// Rebuilt wholesale on every discovery. Updates that name a MAC address
/// not present here are ignored.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every record.
    pub(crate) fn replace(&mut self, devices: Vec<Device>) {
        self.devices = devices;
    }

    /// Removes every record.
    pub(crate) fn clear(&mut self) {
        self.devices.clear();
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterates the records in order.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    /// Looks up a record by MAC address.
    #[must_use]
    pub fn get(&self, mac_address: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.mac_address() == mac_address)
    }

    /// Overwrites the control group of the matching record.
    ///
    /// Returns `false` when no record matches.
    pub(crate) fn apply_state(&mut self, mac_address: &str, state: DeviceState) -> bool {
        match self.get_mut(mac_address) {
            Some(device) => {
                device.update_state(state);
                true
            }
            None => false,
        }
    }

    /// Overwrites the room temperature of the matching record.
    ///
    /// Returns `false` when no record matches.
    pub(crate) fn apply_room_temperature(&mut self, mac_address: &str, value: f64) -> bool {
        match self.get_mut(mac_address) {
            Some(device) => {
                device.update_room_temperature(value);
                true
            }
            None => false,
        }
    }

    /// Clones the records out.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Device> {
        self.devices.clone()
    }

    fn get_mut(&mut self, mac_address: &str) -> Option<&mut Device> {
        self.devices
            .iter_mut()
            .find(|d| d.mac_address() == mac_address)
    }
}
