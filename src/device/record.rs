// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One HVAC unit as last reported by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocol::wire::DeviceListing;

use super::DeviceState;

/// Backend-assigned appliance identifier.
///
/// Opaque: it is echoed back verbatim in every command, keeping whatever
/// JSON type the device list used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplianceId(serde_json::Value);

impl ApplianceId {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self(value.into())
    }

    /// Returns the raw JSON value.
    #[must_use]
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

impl fmt::Display for ApplianceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// In-memory record of one physical unit.
///
/// The MAC address never changes after construction. The control group
/// ([`DeviceState`]) and the room temperature are updated separately, and
/// only by the real-time channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    mac_address: String,
    name: String,
    appliance_id: ApplianceId,
    fw_version: String,
    state: DeviceState,
    room_temperature: f64,
}

impl Device {
    /// Creates a device record.
    #[must_use]
    pub fn new(
        mac_address: impl Into<String>,
        name: impl Into<String>,
        appliance_id: ApplianceId,
        fw_version: impl Into<String>,
        state: DeviceState,
        room_temperature: f64,
    ) -> Self {
        Self {
            mac_address: mac_address.into(),
            name: name.into(),
            appliance_id,
            fw_version: fw_version.into(),
            state,
            room_temperature,
        }
    }

    /// Hardware address, the stable identifier.
    #[must_use]
    pub fn mac_address(&self) -> &str {
        &self.mac_address
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backend appliance identifier.
    #[must_use]
    pub fn appliance_id(&self) -> &ApplianceId {
        &self.appliance_id
    }

    /// Firmware version string.
    #[must_use]
    pub fn fw_version(&self) -> &str {
        &self.fw_version
    }

    /// Current control group.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Last observed ambient temperature.
    #[must_use]
    pub fn room_temperature(&self) -> f64 {
        self.room_temperature
    }

    /// Replaces the whole control group.
    pub(crate) fn update_state(&mut self, state: DeviceState) {
        self.state = state;
    }

    /// Replaces the room temperature.
    pub(crate) fn update_room_temperature(&mut self, value: f64) {
        self.room_temperature = value;
    }

    /// Builds a record from a device list entry, seeded with its last
    /// known control group and room temperature.
    pub(crate) fn from_listing(listing: DeviceListing) -> Self {
        Self {
            mac_address: listing.mac_address,
            name: listing.device_name,
            appliance_id: listing.appliance_id,
            fw_version: listing.fw_version,
            state: listing.latest_action,
            room_temperature: listing.lat_env.temp,
        }
    }
}
