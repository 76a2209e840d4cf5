// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command construction.
//!
//! The backend has no delta commands: every command carries the unit's full
//! control vector. [`build_command_payload`] takes the device's current
//! state, overrides the one field being changed and wraps the result with
//! the routing metadata.

use std::fmt;

use crate::device::Device;
use crate::error::ValueError;
use crate::protocol::wire::{CommandPayload, ControlVector};
use crate::session::SessionCredentials;
use crate::types::{FanSpeed, OperatingMode, PowerState, Temperature};

const ACTION: &str = "actionControl";
const ACTION_SOURCE: &str = "WEB";
const APPLIANCE_TYPE: &str = "AC";
const APPLICATION_VERSION: &str = "1.0.0";
const CONNECTION_SOURCE: u8 = 0;
const DEVICE_TYPE_VERSION: &str = "BI01";

// Not tracked by this library; the backend wants them on every command.
const LIGHT: &str = "off";
const SWING: &str = "auto";
const TURBO: &str = "off";

/// One requested change to a unit's control vector.
///
/// # Examples
///
/// ```
/// use smartcielo::protocol::ControlChange;
/// use smartcielo::types::Temperature;
///
/// let change = ControlChange::parse("temp", "68").unwrap();
/// assert_eq!(change, ControlChange::Temperature(Temperature::new(68)));
/// assert_eq!(change.attribute(), "temp");
/// assert_eq!(change.value(), "68");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlChange {
    /// Change the power state.
    Power(PowerState),
    /// Change the operating mode.
    Mode(OperatingMode),
    /// Change the fan speed.
    FanSpeed(FanSpeed),
    /// Change the setpoint.
    Temperature(Temperature),
}

impl ControlChange {
    /// Parses the string form used by the backend's `actionType`/`actionValue`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnknownAttribute`] for an attribute other than
    /// `power`, `mode`, `fanspeed` or `temp`, or the matching value error
    /// when `value` does not parse.
    pub fn parse(attribute: &str, value: &str) -> Result<Self, ValueError> {
        match attribute {
            "power" => Ok(Self::Power(value.parse()?)),
            "mode" => Ok(Self::Mode(value.parse()?)),
            "fanspeed" => Ok(Self::FanSpeed(value.parse()?)),
            "temp" => Ok(Self::Temperature(value.parse()?)),
            other => Err(ValueError::UnknownAttribute(other.to_string())),
        }
    }

    /// Attribute name as the backend spells it.
    #[must_use]
    pub const fn attribute(&self) -> &'static str {
        match self {
            Self::Power(_) => "power",
            Self::Mode(_) => "mode",
            Self::FanSpeed(_) => "fanspeed",
            Self::Temperature(_) => "temp",
        }
    }

    /// New value in wire form.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::Power(power) => power.to_string(),
            Self::Mode(mode) => mode.to_string(),
            Self::FanSpeed(speed) => speed.to_string(),
            Self::Temperature(temp) => temp.to_string(),
        }
    }
}

impl fmt::Display for ControlChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.attribute(), self.value())
    }
}

/// Routing metadata for one command.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    /// Credentials of the current session.
    pub credentials: &'a SessionCredentials,
    /// Per-connection command number.
    pub sequence: u64,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

/// Builds the outbound command for `change` against `device`'s current state.
///
/// `actions.oldPower` always carries the power state before the change.
#[must_use]
pub fn build_command_payload(
    device: &Device,
    change: &ControlChange,
    context: &CommandContext<'_>,
) -> CommandPayload {
    let current = device.state();
    let next = match change {
        ControlChange::Power(power) => current.clone().with_power(power.clone()),
        ControlChange::Mode(mode) => current.clone().with_mode(mode.clone()),
        ControlChange::FanSpeed(speed) => current.clone().with_fan_speed(speed.clone()),
        ControlChange::Temperature(temp) => current.clone().with_temperature(temp.clone()),
    };

    CommandPayload {
        action: ACTION,
        action_source: ACTION_SOURCE,
        action_type: change.attribute(),
        action_value: change.value(),
        actions: ControlVector {
            fanspeed: next.fan_speed().clone(),
            light: LIGHT,
            mode: next.mode().clone(),
            old_power: current.power().clone(),
            power: next.power().clone(),
            swing: SWING,
            temp: next.temperature().clone(),
            turbo: TURBO,
        },
        appliance_id: device.appliance_id().clone(),
        appliance_type: APPLIANCE_TYPE,
        application_version: APPLICATION_VERSION,
        connection_source: CONNECTION_SOURCE,
        device_type_version: DEVICE_TYPE_VERSION,
        fw_version: device.fw_version().to_string(),
        mac_address: device.mac_address().to_string(),
        mid: context.credentials.session_id().to_string(),
        token: context.credentials.access_token().to_string(),
        ts: context.timestamp,
        sequence: context.sequence,
    }
}
