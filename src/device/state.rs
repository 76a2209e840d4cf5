// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The control field group of a device.

use serde::{Deserialize, Serialize};

use crate::types::{FanSpeed, OperatingMode, PowerState, Temperature};

/// Power, setpoint, mode and fan speed of one unit.
///
/// These four fields always travel together: the backend reports them as
/// one `action` object and expects all of them on every command. A
/// [`Device`](super::Device) replaces the whole group at once, never a
/// single field.
///
/// Values are stored as the backend reported them. Nothing is validated
/// on the way in.
///
/// # Examples
///
/// ```
/// use smartcielo::device::DeviceState;
/// use smartcielo::types::{FanSpeed, OperatingMode, PowerState, Temperature};
///
/// let state = DeviceState::new(
///     PowerState::On,
///     Temperature::new(72),
///     OperatingMode::Cool,
///     FanSpeed::Auto,
/// );
/// assert!(state.power().is_on());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceState {
    power: PowerState,
    #[serde(rename = "temp")]
    temperature: Temperature,
    mode: OperatingMode,
    #[serde(rename = "fanspeed")]
    fan_speed: FanSpeed,
}

impl DeviceState {
    /// Creates a field group.
    #[must_use]
    pub fn new(
        power: PowerState,
        temperature: Temperature,
        mode: OperatingMode,
        fan_speed: FanSpeed,
    ) -> Self {
        Self {
            power,
            temperature,
            mode,
            fan_speed,
        }
    }

    /// Power state.
    #[must_use]
    pub fn power(&self) -> &PowerState {
        &self.power
    }

    /// Setpoint temperature.
    #[must_use]
    pub fn temperature(&self) -> &Temperature {
        &self.temperature
    }

    /// Operating mode.
    #[must_use]
    pub fn mode(&self) -> &OperatingMode {
        &self.mode
    }

    /// Fan speed.
    #[must_use]
    pub fn fan_speed(&self) -> &FanSpeed {
        &self.fan_speed
    }

    /// Returns a copy with the power state replaced.
    #[must_use]
    pub fn with_power(mut self, power: PowerState) -> Self {
        self.power = power;
        self
    }

    /// Returns a copy with the setpoint replaced.
    #[must_use]
    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = temperature;
        self
    }

    /// Returns a copy with the mode replaced.
    #[must_use]
    pub fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns a copy with the fan speed replaced.
    #[must_use]
    pub fn with_fan_speed(mut self, fan_speed: FanSpeed) -> Self {
        self.fan_speed = fan_speed;
        self
    }
}
