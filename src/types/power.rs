// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of an HVAC unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Represents the power state of an HVAC unit.
///
/// The backend uses lowercase strings (`"on"`, `"off"`) on the wire.
/// Anything else it reports is kept verbatim in [`PowerState::Other`].
///
/// Parsing with [`FromStr`] is strict and meant for caller input;
/// deserializing backend data never fails.
///
/// # Examples
///
/// ```
/// use smartcielo::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "on");
/// assert_eq!("OFF".parse::<PowerState>().unwrap(), PowerState::Off);
///
/// let reported: PowerState = serde_json::from_str("\"standby\"").unwrap();
/// assert_eq!(reported, PowerState::Other("standby".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PowerState {
    /// Unit is off.
    Off,
    /// Unit is on.
    On,
    /// A value the backend reported that this library does not know.
    Other(String),
}

impl PowerState {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Other(raw) => raw,
        }
    }

    /// Returns `true` if the unit is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<String> for PowerState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "off" => Self::Off,
            "on" => Self::On,
            _ => Self::Other(value),
        }
    }
}

impl From<PowerState> for String {
    fn from(value: PowerState) -> Self {
        match value {
            PowerState::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
