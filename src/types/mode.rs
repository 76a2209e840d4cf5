// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating mode of an HVAC unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Operating mode reported and accepted by the backend.
///
/// Modes the backend reports beyond the five known ones are kept in
/// [`OperatingMode::Other`].
///
/// # Examples
///
/// ```
/// use smartcielo::types::OperatingMode;
///
/// let mode: OperatingMode = "cool".parse().unwrap();
/// assert_eq!(mode, OperatingMode::Cool);
/// assert_eq!(mode.to_string(), "cool");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperatingMode {
    /// Unit picks heating or cooling on its own.
    Auto,
    /// Heating.
    Heat,
    /// Cooling.
    Cool,
    /// Dehumidifying.
    Dry,
    /// Fan only.
    Fan,
    /// A value the backend reported that this library does not know.
    Other(String),
}

impl OperatingMode {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Auto => "auto",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::Dry => "dry",
            Self::Fan => "fan",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "heat" => Ok(Self::Heat),
            "cool" => Ok(Self::Cool),
            "dry" => Ok(Self::Dry),
            "fan" => Ok(Self::Fan),
            _ => Err(ValueError::InvalidMode(s.to_string())),
        }
    }
}

impl From<String> for OperatingMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "auto" => Self::Auto,
            "heat" => Self::Heat,
            "cool" => Self::Cool,
            "dry" => Self::Dry,
            "fan" => Self::Fan,
            _ => Self::Other(value),
        }
    }
}

impl From<OperatingMode> for String {
    fn from(value: OperatingMode) -> Self {
        match value {
            OperatingMode::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}
