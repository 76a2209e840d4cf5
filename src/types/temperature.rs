// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setpoint temperature.
//!
//! Units are whatever the unit is configured for on the backend (Fahrenheit
//! or Celsius); this library neither converts nor bounds-checks them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValueError;

/// Setpoint temperature in backend-defined units.
///
/// Holds the wire text exactly as the backend reported it, so `"70.0"` or
/// `"22.5"` go back out unchanged on the next command. Serialized as a
/// string, which is what the command channel expects. Deserializes from
/// either a string or a JSON number, since the device list and the
/// notifications disagree on the encoding.
///
/// # Examples
///
/// ```
/// use smartcielo::types::Temperature;
///
/// let t: Temperature = "68".parse().unwrap();
/// assert_eq!(t, Temperature::new(68));
/// assert_eq!(t.as_f64(), Some(68.0));
///
/// let half: Temperature = "22.5".parse().unwrap();
/// assert_eq!(half.to_string(), "22.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Temperature(String);

impl Temperature {
    /// Creates a whole-degree temperature.
    #[must_use]
    pub fn new(value: i32) -> Self {
        Self(value.to_string())
    }

    /// Returns the wire text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value, if the wire text is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strict parse for caller input: the text must be a finite number.
impl FromStr for Temperature {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self(trimmed.to_string())),
            _ => Err(ValueError::InvalidTemperature(s.to_string())),
        }
    }
}

impl From<i32> for Temperature {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl Serialize for Temperature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Backend data is taken as-is, numeric or not.
impl<'de> Deserialize<'de> for Temperature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = crate::protocol::wire::NumberOrString::deserialize(deserializer)?;
        Ok(Self(raw.to_string()))
    }
}
