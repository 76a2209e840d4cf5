// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for HVAC control.
//!
//! Each type mirrors one field of the backend's control vector and knows
//! its own wire representation.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off
//! - [`OperatingMode`] - Auto/Heat/Cool/Dry/Fan
//! - [`FanSpeed`] - Auto/Low/Medium/High
//! - [`Temperature`] - Setpoint in backend-defined units

mod fan_speed;
mod mode;
mod power;
mod temperature;

pub use fan_speed::FanSpeed;
pub use mode::OperatingMode;
pub use power::PowerState;
pub use temperature::Temperature;
