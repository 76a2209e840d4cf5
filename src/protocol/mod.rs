// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Backend protocol: HTTP endpoints, message schemas and command encoding.
//!
//! - [`CloudHttpClient`]: login, device list and token refresh over HTTPS
//! - [`wire`]: JSON records for every request, response and channel message
//! - [`build_command_payload`]: derives a full command from a device's state

mod codec;
mod http;
pub mod wire;

pub use codec::{CommandContext, ControlChange, build_command_payload};
pub use http::CloudHttpClient;
pub use wire::{CommandPayload, ControlVector, Notification, decode_notification};
