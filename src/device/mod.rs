// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device records and the registry that holds them.
//!
//! Records are read-only to callers. The
//! [`ConnectionManager`](crate::ConnectionManager) rebuilds the registry on
//! each discovery and the real-time channel applies inbound updates to it.

mod record;
mod registry;
mod state;

pub use record::{ApplianceId, Device};
pub use registry::DeviceRegistry;
pub use state::DeviceState;
