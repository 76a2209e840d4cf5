// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `smartcielo` - A Rust library to control Cielo smart HVAC controllers
//! through the vendor cloud.
//!
//! The units are never reached directly. The library logs in over HTTPS,
//! fetches the account's device list, and then keeps one websocket open
//! to the backend. Commands go out on that websocket and state changes
//! come back on it.
//!
//! # Supported Features
//!
//! - **Session**: login, explicit token refresh
//! - **Discovery**: filter the account's devices by MAC address
//! - **Control**: power, operating mode, fan speed, setpoint
//! - **Notifications**: state changes and room temperature, pushed as they arrive
//!
//! # Quick Start
//!
//! ## Event Stream
//!
//! ```no_run
//! use smartcielo::event::ChannelEvent;
//! use smartcielo::types::OperatingMode;
//! use smartcielo::{AgentConfig, CloudConfig, ConnectionManager};
//!
//! #[tokio::main]
//! async fn main() -> smartcielo::Result<()> {
//!     let mut manager = ConnectionManager::new(CloudConfig::default())?;
//!     let mut events = manager.subscribe();
//!
//!     manager
//!         .login("me@example.com", "secret", "203.0.113.7", &AgentConfig::default())
//!         .await?;
//!     manager.discover_devices(["AA:BB:CC:DD:EE:FF"]).await?;
//!
//!     for device in manager.devices() {
//!         println!("{}: {} ({})", device.name(), device.state().power(), device.room_temperature());
//!     }
//!
//!     manager.set_mode("AA:BB:CC:DD:EE:FF", OperatingMode::Cool).await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             ChannelEvent::StateChanged { mac_address, state } => {
//!                 println!("{mac_address} is now {}", state.mode());
//!             }
//!             ChannelEvent::Error(err) => {
//!                 eprintln!("channel lost: {err}");
//!                 break;
//!             }
//!             ChannelEvent::RoomTemperature { .. } => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Callbacks
//!
//! ```no_run
//! use smartcielo::event::Callbacks;
//! use smartcielo::{AgentConfig, CloudConfig, ConnectionManager};
//!
//! #[tokio::main]
//! async fn main() -> smartcielo::Result<()> {
//!     let callbacks = Callbacks::new();
//!     callbacks.on_command(|mac, state| println!("{mac}: {}", state.temperature()));
//!     callbacks.on_temperature(|mac, temp| println!("{mac}: room at {temp}"));
//!     callbacks.on_error(|err| eprintln!("channel lost: {err}"));
//!
//!     let mut manager = ConnectionManager::with_handler(CloudConfig::default(), callbacks)?;
//!     manager
//!         .login("me@example.com", "secret", "203.0.113.7", &AgentConfig::default())
//!         .await?;
//!     manager.discover_devices(["AA:BB:CC:DD:EE:FF"]).await?;
//!     manager.power_on("AA:BB:CC:DD:EE:FF").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Reconnection
//!
//! The library never reconnects on its own. A closed channel is reported
//! through [`EventHandler::on_error`](event::EventHandler::on_error);
//! calling [`ConnectionManager::discover_devices`] again rebuilds the
//! registry and opens a new channel.

mod channel;
mod config;
pub mod device;
pub mod error;
pub mod event;
mod manager;
pub mod protocol;
mod session;
pub mod types;

pub use config::{AgentConfig, CloudConfig};
pub use device::{ApplianceId, Device, DeviceRegistry, DeviceState};
pub use error::{
    AuthError, ChannelError, DiscoveryError, Error, Result, SendError, ValueError,
};
pub use event::{Callbacks, ChannelEvent, EventBus, EventHandler};
pub use manager::{ConnectionManager, SessionState};
pub use protocol::ControlChange;
pub use session::SessionCredentials;
pub use types::{FanSpeed, OperatingMode, PowerState, Temperature};
