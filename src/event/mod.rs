// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push notifications from the real-time channel.
//!
//! The channel reports to an [`EventHandler`]. Two implementations ship
//! with the library:
//!
//! - [`EventBus`]: republishes everything as [`ChannelEvent`]s on a tokio
//!   broadcast channel (the default)
//! - [`Callbacks`]: dispatches to registered closures
//!
//! # Examples
//!
//! ```
//! use smartcielo::event::{ChannelEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! // In a task:
//! // while let Ok(event) = rx.recv().await {
//! //     match event {
//! //         ChannelEvent::StateChanged { mac_address, state } => { ... }
//! //         ChannelEvent::Error(err) => { ... }
//! //         _ => {}
//! //     }
//! // }
//! ```

mod callbacks;
mod channel_event;
mod event_bus;
mod handler;

pub use callbacks::{Callbacks, SubscriptionId};
pub use channel_event::ChannelEvent;
pub use event_bus::EventBus;
pub use handler::EventHandler;
