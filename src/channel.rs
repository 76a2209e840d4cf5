// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Real-time channel: one websocket to the backend.
//!
//! Inbound messages are routed by type, not matched to requests. A reader
//! task decodes each text frame, applies it to the shared
//! [`DeviceRegistry`] and notifies the [`EventHandler`]. Commands are
//! written through a shared writer and complete once the frame is on the
//! wire; the resulting state arrives later as an ordinary notification.
//!
//! Closure and transport errors are pushed to the handler. The channel
//! never reconnects on its own.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::device::DeviceRegistry;
use crate::error::{ChannelError, SendError};
use crate::event::EventHandler;
use crate::protocol::{Notification, decode_notification};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, Message>;
type WsReader = SplitStream<WsStream>;

/// An open websocket plus the task reading from it.
pub(crate) struct RealtimeChannel {
    writer: Arc<Mutex<WsWriter>>,
    open: Arc<AtomicBool>,
    reader: JoinHandle<()>,
}

impl RealtimeChannel {
    /// Connects and spawns the reader task.
    ///
    /// Resolves once the websocket handshake completes.
    pub(crate) async fn open<H: EventHandler>(
        url: &str,
        connect_timeout: Duration,
        keepalive: Option<Duration>,
        registry: Arc<RwLock<DeviceRegistry>>,
        handler: Arc<H>,
    ) -> Result<Self, ChannelError> {
        tracing::info!(url = %strip_query(url), "Connecting real-time channel");

        let (stream, _response) =
            tokio::time::timeout(connect_timeout, tokio_tungstenite::connect_async(url))
                .await
                .map_err(|_| ChannelError::Timeout(connect_timeout))?
                .map_err(|e| ChannelError::Connect(e.to_string()))?;

        tracing::info!("Real-time channel open");

        let (write, read) = stream.split();
        let writer = Arc::new(Mutex::new(write));
        let open = Arc::new(AtomicBool::new(true));

        let shared = Shared {
            writer: Arc::clone(&writer),
            open: Arc::clone(&open),
            registry,
            handler,
        };
        let reader = tokio::spawn(read_loop(read, shared, keepalive));

        Ok(Self {
            writer,
            open,
            reader,
        })
    }

    /// Returns `true` until the connection closes or is shut down.
    pub(crate) fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Writes one text frame.
    pub(crate) async fn send(&self, text: String) -> Result<(), SendError> {
        let mut writer = self.writer.lock().await;
        writer
            .send(Message::text(text))
            .await
            .map_err(|e| SendError::Transport(e.to_string()))
    }

    /// Shuts the channel down from this side.
    ///
    /// Stops the reader first, so no closure is reported to the handler.
    pub(crate) async fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.reader.abort();

        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.close().await {
            tracing::debug!(error = %e, "Error while closing real-time channel");
        }
        tracing::info!("Real-time channel shut down");
    }
}

impl Drop for RealtimeChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl std::fmt::Debug for RealtimeChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeChannel")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Reader task
// ============================================================================

struct Shared<H> {
    writer: Arc<Mutex<WsWriter>>,
    open: Arc<AtomicBool>,
    registry: Arc<RwLock<DeviceRegistry>>,
    handler: Arc<H>,
}

impl<H: EventHandler> Shared<H> {
    fn closed(&self, error: &ChannelError) {
        self.open.store(false, Ordering::SeqCst);
        tracing::info!(error = %error, "Real-time channel closed");
        self.handler.on_error(error);
    }
}

async fn read_loop<H: EventHandler>(
    mut read: WsReader,
    shared: Shared<H>,
    keepalive: Option<Duration>,
) {
    let mut pinger = keepalive.map(|period| tokio::time::interval_at(Instant::now() + period, period));

    loop {
        let frame = tokio::select! {
            frame = read.next() => frame,
            () = tick(pinger.as_mut()) => {
                send_ping(&shared.writer).await;
                continue;
            }
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                handle_message(text.as_str(), &shared.registry, shared.handler.as_ref());
            }
            Some(Ok(Message::Close(frame))) => {
                let (code, reason) = frame.map_or((None, String::new()), |cf| {
                    (Some(u16::from(cf.code)), cf.reason.as_str().to_string())
                });
                shared.closed(&ChannelError::Closed { code, reason });
                return;
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                // tungstenite answers pings itself
                tracing::trace!("Real-time channel ping/pong");
            }
            Some(Ok(_)) => {}
            Some(Err(
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed,
            ))
            | None => {
                shared.closed(&ChannelError::Closed {
                    code: None,
                    reason: String::new(),
                });
                return;
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Real-time channel transport error");
                shared.handler.on_error(&ChannelError::Transport(e.to_string()));

                // Oversized frames are dropped; anything else kills the stream.
                if !matches!(e, tungstenite::Error::Capacity(_)) {
                    shared.closed(&ChannelError::Closed {
                        code: None,
                        reason: e.to_string(),
                    });
                    return;
                }
            }
        }
    }
}

async fn tick(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn send_ping(writer: &Mutex<WsWriter>) {
    let mut writer = writer.lock().await;
    if let Err(e) = writer.send(Message::Ping(Vec::new().into())).await {
        tracing::warn!(error = %e, "Keepalive ping failed");
    } else {
        tracing::trace!("Keepalive ping sent");
    }
}

/// Applies one inbound text frame to the registry and notifies the handler.
///
/// Undecodable frames and frames naming an unknown device change nothing
/// and notify no one.
pub(crate) fn handle_message<H: EventHandler + ?Sized>(
    text: &str,
    registry: &RwLock<DeviceRegistry>,
    handler: &H,
) {
    match decode_notification(text) {
        Some(Notification::StateChange { mac_address, state }) => {
            let applied = registry.write().apply_state(&mac_address, state.clone());
            if applied {
                tracing::debug!(mac = %mac_address, power = %state.power(), temp = %state.temperature(), mode = %state.mode(), fanspeed = %state.fan_speed(), "State change applied");
                handler.on_command(&mac_address, &state);
            } else {
                tracing::debug!(mac = %mac_address, "State change for unknown device ignored");
            }
        }
        Some(Notification::Heartbeat {
            mac_address,
            room_temperature,
        }) => {
            let applied = registry
                .write()
                .apply_room_temperature(&mac_address, room_temperature);
            if applied {
                tracing::debug!(mac = %mac_address, room_temperature, "Room temperature updated");
                handler.on_temperature(&mac_address, room_temperature);
            } else {
                tracing::debug!(mac = %mac_address, "Heartbeat for unknown device ignored");
            }
        }
        None => {}
    }
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{ApplianceId, Device, DeviceState};
    use crate::types::{FanSpeed, OperatingMode, PowerState, Temperature};

    #[derive(Default)]
    struct Recorder {
        commands: parking_lot::Mutex<Vec<(String, DeviceState)>>,
        temperatures: parking_lot::Mutex<Vec<(String, f64)>>,
    }

    impl EventHandler for Recorder {
        fn on_command(&self, mac_address: &str, state: &DeviceState) {
            self.commands.lock().push((mac_address.to_string(), state.clone()));
        }

        fn on_temperature(&self, mac_address: &str, room_temperature: f64) {
            self.temperatures
                .lock()
                .push((mac_address.to_string(), room_temperature));
        }
    }

    const MAC: &str = "AA:BB:CC:DD:EE:FF";

    fn registry() -> RwLock<DeviceRegistry> {
        let mut registry = DeviceRegistry::new();
        registry.replace(vec![Device::new(
            MAC,
            "Hall",
            ApplianceId::new(5),
            "1.0",
            DeviceState::new(
                PowerState::On,
                Temperature::new(68),
                OperatingMode::Heat,
                FanSpeed::Low,
            ),
            66.0,
        )]);
        RwLock::new(registry)
    }

    #[test]
    fn state_change_updates_record_and_notifies() {
        let registry = registry();
        let recorder = Recorder::default();
        let text = r#"{"message_type":"x","mid":"WEB","action":{"power":"off","temp":"70","mode":"auto","fanspeed":"auto"},"mac_address":"AA:BB:CC:DD:EE:FF"}"#;

        handle_message(text, &registry, &recorder);

        let expected = DeviceState::new(
            PowerState::Off,
            Temperature::new(70),
            OperatingMode::Auto,
            FanSpeed::Auto,
        );
        let device = registry.read().get(MAC).cloned().unwrap();
        assert_eq!(device.state(), &expected);
        assert!((device.room_temperature() - 66.0).abs() < f64::EPSILON);
        assert_eq!(*recorder.commands.lock(), vec![(MAC.to_string(), expected)]);
    }

    #[test]
    fn state_change_with_unlisted_values_is_applied() {
        let registry = registry();
        let recorder = Recorder::default();
        let text = r#"{"message_type":"x","mid":"WEB","action":{"power":"off","temp":"22.5","mode":"eco","fanspeed":"medium-high"},"mac_address":"AA:BB:CC:DD:EE:FF"}"#;

        handle_message(text, &registry, &recorder);

        let device = registry.read().get(MAC).cloned().unwrap();
        assert_eq!(device.state().power(), &PowerState::Off);
        assert_eq!(device.state().temperature().as_str(), "22.5");
        assert_eq!(device.state().mode(), &OperatingMode::Other("eco".to_string()));
        assert_eq!(
            device.state().fan_speed(),
            &FanSpeed::Other("medium-high".to_string())
        );
        assert_eq!(recorder.commands.lock().len(), 1);
    }

    #[test]
    fn heartbeat_updates_room_temperature_only() {
        let registry = registry();
        let recorder = Recorder::default();
        let before = registry.read().get(MAC).unwrap().state().clone();
        let text = r#"{"message_type":"x","mid":"Heartbeat","lat_env_var":{"temperature":"64"},"mac_address":"AA:BB:CC:DD:EE:FF"}"#;

        handle_message(text, &registry, &recorder);

        let device = registry.read().get(MAC).cloned().unwrap();
        assert_eq!(device.state(), &before);
        assert!((device.room_temperature() - 64.0).abs() < f64::EPSILON);
        assert_eq!(*recorder.temperatures.lock(), vec![(MAC.to_string(), 64.0)]);
        assert!(recorder.commands.lock().is_empty());
    }

    #[test]
    fn unknown_device_changes_nothing() {
        let registry = registry();
        let recorder = Recorder::default();
        let before = registry.read().snapshot();

        handle_message(
            r#"{"message_type":"x","mid":"WEB","action":{"power":"off","temp":"70","mode":"auto","fanspeed":"auto"},"mac_address":"00:00:00:00:00:00"}"#,
            &registry,
            &recorder,
        );
        handle_message(
            r#"{"message_type":"x","mid":"Heartbeat","lat_env_var":{"temperature":50},"mac_address":"00:00:00:00:00:00"}"#,
            &registry,
            &recorder,
        );

        assert_eq!(registry.read().snapshot(), before);
        assert!(recorder.commands.lock().is_empty());
        assert!(recorder.temperatures.lock().is_empty());
    }

    #[test]
    fn malformed_messages_are_ignored() {
        let registry = registry();
        let recorder = Recorder::default();
        let before = registry.read().snapshot();

        handle_message("{", &registry, &recorder);
        handle_message(r#"{"mid":"WEB","mac_address":"AA:BB:CC:DD:EE:FF"}"#, &registry, &recorder);

        assert_eq!(registry.read().snapshot(), before);
        assert!(recorder.commands.lock().is_empty());
    }

    #[test]
    fn strip_query_hides_credentials() {
        assert_eq!(
            strip_query("wss://host/websocket/?sessionId=a&token=b"),
            "wss://host/websocket/"
        );
        assert_eq!(strip_query("wss://host/"), "wss://host/");
    }
}
