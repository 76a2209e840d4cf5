// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session orchestration: login, discovery, channel and commands.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::channel::RealtimeChannel;
use crate::config::{AgentConfig, CloudConfig};
use crate::device::{Device, DeviceRegistry};
use crate::error::{AuthError, ChannelError, DiscoveryError, Error, Result, SendError};
use crate::event::{ChannelEvent, EventBus, EventHandler};
use crate::protocol::wire::DeviceListing;
use crate::protocol::{CloudHttpClient, CommandContext, ControlChange, build_command_payload};
use crate::session::SessionCredentials;
use crate::types::{FanSpeed, OperatingMode, PowerState, Temperature};

/// Where a [`ConnectionManager`] is in its lifecycle.
///
/// ```text
/// Unauthenticated -> Authenticated -> Discovering -> Subscribed
/// ```
///
/// There is no automatic transition back when the channel closes. The
/// closure is reported to the [`EventHandler`] and the session stays
/// `Subscribed` with a dead channel until discovery is run again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No login has succeeded yet.
    Unauthenticated,
    /// Credentials are held; no channel is open.
    Authenticated,
    /// Discovery is in progress.
    Discovering,
    /// The registry is populated and the real-time channel was opened.
    Subscribed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::Discovering => "discovering",
            Self::Subscribed => "subscribed",
        };
        f.write_str(s)
    }
}

/// Client session against the cloud backend.
///
/// The manager owns the session credentials, the [`DeviceRegistry`] and
/// the real-time channel. Notifications from the channel go to the
/// handler `H`, an [`EventBus`] unless another handler is supplied with
/// [`with_handler`](Self::with_handler).
///
/// # Examples
///
/// ```no_run
/// use smartcielo::{AgentConfig, CloudConfig, ConnectionManager};
/// use smartcielo::types::Temperature;
///
/// #[tokio::main]
/// async fn main() -> smartcielo::Result<()> {
///     let mut manager = ConnectionManager::new(CloudConfig::default())?;
///     let mut events = manager.subscribe();
///
///     manager
///         .login("me@example.com", "secret", "203.0.113.7", &AgentConfig::default())
///         .await?;
///     manager.discover_devices(["AA:BB:CC:DD:EE:FF"]).await?;
///
///     manager
///         .set_temperature("AA:BB:CC:DD:EE:FF", Temperature::new(70))
///         .await?;
///
///     while let Ok(event) = events.recv().await {
///         println!("{event:?}");
///     }
///     Ok(())
/// }
/// ```
pub struct ConnectionManager<H: EventHandler = EventBus> {
    http: CloudHttpClient,
    handler: Arc<H>,
    credentials: Option<SessionCredentials>,
    registry: Arc<RwLock<DeviceRegistry>>,
    channel: Option<RealtimeChannel>,
    state: SessionState,
    sequence: AtomicU64,
}

impl ConnectionManager<EventBus> {
    /// Creates a manager that publishes notifications on an [`EventBus`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] if the HTTP client cannot be created.
    pub fn new(config: CloudConfig) -> Result<Self> {
        Self::with_handler(config, EventBus::new())
    }

    /// Subscribes to channel notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.handler.subscribe()
    }
}

impl<H: EventHandler> ConnectionManager<H> {
    /// Creates a manager that reports notifications to `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] if the HTTP client cannot be created.
    pub fn with_handler(config: CloudConfig, handler: H) -> Result<Self> {
        let http = CloudHttpClient::new(config).map_err(Error::Client)?;

        Ok(Self {
            http,
            handler: Arc::new(handler),
            credentials: None,
            registry: Arc::new(RwLock::new(DeviceRegistry::new())),
            channel: None,
            state: SessionState::Unauthenticated,
            sequence: AtomicU64::new(0),
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Logs in and stores the session credentials.
    ///
    /// Logging in again replaces the credentials. Any open channel is shut
    /// down and the registry cleared, since both belong to the old session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the request fails or the backend rejects
    /// it. Existing credentials are kept in that case.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        source_ip: &str,
        agent: &AgentConfig,
    ) -> Result<()> {
        let credentials = match self.http.login(username, password, source_ip, agent).await {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::warn!(user = %username, error = %e, "Login failed");
                return Err(e.into());
            }
        };

        self.shutdown_channel().await;
        self.registry.write().clear();

        tracing::info!(user_id = %credentials.user_id(), "Logged in");
        self.credentials = Some(credentials);
        self.state = SessionState::Authenticated;
        Ok(())
    }

    /// Refreshes the access token, returning its new lifetime.
    ///
    /// Never called automatically.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] before login,
    /// [`AuthError::MissingRefreshToken`] when the login response carried
    /// no refresh token, or another [`AuthError`] if the exchange fails.
    pub async fn refresh_token(&self) -> Result<Duration> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(AuthError::NotAuthenticated)?;

        let expires_in = self.http.refresh_token(credentials).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Token refresh failed");
        })?;

        tracing::info!(expires_in, "Access token refreshed");
        Ok(Duration::from_secs(expires_in))
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Fetches the device list, keeps the devices named in `mac_addresses`
    /// and opens the real-time channel.
    ///
    /// The registry is rebuilt from scratch and the command sequence starts
    /// over at zero. A previously open channel is shut down first. Asking
    /// for MAC addresses the backend does not list is not an error; those
    /// devices are simply absent from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotAuthenticated`] before login,
    /// [`Error::Discovery`] if the backend request fails, or
    /// [`Error::Channel`] if the channel cannot be opened. The registry is
    /// left empty on any error.
    pub async fn discover_devices<I, S>(&mut self, mac_addresses: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let wanted: HashSet<String> = mac_addresses.into_iter().map(Into::into).collect();

        self.shutdown_channel().await;
        self.registry.write().clear();

        let Some(credentials) = self.credentials.clone() else {
            return Err(DiscoveryError::NotAuthenticated.into());
        };

        self.state = SessionState::Discovering;
        match self.discover_and_open(&credentials, &wanted).await {
            Ok(()) => {
                self.state = SessionState::Subscribed;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discovery failed");
                self.registry.write().clear();
                self.state = SessionState::Authenticated;
                Err(e)
            }
        }
    }

    async fn discover_and_open(
        &mut self,
        credentials: &SessionCredentials,
        wanted: &HashSet<String>,
    ) -> Result<()> {
        let entries = self.http.list_devices(credentials).await?;
        let listed = entries.len();
        let devices = select_devices(entries, wanted);

        tracing::info!(listed, matched = devices.len(), "Devices discovered");
        self.registry.write().replace(devices);
        self.sequence.store(0, Ordering::SeqCst);

        let config = self.http.config();
        let channel = RealtimeChannel::open(
            &config.channel_url(credentials),
            config.connect_timeout(),
            config.keepalive(),
            Arc::clone(&self.registry),
            Arc::clone(&self.handler),
        )
        .await?;

        self.channel = Some(channel);
        Ok(())
    }

    /// Shuts down the real-time channel.
    ///
    /// No closure is reported to the handler. The registry keeps the last
    /// known state. Does nothing when no channel is open.
    pub async fn disconnect(&mut self) {
        self.shutdown_channel().await;
        if self.state == SessionState::Subscribed {
            self.state = SessionState::Authenticated;
        }
    }

    async fn shutdown_channel(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.close().await;
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Sends one control change to a device.
    ///
    /// Completes when the command is written to the channel. The resulting
    /// state arrives later as a notification; the registry is not touched
    /// here.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::NotOpen`] unless the session is subscribed
    /// and the channel is still open, [`Error::DeviceNotFound`] if the MAC
    /// address is not in the registry, or [`Error::Send`] if the write
    /// fails.
    pub async fn send_command(&self, mac_address: &str, change: ControlChange) -> Result<()> {
        let channel = self.open_channel()?;
        let credentials = self.credentials.as_ref().ok_or(ChannelError::NotOpen)?;

        let device = self
            .registry
            .read()
            .get(mac_address)
            .cloned()
            .ok_or_else(|| Error::DeviceNotFound(mac_address.to_string()))?;

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let context = CommandContext {
            credentials,
            sequence,
            timestamp: chrono::Utc::now().timestamp(),
        };
        let payload = build_command_payload(&device, &change, &context);
        let text = serde_json::to_string(&payload).map_err(SendError::from)?;

        tracing::debug!(mac = %mac_address, seq = sequence, change = %change, "Sending command");
        channel.send(text).await?;
        Ok(())
    }

    /// Sends a control change given in its string form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if `attribute` or `value` is not
    /// recognized, otherwise as [`send_command`](Self::send_command).
    pub async fn send_raw_command(
        &self,
        mac_address: &str,
        attribute: &str,
        value: &str,
    ) -> Result<()> {
        let change = ControlChange::parse(attribute, value)?;
        self.send_command(mac_address, change).await
    }

    /// Turns a device on.
    ///
    /// # Errors
    ///
    /// As [`send_command`](Self::send_command).
    pub async fn power_on(&self, mac_address: &str) -> Result<()> {
        self.send_command(mac_address, ControlChange::Power(PowerState::On))
            .await
    }

    /// Turns a device off.
    ///
    /// # Errors
    ///
    /// As [`send_command`](Self::send_command).
    pub async fn power_off(&self, mac_address: &str) -> Result<()> {
        self.send_command(mac_address, ControlChange::Power(PowerState::Off))
            .await
    }

    /// Sets the operating mode.
    ///
    /// # Errors
    ///
    /// As [`send_command`](Self::send_command).
    pub async fn set_mode(&self, mac_address: &str, mode: OperatingMode) -> Result<()> {
        self.send_command(mac_address, ControlChange::Mode(mode))
            .await
    }

    /// Sets the fan speed.
    ///
    /// # Errors
    ///
    /// As [`send_command`](Self::send_command).
    pub async fn set_fan_speed(&self, mac_address: &str, speed: FanSpeed) -> Result<()> {
        self.send_command(mac_address, ControlChange::FanSpeed(speed))
            .await
    }

    /// Sets the setpoint.
    ///
    /// # Errors
    ///
    /// As [`send_command`](Self::send_command).
    pub async fn set_temperature(&self, mac_address: &str, temperature: Temperature) -> Result<()> {
        self.send_command(mac_address, ControlChange::Temperature(temperature))
            .await
    }

    fn open_channel(&self) -> std::result::Result<&RealtimeChannel, ChannelError> {
        if self.state != SessionState::Subscribed {
            return Err(ChannelError::NotOpen);
        }
        self.channel
            .as_ref()
            .filter(|channel| channel.is_open())
            .ok_or(ChannelError::NotOpen)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the session credentials, if logged in.
    #[must_use]
    pub fn credentials(&self) -> Option<&SessionCredentials> {
        self.credentials.as_ref()
    }

    /// Returns a snapshot of every device record.
    #[must_use]
    pub fn devices(&self) -> Vec<Device> {
        self.registry.read().snapshot()
    }

    /// Returns a snapshot of one device record.
    #[must_use]
    pub fn device(&self, mac_address: &str) -> Option<Device> {
        self.registry.read().get(mac_address).cloned()
    }

    /// Returns the number of device records.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Returns the number of commands sent since the last discovery.
    ///
    /// This is also the sequence number of the most recent command.
    #[must_use]
    pub fn command_count(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Returns `true` while the real-time channel is open.
    #[must_use]
    pub fn is_channel_open(&self) -> bool {
        self.channel.as_ref().is_some_and(RealtimeChannel::is_open)
    }

    /// Returns the event handler.
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns the backend configuration.
    #[must_use]
    pub fn config(&self) -> &CloudConfig {
        self.http.config()
    }
}

impl<H: EventHandler> std::fmt::Debug for ConnectionManager<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state)
            .field("credentials", &self.credentials)
            .field("device_count", &self.device_count())
            .field("channel", &self.channel)
            .field("command_count", &self.command_count())
            .finish_non_exhaustive()
    }
}

/// Keeps the listed devices whose MAC address was asked for, in backend
/// order. Entries that do not decode are skipped.
fn select_devices(entries: Vec<serde_json::Value>, wanted: &HashSet<String>) -> Vec<Device> {
    entries
        .into_iter()
        .filter(|entry| {
            entry
                .get("macAddress")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|mac| wanted.contains(mac))
        })
        .filter_map(|entry| match serde_json::from_value::<DeviceListing>(entry) {
            Ok(listing) => Some(Device::from_listing(listing)),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable device list entry");
                None
            }
        })
        .collect()
}
