// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Backend and client-identification configuration.

use std::time::Duration;

use crate::session::SessionCredentials;

// ============================================================================
// CloudConfig - where and how to reach the backend
// ============================================================================

/// Configuration of the backend endpoints and the fixed request headers.
///
/// The defaults target the production service. Every endpoint can be
/// overridden, which is how the tests point the library at a mock backend.
///
/// # Examples
///
/// ```
/// use smartcielo::CloudConfig;
/// use std::time::Duration;
///
/// // Production defaults
/// let config = CloudConfig::default();
/// assert_eq!(config.login_endpoint(), "https://api.smartcielo.com/web/login");
///
/// // A local mock backend
/// let config = CloudConfig::new()
///     .with_api_base("http://127.0.0.1:8080")
///     .with_channel_endpoint("ws://127.0.0.1:8081/websocket/")
///     .with_request_timeout(Duration::from_secs(2))
///     .with_keepalive(None);
/// assert_eq!(config.devices_endpoint(), "http://127.0.0.1:8080/web/devices?limit=420");
/// ```
#[derive(Debug, Clone)]
pub struct CloudConfig {
    api_key: String,
    origin: String,
    referer: String,
    login_endpoint: String,
    devices_endpoint: String,
    refresh_endpoint: String,
    channel_endpoint: String,
    request_timeout: Duration,
    connect_timeout: Duration,
    keepalive: Option<Duration>,
}

impl CloudConfig {
    /// API key the web client sends with every request.
    pub const DEFAULT_API_KEY: &'static str = "7xTAU4y4B34u8DjMsODlEyprRRQEsbJ3IB7vZie4";
    /// Origin header the backend expects.
    pub const DEFAULT_ORIGIN: &'static str = "https://home.cielowigle.com";
    /// Referer header the backend expects.
    pub const DEFAULT_REFERER: &'static str = "https://home.cielowigle.com/";
    /// Base URL of the HTTP API.
    pub const DEFAULT_API_BASE: &'static str = "https://api.smartcielo.com";
    /// Real-time channel endpoint.
    pub const DEFAULT_CHANNEL_ENDPOINT: &'static str = "wss://apiwss.smartcielo.com/websocket/";
    /// Default HTTP request timeout.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default timeout for opening the real-time channel.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default interval between keepalive pings.
    pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(240);

    const LOGIN_PATH: &'static str = "/web/login";
    const DEVICES_PATH: &'static str = "/web/devices?limit=420";
    const REFRESH_PATH: &'static str = "/web/token/refresh";

    /// Creates a configuration with production defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the login, device list and refresh endpoints at another base URL.
    #[must_use]
    pub fn with_api_base(mut self, base: impl AsRef<str>) -> Self {
        let base = base.as_ref().trim_end_matches('/');
        self.login_endpoint = format!("{base}{}", Self::LOGIN_PATH);
        self.devices_endpoint = format!("{base}{}", Self::DEVICES_PATH);
        self.refresh_endpoint = format!("{base}{}", Self::REFRESH_PATH);
        self
    }

    /// Sets the API key header value.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the origin header value.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the referer header value.
    #[must_use]
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// Overrides the login endpoint.
    #[must_use]
    pub fn with_login_endpoint(mut self, url: impl Into<String>) -> Self {
        self.login_endpoint = url.into();
        self
    }

    /// Overrides the device list endpoint, query included.
    #[must_use]
    pub fn with_devices_endpoint(mut self, url: impl Into<String>) -> Self {
        self.devices_endpoint = url.into();
        self
    }

    /// Overrides the token refresh endpoint.
    #[must_use]
    pub fn with_refresh_endpoint(mut self, url: impl Into<String>) -> Self {
        self.refresh_endpoint = url.into();
        self
    }

    /// Overrides the real-time channel endpoint.
    #[must_use]
    pub fn with_channel_endpoint(mut self, url: impl Into<String>) -> Self {
        self.channel_endpoint = url.into();
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets how long opening the real-time channel may take.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the keepalive ping interval; `None` disables pings.
    #[must_use]
    pub fn with_keepalive(mut self, interval: Option<Duration>) -> Self {
        self.keepalive = interval;
        self
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the origin header value.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the referer header value.
    #[must_use]
    pub fn referer(&self) -> &str {
        &self.referer
    }

    /// Returns the login endpoint.
    #[must_use]
    pub fn login_endpoint(&self) -> &str {
        &self.login_endpoint
    }

    /// Returns the device list endpoint.
    #[must_use]
    pub fn devices_endpoint(&self) -> &str {
        &self.devices_endpoint
    }

    /// Returns the token refresh endpoint.
    #[must_use]
    pub fn refresh_endpoint(&self) -> &str {
        &self.refresh_endpoint
    }

    /// Returns the real-time channel endpoint.
    #[must_use]
    pub fn channel_endpoint(&self) -> &str {
        &self.channel_endpoint
    }

    /// Returns the HTTP request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the channel connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the keepalive interval.
    #[must_use]
    pub fn keepalive(&self) -> Option<Duration> {
        self.keepalive
    }

    /// Builds the channel URL carrying the session id and access token.
    pub(crate) fn channel_url(&self, credentials: &SessionCredentials) -> String {
        format!(
            "{}?sessionId={}&token={}",
            self.channel_endpoint,
            urlencoding::encode(credentials.session_id()),
            urlencoding::encode(credentials.access_token())
        )
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_key: Self::DEFAULT_API_KEY.to_string(),
            origin: Self::DEFAULT_ORIGIN.to_string(),
            referer: Self::DEFAULT_REFERER.to_string(),
            login_endpoint: String::new(),
            devices_endpoint: String::new(),
            refresh_endpoint: String::new(),
            channel_endpoint: Self::DEFAULT_CHANNEL_ENDPOINT.to_string(),
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            keepalive: Some(Self::DEFAULT_KEEPALIVE),
        }
        .with_api_base(Self::DEFAULT_API_BASE)
    }
}

// ============================================================================
// AgentConfig - how the client identifies itself at login
// ============================================================================

/// Client-identification fields sent with the login request.
///
/// The defaults impersonate the vendor's browser client.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    mobile_device_id: String,
    device_token_id: String,
    app_type: String,
    app_version: String,
    time_zone: String,
    mobile_device_name: String,
    device_type: String,
    is_smart_hvac: u8,
    locale: String,
}

impl AgentConfig {
    /// Creates the default browser-like identity with a fresh device id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mobile device id and device token id.
    #[must_use]
    pub fn with_device_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.device_token_id.clone_from(&id);
        self.mobile_device_id = id;
        self
    }

    /// Sets the app type.
    #[must_use]
    pub fn with_app_type(mut self, app_type: impl Into<String>) -> Self {
        self.app_type = app_type.into();
        self
    }

    /// Sets the app version.
    #[must_use]
    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = version.into();
        self
    }

    /// Sets the IANA time zone name.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Sets the client device name.
    #[must_use]
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.mobile_device_name = name.into();
        self
    }

    /// Sets the locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Mobile device id.
    #[must_use]
    pub fn mobile_device_id(&self) -> &str {
        &self.mobile_device_id
    }

    /// Device token id.
    #[must_use]
    pub fn device_token_id(&self) -> &str {
        &self.device_token_id
    }

    /// App type.
    #[must_use]
    pub fn app_type(&self) -> &str {
        &self.app_type
    }

    /// App version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Time zone.
    #[must_use]
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    /// Client device name.
    #[must_use]
    pub fn mobile_device_name(&self) -> &str {
        &self.mobile_device_name
    }

    /// Device type.
    #[must_use]
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Smart HVAC flag.
    #[must_use]
    pub fn is_smart_hvac(&self) -> u8 {
        self.is_smart_hvac
    }

    /// Locale.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        let id = format!("WEB {}", uuid::Uuid::new_v4());
        Self {
            mobile_device_id: id.clone(),
            device_token_id: id,
            app_type: "WEB".to_string(),
            app_version: "1.0".to_string(),
            time_zone: "America/Los_Angeles".to_string(),
            mobile_device_name: "chrome".to_string(),
            device_type: "WEB".to_string(),
            is_smart_hvac: 0,
            locale: "en".to_string(),
        }
    }
}
