// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `smartcielo` library.
//!
//! Errors are split by the phase they belong to. Setup-phase failures
//! ([`AuthError`], [`DiscoveryError`]) and command failures ([`SendError`])
//! are returned from the call that caused them. [`ChannelError`] is also
//! pushed asynchronously to the session's
//! [`EventHandler`](crate::event::EventHandler) when the real-time
//! connection fails after it was opened, since no call is pending then.

use std::time::Duration;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Login or token refresh failed.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Device discovery failed.
    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The real-time channel is unavailable.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Writing a command to the open channel failed.
    #[error("send error: {0}")]
    Send(#[from] SendError),

    /// A value could not be interpreted.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// No device with this MAC address is in the registry.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Errors raised by the login and token refresh exchanges.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend rejected the request (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// No session credentials are available.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The login response did not include a refresh token.
    #[error("no refresh token in session")]
    MissingRefreshToken,
}

/// Errors raised while fetching the device list.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Discovery requires a successful login first.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend reported an error; `payload` is its response verbatim.
    #[error("backend error (HTTP {status}): {payload}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        payload: String,
    },
}

/// Errors of the real-time channel transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// No channel is open.
    #[error("channel is not open")]
    NotOpen,

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The connection did not open within the configured time.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// The connection was closed by the server or the network.
    #[error("connection closed (code {code:?}): {reason}")]
    Closed {
        /// Close code, when the server sent a close frame.
        code: Option<u16>,
        /// Close reason; empty when none was given.
        reason: String,
    },

    /// The transport reported an error.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors while writing a command to an open channel.
#[derive(Debug, Error)]
pub enum SendError {
    /// The payload could not be serialized.
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The transport rejected the write.
    #[error("write failed: {0}")]
    Transport(String),
}

/// Errors related to interpreting control values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An unknown power state string.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An unknown operating mode string.
    #[error("invalid operating mode: {0}")]
    InvalidMode(String),

    /// An unknown fan speed string.
    #[error("invalid fan speed: {0}")]
    InvalidFanSpeed(String),

    /// A temperature that is not a whole number.
    #[error("invalid temperature: {0}")]
    InvalidTemperature(String),

    /// An attribute name other than `power`, `mode`, `fanspeed` or `temp`.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
