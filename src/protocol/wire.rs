// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON schemas exchanged with the backend.
//!
//! Every message has an explicit record type here. Inbound real-time
//! messages go through [`decode_notification`], which fails closed: anything
//! that does not decode into a recognized notification is skipped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::{ApplianceId, DeviceState};
use crate::types::{FanSpeed, OperatingMode, PowerState, Temperature};

/// Discriminator of state-change notifications.
pub const MID_STATE_CHANGE: &str = "WEB";

/// Discriminator of heartbeat/telemetry notifications.
pub const MID_HEARTBEAT: &str = "Heartbeat";

// ============================================================================
// Scalars
// ============================================================================

/// A JSON value that may arrive either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn deserialize_f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = NumberOrString::deserialize(deserializer)?;
    raw.as_f64()
        .ok_or_else(|| serde::de::Error::custom(format!("not a number: {raw}")))
}

// ============================================================================
// Login
// ============================================================================

/// Body of `POST /web/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub user: LoginUser<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginUser<'a> {
    pub user_id: &'a str,
    pub password: &'a str,
    pub mobile_device_id: &'a str,
    pub device_token_id: &'a str,
    pub app_type: &'a str,
    pub app_version: &'a str,
    pub time_zone: &'a str,
    pub mobile_device_name: &'a str,
    pub device_type: &'a str,
    pub ip_address: &'a str,
    #[serde(rename = "isSmartHVAC")]
    pub is_smart_hvac: u8,
    pub locale: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub data: LoginData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    pub user: LoginSession,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginSession {
    pub session_id: String,
    pub user_id: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// ============================================================================
// Token refresh
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub data: RefreshData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshData {
    pub expires_in: u64,
}

// ============================================================================
// Device list
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesResponse {
    pub data: DevicesData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DevicesData {
    /// Entries stay raw so one undecodable device does not sink the list.
    pub list_devices: Vec<serde_json::Value>,
}

/// One entry of `listDevices`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeviceListing {
    pub mac_address: String,
    pub device_name: String,
    pub appliance_id: ApplianceId,
    pub fw_version: String,
    pub latest_action: DeviceState,
    pub lat_env: ListingEnvironment,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListingEnvironment {
    #[serde(deserialize_with = "deserialize_f64_lenient")]
    pub temp: f64,
}

// ============================================================================
// Real-time channel, inbound
// ============================================================================

/// Envelope of every inbound real-time message.
#[derive(Debug, Deserialize)]
struct InboundEnvelope {
    message_type: String,
    mid: String,
    #[serde(default)]
    action: Option<serde_json::Value>,
    #[serde(default)]
    lat_env_var: Option<InboundEnvironment>,
    #[serde(default)]
    mac_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InboundEnvironment {
    #[serde(deserialize_with = "deserialize_f64_lenient")]
    temperature: f64,
}

/// A recognized inbound notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The device's control vector changed.
    StateChange {
        /// Target device MAC address.
        mac_address: String,
        /// New power/temperature/mode/fan-speed group.
        state: DeviceState,
    },
    /// Periodic telemetry carrying the ambient room temperature.
    Heartbeat {
        /// Target device MAC address.
        mac_address: String,
        /// Ambient room temperature.
        room_temperature: f64,
    },
}

/// Decodes one inbound text frame.
///
/// Returns `None` for anything that is not a complete, recognized
/// notification: invalid JSON, a missing `message_type` tag, a missing
/// sub-object for the discriminator, or an unknown `mid`.
#[must_use]
pub fn decode_notification(text: &str) -> Option<Notification> {
    let envelope: InboundEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping undecodable channel message");
            return None;
        }
    };

    tracing::trace!(message_type = %envelope.message_type, mid = %envelope.mid, "Channel message");

    let mac_address = envelope.mac_address?;

    match envelope.mid.as_str() {
        MID_STATE_CHANGE => {
            let state = match serde_json::from_value::<DeviceState>(envelope.action?) {
                Ok(state) => state,
                Err(e) => {
                    tracing::debug!(error = %e, mac = %mac_address, "Skipping state change with bad action");
                    return None;
                }
            };
            Some(Notification::StateChange { mac_address, state })
        }
        MID_HEARTBEAT => Some(Notification::Heartbeat {
            mac_address,
            room_temperature: envelope.lat_env_var?.temperature,
        }),
        _ => None,
    }
}

// ============================================================================
// Real-time channel, outbound
// ============================================================================

/// Full control vector carried by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlVector {
    pub fanspeed: FanSpeed,
    pub light: &'static str,
    pub mode: OperatingMode,
    pub old_power: PowerState,
    pub power: PowerState,
    pub swing: &'static str,
    pub temp: Temperature,
    pub turbo: &'static str,
}

/// Outbound `actionControl` message.
///
/// The command sequence number rides along in [`sequence`](Self::sequence)
/// but stays local: the backend's schema has no field for it, so it is
/// skipped on serialization and only used for logging and
/// [`ConnectionManager::command_count`](crate::ConnectionManager::command_count).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPayload {
    pub action: &'static str,
    pub action_source: &'static str,
    pub action_type: &'static str,
    pub action_value: String,
    pub actions: ControlVector,
    pub appliance_id: ApplianceId,
    pub appliance_type: &'static str,
    #[serde(rename = "application_version")]
    pub application_version: &'static str,
    #[serde(rename = "connection_source")]
    pub connection_source: u8,
    pub device_type_version: &'static str,
    pub fw_version: String,
    pub mac_address: String,
    pub mid: String,
    pub token: String,
    pub ts: i64,
    /// Per-connection command number, starting at 1 after each discovery.
    /// Never serialized.
    #[serde(skip)]
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_state_change() {
        let text = r#"{
            "message_type": "StateUpdate",
            "mid": "WEB",
            "action": {"power": "off", "temp": "70", "mode": "auto", "fanspeed": "auto"},
            "mac_address": "AA:BB:CC:DD:EE:FF"
        }"#;

        let notification = decode_notification(text).unwrap();
        let Notification::StateChange { mac_address, state } = notification else {
            panic!("expected a state change");
        };
        assert_eq!(mac_address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(state.power(), &PowerState::Off);
        assert_eq!(state.temperature(), &Temperature::new(70));
        assert_eq!(state.mode(), &OperatingMode::Auto);
        assert_eq!(state.fan_speed(), &FanSpeed::Auto);
    }

    #[test]
    fn decodes_heartbeat_with_numeric_or_string_temperature() {
        let numeric = r#"{"message_type":"x","mid":"Heartbeat","lat_env_var":{"temperature":71.5},"mac_address":"AA"}"#;
        let text = r#"{"message_type":"x","mid":"Heartbeat","lat_env_var":{"temperature":"71.5"},"mac_address":"AA"}"#;

        for raw in [numeric, text] {
            assert_eq!(
                decode_notification(raw),
                Some(Notification::Heartbeat {
                    mac_address: "AA".to_string(),
                    room_temperature: 71.5,
                })
            );
        }
    }

    #[test]
    fn skips_messages_without_tag() {
        let text = r#"{"mid":"WEB","action":{"power":"on","temp":"70","mode":"auto","fanspeed":"auto"},"mac_address":"AA"}"#;
        assert_eq!(decode_notification(text), None);
    }

    #[test]
    fn skips_state_change_without_action() {
        let text = r#"{"message_type":"x","mid":"WEB","mac_address":"AA"}"#;
        assert_eq!(decode_notification(text), None);
    }

    #[test]
    fn skips_heartbeat_without_environment() {
        let text = r#"{"message_type":"x","mid":"Heartbeat","mac_address":"AA"}"#;
        assert_eq!(decode_notification(text), None);
    }

    #[test]
    fn skips_unknown_discriminator_and_garbage() {
        let text = r#"{"message_type":"x","mid":"Other","mac_address":"AA"}"#;
        assert_eq!(decode_notification(text), None);
        assert_eq!(decode_notification("not json"), None);
    }

    #[test]
    fn state_change_keeps_values_outside_known_sets() {
        let text = r#"{"message_type":"x","mid":"WEB","action":{"power":"off","temp":"22.5","mode":"eco","fanspeed":"medium-high"},"mac_address":"AA"}"#;

        let Some(Notification::StateChange { state, .. }) = decode_notification(text) else {
            panic!("expected a state change");
        };
        assert_eq!(state.power(), &PowerState::Off);
        assert_eq!(state.temperature().as_str(), "22.5");
        assert_eq!(state.mode(), &OperatingMode::Other("eco".to_string()));
        assert_eq!(state.fan_speed(), &FanSpeed::Other("medium-high".to_string()));
    }

    #[test]
    fn device_listing_keeps_values_outside_known_sets() {
        let listing: DeviceListing = serde_json::from_value(serde_json::json!({
            "macAddress": "AA",
            "deviceName": "Den",
            "applianceId": 1,
            "fwVersion": "1.0",
            "latestAction": {"power": "on", "temp": "22.5", "mode": "eco", "fanspeed": "auto"},
            "latEnv": {"temp": 21}
        }))
        .unwrap();

        assert_eq!(listing.latest_action.temperature().as_str(), "22.5");
        assert_eq!(
            listing.latest_action.mode(),
            &OperatingMode::Other("eco".to_string())
        );
    }

    #[test]
    fn login_request_uses_backend_field_names() {
        let body = LoginRequest {
            user: LoginUser {
                user_id: "me@example.com",
                password: "pw",
                mobile_device_id: "WEB 1",
                device_token_id: "WEB 1",
                app_type: "WEB",
                app_version: "1.0",
                time_zone: "America/New_York",
                mobile_device_name: "chrome",
                device_type: "WEB",
                ip_address: "10.0.0.2",
                is_smart_hvac: 0,
                locale: "en",
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["user"]["userId"], "me@example.com");
        assert_eq!(json["user"]["ipAddress"], "10.0.0.2");
        assert_eq!(json["user"]["isSmartHVAC"], 0);
        assert_eq!(json["user"]["mobileDeviceName"], "chrome");
    }
}
