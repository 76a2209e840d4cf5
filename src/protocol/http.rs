// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP side of the backend: login, device list and token refresh.

use reqwest::{Client, Method, RequestBuilder, Response};

use crate::config::{AgentConfig, CloudConfig};
use crate::error::{AuthError, DiscoveryError};
use crate::protocol::wire::{
    DevicesResponse, LoginRequest, LoginResponse, LoginUser, RefreshResponse,
};
use crate::session::SessionCredentials;

/// HTTP client for the backend's REST endpoints.
///
/// Every request carries the fixed API key, origin and referer headers
/// from [`CloudConfig`]; the backend refuses requests without them.
///
/// # Examples
///
/// ```no_run
/// use smartcielo::protocol::CloudHttpClient;
/// use smartcielo::{AgentConfig, CloudConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CloudHttpClient::new(CloudConfig::default())?;
/// let credentials = client
///     .login("me@example.com", "secret", "203.0.113.7", &AgentConfig::default())
///     .await?;
/// let devices = client.list_devices(&credentials).await?;
/// println!("{} devices", devices.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CloudHttpClient {
    client: Client,
    config: CloudConfig,
}

impl CloudHttpClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be created.
    pub fn new(config: CloudConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("accept", "application/json, text/plain, */*")
            .header("x-api-key", self.config.api_key())
            .header("origin", self.config.origin())
            .header("referer", self.config.referer())
    }

    /// Performs the login exchange.
    ///
    /// Input is forwarded as-is; the backend is the only validator.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] on transport failure, a non-success status, or
    /// a response without session credentials.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        source_ip: &str,
        agent: &AgentConfig,
    ) -> Result<SessionCredentials, AuthError> {
        let body = LoginRequest {
            user: LoginUser {
                user_id: username,
                password,
                mobile_device_id: agent.mobile_device_id(),
                device_token_id: agent.device_token_id(),
                app_type: agent.app_type(),
                app_version: agent.app_version(),
                time_zone: agent.time_zone(),
                mobile_device_name: agent.mobile_device_name(),
                device_type: agent.device_type(),
                ip_address: source_ip,
                is_smart_hvac: agent.is_smart_hvac(),
                locale: agent.locale(),
            },
        };

        tracing::debug!(url = %self.config.login_endpoint(), user = %username, "Sending login request");

        let response = self
            .request(Method::POST, self.config.login_endpoint())
            .json(&body)
            .send()
            .await?;

        let (status, text) = read_body(response).await?;
        if !(200..300).contains(&status) {
            return Err(AuthError::Rejected { status, body: text });
        }

        let parsed: LoginResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        Ok(SessionCredentials::from_login(parsed.data.user))
    }

    /// Fetches the raw device list.
    ///
    /// Entries are returned undecoded so the caller can filter before
    /// interpreting them.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Backend`] with the response body when the
    /// backend answers with an error status or with anything other than a
    /// device list.
    pub async fn list_devices(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Vec<serde_json::Value>, DiscoveryError> {
        tracing::debug!(url = %self.config.devices_endpoint(), "Fetching device list");

        let response = self
            .request(Method::GET, self.config.devices_endpoint())
            .header("authorization", credentials.access_token())
            .send()
            .await?;

        let (status, payload) = read_body(response).await?;
        if !(200..300).contains(&status) {
            return Err(DiscoveryError::Backend { status, payload });
        }

        match serde_json::from_str::<DevicesResponse>(&payload) {
            Ok(parsed) => Ok(parsed.data.list_devices),
            Err(e) => {
                tracing::debug!(error = %e, "Device list response has no device array");
                Err(DiscoveryError::Backend { status, payload })
            }
        }
    }

    /// Exchanges the refresh token, returning the new token lifetime in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingRefreshToken`] when the session has no
    /// refresh token, or another [`AuthError`] if the exchange fails.
    pub async fn refresh_token(&self, credentials: &SessionCredentials) -> Result<u64, AuthError> {
        let refresh_token = credentials
            .refresh_token()
            .ok_or(AuthError::MissingRefreshToken)?;

        let url = format!(
            "{}?refreshToken={}",
            self.config.refresh_endpoint(),
            urlencoding::encode(refresh_token)
        );

        tracing::debug!(url = %self.config.refresh_endpoint(), "Refreshing access token");

        let response = self
            .request(Method::GET, &url)
            .header("authorization", credentials.access_token())
            .send()
            .await?;

        let (status, text) = read_body(response).await?;
        if !(200..300).contains(&status) {
            return Err(AuthError::Rejected { status, body: text });
        }

        let parsed: RefreshResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        Ok(parsed.data.expires_in)
    }
}

async fn read_body(response: Response) -> Result<(u16, String), reqwest::Error> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    tracing::debug!(status, body_len = text.len(), "Received HTTP response");
    Ok((status, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_keeps_config() {
        let config = CloudConfig::new().with_api_key("test-key");
        let client = CloudHttpClient::new(config).unwrap();
        assert_eq!(client.config().api_key(), "test-key");
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_fails_locally() {
        let client = CloudHttpClient::new(CloudConfig::new()).unwrap();
        let credentials = SessionCredentials::new("s", "u", "t");

        let result = client.refresh_token(&credentials).await;
        assert!(matches!(result, Err(AuthError::MissingRefreshToken)));
    }
}
