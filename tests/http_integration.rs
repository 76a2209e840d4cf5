// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP endpoints using wiremock.

use std::time::Duration;

use serde_json::json;
use smartcielo::protocol::CloudHttpClient;
use smartcielo::{
    AgentConfig, AuthError, CloudConfig, ConnectionManager, DiscoveryError, Error, SessionState,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn login_body() -> serde_json::Value {
    json!({
        "status": 200,
        "message": "SUCCESS",
        "data": {
            "user": {
                "userId": "user-42",
                "sessionId": "session-42",
                "accessToken": "access-42",
                "refreshToken": "refresh-42"
            }
        }
    })
}

fn config(server: &MockServer) -> CloudConfig {
    CloudConfig::new()
        .with_api_base(server.uri())
        .with_api_key("test-key")
        .with_request_timeout(Duration::from_secs(5))
}

// ============================================================================
// CloudHttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn login_posts_credentials_and_agent_identity() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/web/login"))
            .and(header("x-api-key", "test-key"))
            .and(header("origin", CloudConfig::DEFAULT_ORIGIN))
            .and(header("referer", CloudConfig::DEFAULT_REFERER))
            .and(body_partial_json(json!({
                "user": {
                    "userId": "me@example.com",
                    "password": "secret",
                    "mobileDeviceId": "WEB test",
                    "deviceTokenId": "WEB test",
                    "appType": "WEB",
                    "appVersion": "1.0",
                    "mobileDeviceName": "chrome",
                    "deviceType": "WEB",
                    "ipAddress": "203.0.113.7",
                    "isSmartHVAC": 0,
                    "locale": "en"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CloudHttpClient::new(config(&mock_server)).unwrap();
        let agent = AgentConfig::new().with_device_id("WEB test");

        let credentials = client
            .login("me@example.com", "secret", "203.0.113.7", &agent)
            .await
            .unwrap();

        assert_eq!(credentials.session_id(), "session-42");
        assert_eq!(credentials.user_id(), "user-42");
        assert_eq!(credentials.access_token(), "access-42");
        assert_eq!(credentials.refresh_token(), Some("refresh-42"));
    }

    #[tokio::test]
    async fn login_rejection_carries_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/web/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&mock_server)
            .await;

        let client = CloudHttpClient::new(config(&mock_server)).unwrap();
        let result = client
            .login("me@example.com", "wrong", "203.0.113.7", &AgentConfig::default())
            .await;

        match result {
            Err(AuthError::Rejected { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad credentials");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_without_session_fields_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/web/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"user": {"userId": "x"}}})),
            )
            .mount(&mock_server)
            .await;

        let client = CloudHttpClient::new(config(&mock_server)).unwrap();
        let result = client
            .login("me@example.com", "secret", "203.0.113.7", &AgentConfig::default())
            .await;

        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn list_devices_sends_raw_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/web/devices"))
            .and(query_param("limit", "420"))
            .and(header("authorization", "access-42"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"listDevices": [{"macAddress": "AA"}, {"macAddress": "BB"}]}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CloudHttpClient::new(config(&mock_server)).unwrap();
        let credentials = smartcielo::SessionCredentials::new("session-42", "user-42", "access-42");

        let devices = client.list_devices(&credentials).await.unwrap();
        assert_eq!(devices.len(), 2);
    }

    #[tokio::test]
    async fn list_devices_error_carries_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/web/devices"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string(r#"{"message":"Forbidden"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = CloudHttpClient::new(config(&mock_server)).unwrap();
        let credentials = smartcielo::SessionCredentials::new("s", "u", "t");

        match client.list_devices(&credentials).await {
            Err(DiscoveryError::Backend { status, payload }) => {
                assert_eq!(status, 403);
                assert_eq!(payload, r#"{"message":"Forbidden"}"#);
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_devices_unexpected_shape_is_backend_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/web/devices"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "maintenance"})),
            )
            .mount(&mock_server)
            .await;

        let client = CloudHttpClient::new(config(&mock_server)).unwrap();
        let credentials = smartcielo::SessionCredentials::new("s", "u", "t");

        let result = client.list_devices(&credentials).await;
        assert!(matches!(
            result,
            Err(DiscoveryError::Backend { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn refresh_token_returns_lifetime() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/web/token/refresh"))
            .and(query_param("refreshToken", "refresh/42"))
            .and(header("authorization", "access-42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"expiresIn": 3600}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CloudHttpClient::new(config(&mock_server)).unwrap();
        let credentials = smartcielo::SessionCredentials::new("s", "u", "access-42")
            .with_refresh_token("refresh/42");

        assert_eq!(client.refresh_token(&credentials).await.unwrap(), 3600);
    }
}

// ============================================================================
// ConnectionManager Tests (HTTP phase only)
// ============================================================================

mod connection_manager {
    use super::*;

    #[tokio::test]
    async fn login_moves_to_authenticated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/web/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
            .mount(&mock_server)
            .await;

        let mut manager = ConnectionManager::new(config(&mock_server)).unwrap();
        manager
            .login("me@example.com", "secret", "203.0.113.7", &AgentConfig::default())
            .await
            .unwrap();

        assert_eq!(manager.state(), SessionState::Authenticated);
        assert_eq!(manager.credentials().unwrap().session_id(), "session-42");
    }

    #[tokio::test]
    async fn failed_login_stays_unauthenticated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/web/login"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let mut manager = ConnectionManager::new(config(&mock_server)).unwrap();
        let result = manager
            .login("me@example.com", "secret", "203.0.113.7", &AgentConfig::default())
            .await;

        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::Rejected { status: 500, .. }))
        ));
        assert_eq!(manager.state(), SessionState::Unauthenticated);
        assert!(manager.credentials().is_none());
    }

    #[tokio::test]
    async fn discovery_backend_error_leaves_registry_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/web/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/web/devices"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .mount(&mock_server)
            .await;

        let mut manager = ConnectionManager::new(config(&mock_server)).unwrap();
        manager
            .login("me@example.com", "secret", "203.0.113.7", &AgentConfig::default())
            .await
            .unwrap();

        let result = manager.discover_devices(["AA:BB:CC:DD:EE:FF"]).await;

        match result {
            Err(Error::Discovery(DiscoveryError::Backend { status, payload })) => {
                assert_eq!(status, 401);
                assert_eq!(payload, "expired");
            }
            other => panic!("expected backend error, got {other:?}"),
        }
        assert_eq!(manager.device_count(), 0);
        assert_eq!(manager.state(), SessionState::Authenticated);
        assert!(!manager.is_channel_open());
    }

    #[tokio::test]
    async fn refresh_token_through_manager() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/web/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/web/token/refresh"))
            .and(query_param("refreshToken", "refresh-42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"expiresIn": 1800}})),
            )
            .mount(&mock_server)
            .await;

        let mut manager = ConnectionManager::new(config(&mock_server)).unwrap();
        manager
            .login("me@example.com", "secret", "203.0.113.7", &AgentConfig::default())
            .await
            .unwrap();

        let lifetime = manager.refresh_token().await.unwrap();
        assert_eq!(lifetime, Duration::from_secs(1800));
    }
}
