// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session credentials obtained from login.

use std::fmt;

use crate::protocol::wire::LoginSession;

/// Ephemeral credentials of one login.
///
/// Kept in memory only. The access token authorizes device discovery and
/// is embedded in the real-time channel URL. Nothing refreshes it
/// automatically; see
/// [`ConnectionManager::refresh_token`](crate::ConnectionManager::refresh_token).
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    session_id: String,
    user_id: String,
    access_token: String,
    refresh_token: Option<String>,
}

impl SessionCredentials {
    /// Creates credentials without a refresh token.
    #[must_use]
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Attaches a refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    /// Session identifier.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// User identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Refresh token, when the backend issued one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

impl SessionCredentials {
    pub(crate) fn from_login(session: LoginSession) -> Self {
        Self {
            session_id: session.session_id,
            user_id: session.user_id,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}

// Tokens stay out of logs.
impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
