//! Hosted auth client backing the session gate.
//!
//! Talks to a GoTrue-compatible `/auth/v1` surface (Supabase). The client
//! only covers what the session gate needs: password sign-in, sign-out,
//! refresh, and restoring a persisted session.

use std::fmt;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{compact_text, unix_timestamp_now};

const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// An authenticated session. Tokens are redacted from Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    /// Whether the session is expired or about to expire.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse auth payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Auth API error: {0}")]
    Api(String),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Where sessions survive between runs (keychain, in-memory test store, ...).
pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

#[derive(Clone)]
pub struct AuthClient<S: SessionPersistence> {
    auth_url: String,
    anon_key: String,
    client: Client,
    store: S,
}

impl<S: SessionPersistence> AuthClient<S> {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>, store: S) -> AuthResult<Self> {
        let auth_url = normalize_auth_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Auth anon key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            auth_url,
            anon_key,
            client: Client::builder().build()?,
            store,
        })
    }

    /// Restore the persisted session, refreshing it when it has expired.
    ///
    /// A failed refresh clears the stored session and yields `None` rather
    /// than an error, so the caller falls back to the sign-in flow.
    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored) = self.store.load_session()? else {
            return Ok(None);
        };

        if !stored.is_expired() {
            return Ok(Some(stored));
        }

        match self.refresh_session(&stored.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(error) => {
                tracing::warn!("Failed to refresh persisted session: {}", error);
                self.store.clear_session()?;
                Ok(None)
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        if email.trim().is_empty() {
            return Err(AuthError::Api("Email is required".to_string()));
        }
        if password.trim().is_empty() {
            return Err(AuthError::Api("Password is required".to_string()));
        }

        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        let request = self.public_request(
            self.client
                .post(format!("{}/token", self.auth_url))
                .query(&[("grant_type", "password")])
                .json(&payload),
        );

        let session = self.send_session_request(request).await?;
        self.store.save_session(&session)?;
        Ok(session)
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Refresh token must not be empty".to_string(),
            ));
        }

        let payload = serde_json::json!({
            "refresh_token": refresh_token,
        });
        let request = self.public_request(
            self.client
                .post(format!("{}/token", self.auth_url))
                .query(&[("grant_type", "refresh_token")])
                .json(&payload),
        );

        let session = self.send_session_request(request).await?;
        self.store.save_session(&session)?;
        Ok(session)
    }

    /// Sign out and clear the persisted session.
    ///
    /// An already-invalid token (401) still counts as signed out.
    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let response = self
            .client
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !(response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED) {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }

        self.store.clear_session()?;
        Ok(())
    }

    fn public_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn send_session_request(&self, request: RequestBuilder) -> AuthResult<AuthSession> {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }
        let payload = response.json::<SessionPayload>().await?;
        payload.into_session()
    }
}

/// Normalize an auth project URL, appending `/auth/v1` when missing.
pub fn normalize_auth_url(url: &str) -> AuthResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "Auth URL must not be empty".to_string(),
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AuthError::InvalidConfiguration(
            "Auth URL must include http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/auth/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/auth/v1"))
    }
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    email: Option<String>,
}

impl SessionPayload {
    fn into_session(self) -> AuthResult<AuthSession> {
        let expires_at = self
            .expires_at
            .or_else(|| {
                self.expires_in
                    .map(|expires_in| unix_timestamp_now().saturating_add(expires_in))
            })
            .ok_or_else(|| {
                AuthError::Api(
                    "Auth response did not include expires_at/expires_in".to_string(),
                )
            })?;

        Ok(AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: AuthUser {
                id: self.user.id,
                email: self.user.email,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    msg: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = payload
            .message
            .or(payload.msg)
            .or(payload.error_description)
            .or(payload.error)
        {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_auth_url_appends_auth_path() {
        let normalized = normalize_auth_url("https://demo.supabase.co").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/auth/v1");
    }

    #[test]
    fn normalize_auth_url_keeps_existing_auth_path() {
        let normalized = normalize_auth_url("https://demo.supabase.co/auth/v1/").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/auth/v1");
    }

    #[test]
    fn normalize_auth_url_rejects_bare_hosts() {
        assert!(normalize_auth_url("demo.supabase.co").is_err());
        assert!(normalize_auth_url("   ").is_err());
    }

    #[test]
    fn session_payload_falls_back_to_expires_in() {
        let payload: SessionPayload = serde_json::from_str(
            r#"{
                "access_token": "at",
                "refresh_token": "rt",
                "expires_in": 3600,
                "user": {"id": "user-1", "email": "user@example.com"}
            }"#,
        )
        .unwrap();

        let session = payload.into_session().unwrap();
        assert!(session.expires_at > unix_timestamp_now());
        assert_eq!(session.user.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn session_payload_requires_some_expiry() {
        let payload: SessionPayload = serde_json::from_str(
            r#"{
                "access_token": "at",
                "refresh_token": "rt",
                "user": {"id": "user-1", "email": null}
            }"#,
        )
        .unwrap();

        assert!(payload.into_session().is_err());
    }

    #[test]
    fn session_expiry_applies_skew() {
        let session = AuthSession {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at: unix_timestamp_now() + 30,
            user: AuthUser {
                id: "user".to_string(),
                email: None,
            },
        };
        // 30 seconds left is inside the 60 second skew window.
        assert!(session.is_expired());
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let session = AuthSession {
            access_token: "secret-access-token".to_string(),
            refresh_token: "secret-refresh-token".to_string(),
            expires_at: 1_700_000_000,
            user: AuthUser {
                id: "user".to_string(),
                email: None,
            },
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-access-token"));
        assert!(!rendered.contains("secret-refresh-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn parse_api_error_prefers_structured_messages() {
        let rendered = parse_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"error_description": "Invalid login credentials"}"#,
        );
        assert_eq!(rendered, "Invalid login credentials (400)");

        let rendered = parse_api_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(rendered, "HTTP 502");
    }
}
