//! Environment-driven client configuration.
//!
//! All endpoints and credentials come from the process environment; config
//! parsing goes through an injectable lookup so tests never touch real env
//! vars. Partial configuration of a collaborator is an error naming the
//! missing variables rather than a silent fallback.

use std::env;
use std::time::Duration;

use crate::storage::R2Config;
use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

const ENV_API_URL: &str = "PINBOARD_API_URL";
const ENV_AUTH_URL: &str = "SUPABASE_URL";
const ENV_AUTH_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const ENV_MEDIA_URL_TTL_SECS: &str = "PINBOARD_MEDIA_URL_TTL_SECS";

const DEFAULT_MEDIA_URL_TTL: Duration = Duration::from_secs(900);

/// Hosted auth project coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub url: String,
    pub anon_key: String,
}

/// Runtime configuration for the Pinboard client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GraphQL endpoint for the notes API
    pub api_url: Option<String>,
    /// Hosted auth project, when configured
    pub auth: Option<AuthConfig>,
    /// Object storage credentials, when configured
    pub r2: Option<R2Config>,
    /// Lifetime of presigned retrieval URLs
    pub media_url_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::parse(|key| env::var(key).ok())
    }

    fn parse(lookup: impl Fn(&str) -> Option<String> + Copy) -> Result<Self> {
        let api_url = match normalize_text_option(lookup(ENV_API_URL)) {
            Some(url) if is_http_url(&url) => Some(url.trim_end_matches('/').to_string()),
            Some(_) => {
                return Err(Error::InvalidInput(format!(
                    "{ENV_API_URL} must include http:// or https://"
                )))
            }
            None => None,
        };

        let auth = match (
            normalize_text_option(lookup(ENV_AUTH_URL)),
            normalize_text_option(lookup(ENV_AUTH_ANON_KEY)),
        ) {
            (None, None) => None,
            (Some(url), Some(anon_key)) => Some(AuthConfig { url, anon_key }),
            _ => {
                return Err(Error::InvalidInput(format!(
                    "{ENV_AUTH_URL} and {ENV_AUTH_ANON_KEY} must be set together"
                )))
            }
        };

        let r2 = R2Config::from_lookup(lookup)?;

        let media_url_ttl = match normalize_text_option(lookup(ENV_MEDIA_URL_TTL_SECS)) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    Error::InvalidInput(format!(
                        "{ENV_MEDIA_URL_TTL_SECS} must be a positive integer"
                    ))
                })?;
                if secs == 0 {
                    return Err(Error::InvalidInput(format!(
                        "{ENV_MEDIA_URL_TTL_SECS} must be a positive integer"
                    )));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_MEDIA_URL_TTL,
        };

        Ok(Self {
            api_url,
            auth,
            r2,
            media_url_ttl,
        })
    }

    /// Notes API endpoint, required for list/create/delete operations.
    pub fn require_api_url(&self) -> Result<&str> {
        self.api_url.as_deref().ok_or_else(|| {
            Error::InvalidInput(format!("{ENV_API_URL} is not set"))
        })
    }

    /// Object storage configuration, required for any image operation.
    pub fn require_r2(&self) -> Result<&R2Config> {
        self.r2.as_ref().ok_or_else(|| {
            Error::InvalidInput(
                "Object storage is not configured. Set the R2_* environment variables."
                    .to_string(),
            )
        })
    }
}
