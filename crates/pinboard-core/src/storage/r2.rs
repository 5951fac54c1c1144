//! Cloudflare R2 object storage client.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::{primitives::ByteStream, Client};
use aws_types::region::Region;

use crate::storage::ObjectStore;
use crate::{Error, Result};

const ENV_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";
const ENV_BUCKET: &str = "R2_BUCKET";
const ENV_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";
const ENV_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";

/// Cloudflare R2 configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R2Config {
    /// Cloudflare account identifier.
    pub account_id: String,
    /// R2 bucket name.
    pub bucket: String,
    /// Access key id for S3-compatible auth.
    pub access_key_id: String,
    /// Secret access key for S3-compatible auth.
    pub secret_access_key: String,
}

impl R2Config {
    /// Load R2 configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no R2 variables are set.
    /// Returns an error when only a partial configuration is provided.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>> {
        let account_id = lookup(ENV_ACCOUNT_ID).map(|value| value.trim().to_string());
        let bucket = lookup(ENV_BUCKET).map(|value| value.trim().to_string());
        let access_key_id = lookup(ENV_ACCESS_KEY_ID).map(|value| value.trim().to_string());
        let secret_access_key =
            lookup(ENV_SECRET_ACCESS_KEY).map(|value| value.trim().to_string());

        let any_present = account_id.is_some()
            || bucket.is_some()
            || access_key_id.is_some()
            || secret_access_key.is_some();

        if !any_present {
            return Ok(None);
        }

        let mut missing = Vec::new();
        if account_id.as_ref().map_or(true, String::is_empty) {
            missing.push(ENV_ACCOUNT_ID);
        }
        if bucket.as_ref().map_or(true, String::is_empty) {
            missing.push(ENV_BUCKET);
        }
        if access_key_id.as_ref().map_or(true, String::is_empty) {
            missing.push(ENV_ACCESS_KEY_ID);
        }
        if secret_access_key.as_ref().map_or(true, String::is_empty) {
            missing.push(ENV_SECRET_ACCESS_KEY);
        }

        if !missing.is_empty() {
            return Err(Error::InvalidInput(format!(
                "R2 configuration is incomplete. Missing: {}",
                missing.join(", ")
            )));
        }

        Ok(Some(Self {
            account_id: account_id.expect("validated above"),
            bucket: bucket.expect("validated above"),
            access_key_id: access_key_id.expect("validated above"),
            secret_access_key: secret_access_key.expect("validated above"),
        }))
    }

    /// Cloudflare R2 S3-compatible endpoint URL.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

/// R2-backed object store with presigned retrieval URLs.
#[derive(Clone, Debug)]
pub struct R2Storage {
    config: R2Config,
    ttl: Duration,
    client: Client,
}

impl R2Storage {
    #[must_use]
    pub fn new(config: R2Config, ttl: Duration) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "pinboard-r2-storage",
        );

        let sdk_config = aws_sdk_s3::config::Builder::new()
            .region(Region::new("auto"))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint_url())
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            config,
            ttl,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &R2Config {
        &self.config
    }
}

#[async_trait]
impl ObjectStore for R2Storage {
    async fn upload(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<()> {
        let object_key = normalize_object_key(key)?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes.to_vec()));

        if let Some(content_type) = normalize_content_type(content_type) {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|error| {
            storage_error("put_object", &self.config.bucket, &object_key, error)
        })?;

        Ok(())
    }

    async fn retrieval_url(&self, key: &str) -> Result<String> {
        let object_key = normalize_object_key(key)?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(&object_key)
            .presigned(presign_config(self.ttl)?)
            .await
            .map_err(|error| {
                storage_error("presign_get_object", &self.config.bucket, &object_key, error)
            })?;

        Ok(presigned.uri().to_string())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let object_key = normalize_object_key(key)?;

        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(&object_key)
            .send()
            .await
            .map_err(|error| {
                storage_error("delete_object", &self.config.bucket, &object_key, error)
            })?;

        Ok(())
    }
}

fn presign_config(ttl: Duration) -> Result<PresigningConfig> {
    PresigningConfig::expires_in(ttl)
        .map_err(|error| Error::Storage(format!("Invalid presign TTL: {error}")))
}

fn storage_error(
    operation: &str,
    bucket: &str,
    object_key: &str,
    error: impl std::fmt::Display,
) -> Error {
    Error::Storage(format!(
        "R2 {operation} failed for {bucket}/{object_key}: {error}"
    ))
}

fn normalize_object_key(object_key: &str) -> Result<String> {
    let object_key = object_key.trim().trim_matches('/').to_string();
    if object_key.is_empty() {
        return Err(Error::InvalidInput(
            "Storage key cannot be empty".to_string(),
        ));
    }
    if object_key.contains("..") {
        return Err(Error::InvalidInput(
            "Storage key must not contain path traversal segments".to_string(),
        ));
    }
    Ok(object_key)
}

fn normalize_content_type(content_type: Option<&str>) -> Option<String> {
    content_type
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
