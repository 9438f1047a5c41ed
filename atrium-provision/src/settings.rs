//! Typed settings for one invocation, built once from the configuration
//! snapshot and passed into the provisioner.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use atrium_core::{AtriumConfig, AtriumConfigSnapshot, AtriumError};
use reqwest::Url;
use tracing::warn;

pub const APPWRITE_ENDPOINT: &str = "APPWRITE_ENDPOINT";
pub const APPWRITE_PROJECT_ID: &str = "APPWRITE_PROJECT_ID";
pub const APPWRITE_API_KEY: &str = "APPWRITE_API_KEY";
pub const APPWRITE_DATABASE_ID: &str = "APPWRITE_DATABASE_ID";
pub const APPWRITE_WORKSPACES_COLLECTION_ID: &str = "APPWRITE_WORKSPACES_COLLECTION_ID";
pub const WEBHOOK_URL: &str = "WEBHOOK_URL";
pub const WEBHOOK_API_KEY: &str = "WEBHOOK_API_KEY";
pub const WEBHOOK_TIMEOUT_SECS: &str = "WEBHOOK_TIMEOUT_SECS";
pub const WORKSPACE_ASSIGN_OWNER: &str = "WORKSPACE_ASSIGN_OWNER";

pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct PlatformSettings {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: String,
}

impl fmt::Debug for PlatformSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformSettings")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct WebhookSettings {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl fmt::Debug for WebhookSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookSettings")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ProvisionSettings {
    pub platform: PlatformSettings,
    pub database_id: String,
    pub workspaces_collection_id: String,
    /// `None` unless both URL and key are configured and the URL is usable.
    pub webhook: Option<WebhookSettings>,
    pub assign_owner: bool,
}

/// Webhook settings are optional: anything unusable turns the welcome
/// notification off with a warning instead of failing the invocation.
fn webhook_settings(config: &AtriumConfigSnapshot) -> Option<WebhookSettings> {
    let (url, api_key) = match (config.get(WEBHOOK_URL), config.get(WEBHOOK_API_KEY)) {
        (Some(url), Some(api_key)) => (url, api_key),
        (None, None) => return None,
        _ => {
            warn!("{WEBHOOK_URL} and {WEBHOOK_API_KEY} must both be set, webhook disabled");
            return None;
        }
    };

    if let Err(e) = require_http_url(WEBHOOK_URL, url) {
        warn!(error = %e, "welcome webhook disabled");
        return None;
    }

    let timeout = match config.get(WEBHOOK_TIMEOUT_SECS) {
        None => DEFAULT_WEBHOOK_TIMEOUT,
        Some(raw) => match config.get_u64(WEBHOOK_TIMEOUT_SECS) {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    value = raw,
                    "{WEBHOOK_TIMEOUT_SECS} is not a positive number of seconds, using default"
                );
                DEFAULT_WEBHOOK_TIMEOUT
            }
        },
    };

    Some(WebhookSettings {
        url: url.to_string(),
        api_key: api_key.to_string(),
        timeout,
    })
}

fn require_http_url(key: &str, value: &str) -> Result<(), AtriumError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(AtriumError::configuration(format!("{key} must be an http(s) URL"))),
    }
}

impl ProvisionSettings {
    /// Settings from an invocation `env` map.
    pub fn from_env(env: &HashMap<String, String>) -> Result<Self, AtriumError> {
        let config =
            AtriumConfig::from_pairs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Self::from_snapshot(&config.snapshot())
    }

    pub fn from_snapshot(config: &AtriumConfigSnapshot) -> Result<Self, AtriumError> {
        let endpoint = config.require(APPWRITE_ENDPOINT)?;
        require_http_url(APPWRITE_ENDPOINT, endpoint)?;

        let platform = PlatformSettings {
            endpoint: endpoint.to_string(),
            project_id: config.require(APPWRITE_PROJECT_ID)?.to_string(),
            api_key: config.require(APPWRITE_API_KEY)?.to_string(),
        };

        let webhook = webhook_settings(config);

        let assign_owner = match config.get(WORKSPACE_ASSIGN_OWNER) {
            None => true,
            Some(_) => config.get_bool(WORKSPACE_ASSIGN_OWNER).ok_or_else(|| {
                AtriumError::configuration(format!(
                    "{WORKSPACE_ASSIGN_OWNER} must be true or false"
                ))
            })?,
        };

        Ok(Self {
            platform,
            database_id: config.require(APPWRITE_DATABASE_ID)?.to_string(),
            workspaces_collection_id: config
                .require(APPWRITE_WORKSPACES_COLLECTION_ID)?
                .to_string(),
            webhook,
            assign_owner,
        })
    }
}
