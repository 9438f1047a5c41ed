//! Welcome notification sent once a workspace exists.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use atrium_core::format_timestamp;

use crate::settings::WebhookSettings;

pub const WORKSPACE_CREATED_EVENT: &str = "workspace.created";
pub const WEBHOOK_SOURCE_HEADER: &str = "X-Webhook-Source";
pub const WEBHOOK_SOURCE: &str = "appwrite-function";

/// What the notifier learns about a freshly provisioned workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceCreated {
    pub workspace_name: String,
    pub user_email: String,
    pub team_id: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookData<'a> {
    workspace_name: &'a str,
    user_email: &'a str,
    team_id: &'a str,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    event: &'static str,
    timestamp: String,
    data: WebhookData<'a>,
}

impl<'a> From<&'a WorkspaceCreated> for WebhookPayload<'a> {
    fn from(event: &'a WorkspaceCreated) -> Self {
        Self {
            event: WORKSPACE_CREATED_EVENT,
            timestamp: format_timestamp(event.at),
            data: WebhookData {
                workspace_name: &event.workspace_name,
                user_email: &event.user_email,
                team_id: &event.team_id,
            },
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn workspace_created(&self, event: &WorkspaceCreated) -> Result<()>;
}

/// Posts `workspace.created` to an external webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: Client,
    url: String,
    api_key: String,
}

impl WebhookNotifier {
    pub fn new(settings: &WebhookSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("building webhook http client")?;
        Ok(Self {
            http,
            url: settings.url.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn workspace_created(&self, event: &WorkspaceCreated) -> Result<()> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header(WEBHOOK_SOURCE_HEADER, WEBHOOK_SOURCE)
            .json(&WebhookPayload::from(event))
            .send()
            .await
            .context("webhook request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("webhook responded with status {}", status.as_u16());
        }
        debug!(status = status.as_u16(), team_id = %event.team_id, "webhook delivered");
        Ok(())
    }
}
