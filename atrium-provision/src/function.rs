//! Function entry: one JSON invocation in, one JSON response out.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{error, warn};

use atrium_appwrite::{
    AccountSessionStrategy, AppwriteClient, AppwriteTenantDirectory, AppwriteWorkspaceRepository,
};
use atrium_auth::{AuthOptions, Authenticator, InvocationHeaders};
use atrium_core::{AtriumError, WorkspaceResponse};

use crate::notify::WebhookNotifier;
use crate::provisioner::Provisioner;
use crate::settings::ProvisionSettings;

/// What the runtime hands the function on stdin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Invocation {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// What the function writes to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub body: String,
}

impl FunctionResponse {
    pub fn ok(response: &WorkspaceResponse) -> Self {
        Self {
            status_code: 200,
            body: serde_json::to_string(response).unwrap_or_default(),
        }
    }

    /// Logs `err` with its internal detail, then returns its sanitized form.
    pub fn from_error(err: &AtriumError) -> Self {
        let detail = err.source.as_ref().map(|s| format!("{s:#}"));
        if err.kind.is_server_error() {
            error!(code = err.code(), error = %err, detail = ?detail, "request failed");
        } else {
            warn!(code = err.code(), error = %err, detail = ?detail, "request rejected");
        }
        let client = err.sanitize_for_client();
        Self {
            status_code: client.status_code(),
            body: client.to_json().to_string(),
        }
    }
}

/// Decodes raw stdin bytes. Invalid UTF-8 is reported like any other
/// undecodable invocation.
pub fn parse_invocation(raw: &[u8]) -> Result<Invocation, AtriumError> {
    serde_json::from_slice(raw).map_err(|e| {
        AtriumError::invalid_request("Failed to parse request").with_source(e.into())
    })
}

/// Wires the Appwrite adapters, session strategy and optional webhook.
pub fn build_provisioner(settings: &ProvisionSettings) -> Result<Provisioner, AtriumError> {
    let platform = &settings.platform;
    let base = AppwriteClient::new(&platform.endpoint, &platform.project_id).map_err(|e| {
        AtriumError::configuration("Server configuration error").with_source(e.into())
    })?;
    let admin = base.clone().with_api_key(&platform.api_key);

    let auth = Authenticator::new(
        AuthOptions::default(),
        Arc::new(AccountSessionStrategy::new(base)),
    );
    let tenants = Arc::new(AppwriteTenantDirectory::new(admin.clone()));
    let workspaces = Arc::new(AppwriteWorkspaceRepository::new(
        admin,
        settings.database_id.as_str(),
        settings.workspaces_collection_id.as_str(),
    ));

    let mut provisioner =
        Provisioner::new(auth, tenants, workspaces).assign_owner(settings.assign_owner);
    if let Some(webhook) = &settings.webhook {
        match WebhookNotifier::new(webhook) {
            Ok(notifier) => provisioner = provisioner.with_notifier(Arc::new(notifier)),
            Err(e) => warn!(error = %format!("{e:#}"), "welcome webhook disabled"),
        }
    }
    Ok(provisioner)
}

/// Handles one decoded invocation.
pub async fn handle(invocation: Invocation) -> FunctionResponse {
    match process(invocation).await {
        Ok(response) => FunctionResponse::ok(&response),
        Err(err) => FunctionResponse::from_error(&err),
    }
}

async fn process(invocation: Invocation) -> Result<WorkspaceResponse, AtriumError> {
    let headers = InvocationHeaders::from(invocation.headers);
    let options = AuthOptions::default();
    atrium_auth::verify_trigger(&headers, &options)?;

    let settings = ProvisionSettings::from_env(&invocation.env).map_err(|e| {
        AtriumError::configuration("Server configuration error").with_source(e.into_anyhow())
    })?;
    let provisioner = build_provisioner(&settings)?;

    let workspace = provisioner.provision(&headers, &invocation.body).await?;
    Ok(WorkspaceResponse::created(workspace))
}

/// Raw stdin to response.
pub async fn run(raw: &[u8]) -> FunctionResponse {
    match parse_invocation(raw) {
        Ok(invocation) => handle(invocation).await,
        Err(err) => FunctionResponse::from_error(&err),
    }
}

/// Reads the whole invocation from `input`, then runs it. A read failure
/// still yields a response.
pub async fn run_from<R: AsyncRead + Unpin>(mut input: R) -> FunctionResponse {
    let mut raw = Vec::new();
    match input.read_to_end(&mut raw).await {
        Ok(_) => run(&raw).await,
        Err(e) => FunctionResponse::from_error(
            &AtriumError::invalid_request("Failed to parse request").with_source(e.into()),
        ),
    }
}
