use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AtriumError;
use crate::tenant::TenantId;

/// Subscription plan of a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "enterprise" => Ok(Plan::Enterprise),
            other => Err(format!("unknown plan '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceStatus {
    #[default]
    Active,
    Suspended,
    Archived,
}

/// Caller-supplied body of a create request.
///
/// `plan` stays a string here: an empty value means "use the default" and an
/// unknown one is reported as a validation error on `plan`, not a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceCreateRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

/// Verified identity behind a session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub user_id: String,
    pub session_id: String,
    pub email: String,
    pub name: String,
}

impl fmt::Debug for SessionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionInfo")
            .field("user_id", &self.user_id)
            .field("session_id", &"<redacted>")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish()
    }
}

/// Workspace as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub team_id: String,
    pub owner_id: String,
    pub created_at: String,
    pub status: WorkspaceStatus,
    pub plan: Plan,
    pub tenant_id: String,
}

/// `{ "success": true, "workspace": ..., "message": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceResponse {
    pub success: bool,
    pub workspace: Workspace,
    pub message: String,
}

impl WorkspaceResponse {
    pub fn created(workspace: Workspace) -> Self {
        Self {
            success: true,
            workspace,
            message: "Workspace created successfully".to_string(),
        }
    }
}

/// Document payload persisted in the workspaces collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRecord {
    pub name: String,
    pub slug: String,
    pub team_id: String,
    pub owner_id: String,
    pub status: WorkspaceStatus,
    pub plan: Plan,
    pub tenant_id: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WorkspaceRecord {
    /// New active workspace owned by `owner_id` inside `tenant`.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        tenant: &TenantId,
        owner_id: impl Into<String>,
        plan: Plan,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            team_id: tenant.0.clone(),
            owner_id: owner_id.into(),
            status: WorkspaceStatus::Active,
            plan,
            tenant_id: tenant.0.clone(),
            created_at: format_timestamp(created_at),
            description,
        }
    }

    /// Checks the record before it is serialized for the store.
    pub fn validate(&self) -> Result<(), AtriumError> {
        let blank = [
            ("name", &self.name),
            ("slug", &self.slug),
            ("teamId", &self.team_id),
            ("ownerId", &self.owner_id),
        ];
        if let Some((field, _)) = blank.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(AtriumError::workspace_creation_failed(format!(
                "workspace record has an empty {field}"
            )));
        }
        if self.tenant_id != self.team_id {
            return Err(AtriumError::workspace_creation_failed(
                "workspace record tenantId must equal teamId",
            ));
        }
        if DateTime::parse_from_rfc3339(&self.created_at).is_err() {
            return Err(AtriumError::workspace_creation_failed(
                "workspace record createdAt is not RFC 3339",
            ));
        }
        Ok(())
    }

    /// Response view of this record once the store assigned `id`.
    pub fn into_workspace(self, id: impl Into<String>) -> Workspace {
        Workspace {
            id: id.into(),
            name: self.name,
            slug: self.slug,
            team_id: self.team_id,
            owner_id: self.owner_id,
            created_at: self.created_at,
            status: self.status,
            plan: self.plan,
            tenant_id: self.tenant_id,
        }
    }
}

/// RFC 3339, UTC, second precision (`2024-05-01T09:30:00Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
