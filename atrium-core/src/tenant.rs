//! Core multi-tenant types for Atrium.
//!
//! A tenant is a platform team. Its id is the only thing a tenant-scoped call
//! needs, and workspace documents reference it twice (`teamId`, `tenantId`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tenant identifier (the platform team id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context carried into every tenant-scoped platform call.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: TenantId,
}

impl TenantContext {
    /// Convenience constructor from a string.
    pub fn new<S: Into<String>>(tenant: S) -> Self {
        Self {
            tenant_id: TenantId(tenant.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessAction {
    Read,
    Write,
}

/// Which members of a tenant a grant applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TenantRole {
    /// Every member of the team.
    Member,
    /// Members holding the `owner` team role.
    Owner,
}

impl TenantRole {
    /// Team role name, `None` for plain membership.
    pub fn role_name(&self) -> Option<&'static str> {
        match self {
            TenantRole::Member => None,
            TenantRole::Owner => Some("owner"),
        }
    }
}

/// Platform-neutral permission on a tenant-scoped resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessGrant {
    pub action: AccessAction,
    pub tenant: TenantId,
    pub role: TenantRole,
}

impl AccessGrant {
    pub fn read(tenant: &TenantId, role: TenantRole) -> Self {
        Self {
            action: AccessAction::Read,
            tenant: tenant.clone(),
            role,
        }
    }

    pub fn write(tenant: &TenantId, role: TenantRole) -> Self {
        Self {
            action: AccessAction::Write,
            tenant: tenant.clone(),
            role,
        }
    }
}

/// Grants for anything owned by a workspace: members read, owners write.
pub fn workspace_grants(tenant: &TenantId) -> Vec<AccessGrant> {
    vec![
        AccessGrant::read(tenant, TenantRole::Member),
        AccessGrant::write(tenant, TenantRole::Owner),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_grants_are_member_read_and_owner_write() {
        let tenant = TenantId("team_1".to_string());
        let grants = workspace_grants(&tenant);

        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].action, AccessAction::Read);
        assert_eq!(grants[0].role, TenantRole::Member);
        assert_eq!(grants[1].action, AccessAction::Write);
        assert_eq!(grants[1].role.role_name(), Some("owner"));
        assert!(grants.iter().all(|g| g.tenant == tenant));
    }

    #[test]
    fn context_wraps_tenant_id() {
        let ctx = TenantContext::new("team_1");
        assert_eq!(ctx.tenant_id, TenantId("team_1".into()));
        assert_eq!(ctx.tenant_id.to_string(), "team_1");
    }
}
