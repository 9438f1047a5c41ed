use std::fmt;

use atrium_core::{AccessAction, AccessGrant, TenantRole};

/// Appwrite role string, e.g. `team:abc` or `team:abc/owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role(String);

impl Role {
    pub fn team(team_id: &str, role: Option<&str>) -> Self {
        match role {
            Some(role) => Role(format!("team:{team_id}/{role}")),
            None => Role(format!("team:{team_id}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Appwrite permission string, e.g. `read("team:abc")`.
pub struct Permission;

impl Permission {
    pub fn read(role: &Role) -> String {
        format!("read(\"{role}\")")
    }

    pub fn write(role: &Role) -> String {
        format!("write(\"{role}\")")
    }

    pub fn from_grant(grant: &AccessGrant) -> String {
        let role = Role::team(grant.tenant.as_str(), grant.role.role_name());
        match grant.action {
            AccessAction::Read => Self::read(&role),
            AccessAction::Write => Self::write(&role),
        }
    }

    pub fn from_grants(grants: &[AccessGrant]) -> Vec<String> {
        grants.iter().map(Self::from_grant).collect()
    }
}

/// Team role names for a grant-style role.
pub fn team_roles(role: &TenantRole) -> Vec<String> {
    role.role_name().map(str::to_string).into_iter().collect()
}
