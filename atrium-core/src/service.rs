use anyhow::Result;
use async_trait::async_trait;

use crate::models::WorkspaceRecord;
use crate::tenant::{AccessGrant, TenantContext, TenantId};

/// Platform side of tenant boundaries (teams).
///
/// Adapters (like atrium-appwrite) implement this against a real backend;
/// tests use in-memory fakes.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Create a new tenant boundary with a platform-generated id.
    async fn create_tenant(&self, name: &str) -> Result<TenantId>;

    /// Delete a tenant boundary. Used as the compensating action.
    async fn delete_tenant(&self, tenant: &TenantId) -> Result<()>;

    /// Give `user_id` the `owner` role inside the tenant.
    async fn add_owner(&self, ctx: &TenantContext, user_id: &str) -> Result<()>;
}

/// Metadata store for workspace documents.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Persist `record` with the given grants, returning the document id.
    async fn create_workspace(
        &self,
        ctx: &TenantContext,
        record: &WorkspaceRecord,
        grants: &[AccessGrant],
    ) -> Result<String>;

    /// Provision the private per-workspace data collection, returning its id.
    async fn init_workspace_collection(
        &self,
        ctx: &TenantContext,
        workspace_name: &str,
        grants: &[AccessGrant],
    ) -> Result<String>;
}
