use anyhow::Result;
use async_trait::async_trait;
use atrium_core::{
    AccessGrant, TenantContext, TenantDirectory, TenantId, TenantRole, WorkspaceRecord,
    WorkspaceRepository,
};
use tracing::debug;

use crate::client::{AppwriteClient, ID};
use crate::databases::Databases;
use crate::permission::{team_roles, Permission};
use crate::teams::Teams;

/// [`TenantDirectory`] backed by Appwrite Teams.
#[derive(Debug, Clone)]
pub struct AppwriteTenantDirectory {
    teams: Teams,
}

impl AppwriteTenantDirectory {
    pub fn new(admin: AppwriteClient) -> Self {
        Self {
            teams: Teams::new(admin),
        }
    }
}

#[async_trait]
impl TenantDirectory for AppwriteTenantDirectory {
    async fn create_tenant(&self, name: &str) -> Result<TenantId> {
        let team = self.teams.create(&ID::unique(), name).await?;
        debug!(team_id = %team.id, team_name = %team.name, "appwrite team created");
        Ok(TenantId(team.id))
    }

    async fn delete_tenant(&self, tenant: &TenantId) -> Result<()> {
        self.teams.delete(tenant.as_str()).await?;
        debug!(team_id = %tenant, "appwrite team deleted");
        Ok(())
    }

    async fn add_owner(&self, ctx: &TenantContext, user_id: &str) -> Result<()> {
        let membership = self
            .teams
            .create_membership(ctx.tenant_id.as_str(), &team_roles(&TenantRole::Owner), user_id)
            .await?;
        debug!(
            team_id = %ctx.tenant_id,
            membership_id = %membership.id,
            "owner membership created"
        );
        Ok(())
    }
}

/// [`WorkspaceRepository`] backed by one Appwrite database.
#[derive(Debug, Clone)]
pub struct AppwriteWorkspaceRepository {
    databases: Databases,
    database_id: String,
    collection_id: String,
}

impl AppwriteWorkspaceRepository {
    pub fn new(
        admin: AppwriteClient,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            databases: Databases::new(admin),
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

#[async_trait]
impl WorkspaceRepository for AppwriteWorkspaceRepository {
    async fn create_workspace(
        &self,
        ctx: &TenantContext,
        record: &WorkspaceRecord,
        grants: &[AccessGrant],
    ) -> Result<String> {
        let document = self
            .databases
            .create_document(
                &self.database_id,
                &self.collection_id,
                &ID::unique(),
                record,
                &Permission::from_grants(grants),
            )
            .await?;
        debug!(team_id = %ctx.tenant_id, document_id = %document.id, "workspace document created");
        Ok(document.id)
    }

    async fn init_workspace_collection(
        &self,
        ctx: &TenantContext,
        workspace_name: &str,
        grants: &[AccessGrant],
    ) -> Result<String> {
        let collection = self
            .databases
            .create_collection(
                &self.database_id,
                &ID::unique(),
                &format!("{workspace_name} Data"),
                &Permission::from_grants(grants),
                true,
            )
            .await?;
        debug!(
            team_id = %ctx.tenant_id,
            collection_id = %collection.id,
            "workspace collection created"
        );
        Ok(collection.id)
    }
}
