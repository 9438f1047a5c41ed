//! The create-workspace saga.
//!
//! Order is fixed: trigger gate, session, body, business rules, team,
//! document (compensated by deleting the team), then the non-critical
//! tail (owner membership, data collection, webhook).

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use atrium_auth::{Authenticator, InvocationHeaders};
use atrium_core::{
    parse_body, validate_request, workspace_grants, AtriumError, ErrorKind, SessionInfo,
    TenantContext, TenantDirectory, TenantId, Workspace, WorkspaceCreateRequest, WorkspaceDraft,
    WorkspaceRecord, WorkspaceRepository,
};

use crate::notify::{Notifier, WorkspaceCreated};

pub const TEAM_CREATION_MESSAGE: &str = "Failed to create workspace team";
pub const WORKSPACE_CREATION_MESSAGE: &str = "Failed to create workspace document";

pub struct Provisioner {
    auth: Authenticator,
    tenants: Arc<dyn TenantDirectory>,
    workspaces: Arc<dyn WorkspaceRepository>,
    notifier: Option<Arc<dyn Notifier>>,
    assign_owner: bool,
}

impl Provisioner {
    pub fn new(
        auth: Authenticator,
        tenants: Arc<dyn TenantDirectory>,
        workspaces: Arc<dyn WorkspaceRepository>,
    ) -> Self {
        Self {
            auth,
            tenants,
            workspaces,
            notifier: None,
            assign_owner: true,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn assign_owner(mut self, enabled: bool) -> Self {
        self.assign_owner = enabled;
        self
    }

    /// Runs one create-workspace request end to end.
    #[instrument(skip_all, name = "provision")]
    pub async fn provision(
        &self,
        headers: &InvocationHeaders,
        raw_body: &str,
    ) -> Result<Workspace, AtriumError> {
        self.auth.verify_trigger(headers)?;

        let session = self.auth.authenticate(headers).await?;
        debug!(
            user_id = %session.user_id,
            strategy = self.auth.strategy_name(),
            "session verified"
        );

        let request: WorkspaceCreateRequest = parse_body(raw_body)?;
        let draft = validate_request(&request)?;
        info!(
            user_id = %session.user_id,
            workspace = %draft.name,
            slug = %draft.slug,
            plan = %draft.plan,
            "creating workspace"
        );

        let tenant = self
            .tenants
            .create_tenant(&draft.team_name())
            .await
            .map_err(|e| {
                error!(
                    error = %format!("{e:#}"),
                    workspace = %draft.name,
                    "team creation failed"
                );
                AtriumError::team_creation_failed(TEAM_CREATION_MESSAGE).with_source(e)
            })?;
        info!(team_id = %tenant, "team created");

        let ctx = TenantContext::new(tenant.as_str());
        let workspace = self.persist(&ctx, &tenant, &draft, &session).await?;

        self.finish(&ctx, &draft, &session).await;

        info!(
            team_id = %tenant,
            workspace_id = %workspace.id,
            slug = %workspace.slug,
            "workspace created"
        );
        Ok(workspace)
    }

    /// Document write with its compensating team delete.
    async fn persist(
        &self,
        ctx: &TenantContext,
        tenant: &TenantId,
        draft: &WorkspaceDraft,
        session: &SessionInfo,
    ) -> Result<Workspace, AtriumError> {
        let record = WorkspaceRecord::new(
            draft.name.as_str(),
            draft.slug.as_str(),
            tenant,
            session.user_id.as_str(),
            draft.plan,
            draft.description.clone(),
            Utc::now(),
        );

        let written = match record.validate() {
            Ok(()) => self
                .workspaces
                .create_workspace(ctx, &record, &workspace_grants(tenant))
                .await
                .map_err(|e| {
                    AtriumError::normalize(
                        e,
                        ErrorKind::WorkspaceCreationFailed,
                        WORKSPACE_CREATION_MESSAGE,
                    )
                }),
            Err(e) => Err(e),
        };

        match written {
            Ok(document_id) => Ok(record.into_workspace(document_id)),
            Err(err) => {
                let detail = err.source.as_ref().map(|s| format!("{s:#}"));
                error!(
                    error = %err,
                    detail = ?detail,
                    team_id = %tenant,
                    "workspace document failed, rolling back team"
                );
                if let Err(rollback) = self.tenants.delete_tenant(tenant).await {
                    error!(
                        error = %format!("{rollback:#}"),
                        team_id = %tenant,
                        "team rollback failed, team is orphaned"
                    );
                } else {
                    info!(team_id = %tenant, "team rolled back");
                }
                Err(AtriumError::workspace_creation_failed(WORKSPACE_CREATION_MESSAGE)
                    .with_source(err.into_anyhow()))
            }
        }
    }

    /// Best-effort steps after the workspace exists. Never fails the request.
    async fn finish(&self, ctx: &TenantContext, draft: &WorkspaceDraft, session: &SessionInfo) {
        if self.assign_owner {
            let user_id = session.user_id.as_str();
            match self.tenants.add_owner(ctx, user_id).await {
                Ok(()) => debug!(team_id = %ctx.tenant_id, user_id, "owner membership added"),
                Err(e) => warn!(
                    error = %format!("{e:#}"),
                    team_id = %ctx.tenant_id,
                    "owner membership failed"
                ),
            }
        }

        match self
            .workspaces
            .init_workspace_collection(ctx, &draft.name, &workspace_grants(&ctx.tenant_id))
            .await
        {
            Ok(id) => debug!(
                team_id = %ctx.tenant_id,
                collection_id = %id,
                "workspace collection ready"
            ),
            Err(e) => warn!(
                error = %format!("{e:#}"),
                team_id = %ctx.tenant_id,
                "workspace collection failed"
            ),
        }

        let Some(notifier) = &self.notifier else {
            info!("welcome webhook not configured, skipping");
            return;
        };
        let event = WorkspaceCreated {
            workspace_name: draft.name.clone(),
            user_email: session.email.clone(),
            team_id: ctx.tenant_id.to_string(),
            at: Utc::now(),
        };
        match notifier.workspace_created(&event).await {
            Ok(()) => info!(team_id = %ctx.tenant_id, "welcome webhook sent"),
            Err(e) => warn!(
                error = %format!("{e:#}"),
                team_id = %ctx.tenant_id,
                "welcome webhook failed"
            ),
        }
    }
}
