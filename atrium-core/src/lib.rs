//! atrium-core: platform-agnostic core for Atrium workspace provisioning.

pub mod config;
pub mod errors;
pub mod models;
pub mod service;
pub mod tenant;
pub mod validation;

pub use config::{AtriumConfig, AtriumConfigSnapshot};
pub use errors::{ApiError, AtriumError, ErrorKind, ErrorResponse};
pub use models::{
    format_timestamp, Plan, SessionInfo, Workspace, WorkspaceCreateRequest, WorkspaceRecord,
    WorkspaceResponse, WorkspaceStatus,
};
pub use service::{TenantDirectory, WorkspaceRepository};
pub use tenant::{workspace_grants, AccessAction, AccessGrant, TenantContext, TenantId, TenantRole};
pub use validation::{parse_body, slugify, validate_request, WorkspaceDraft};
