//! Input sanitization and workspace business rules.
//!
//! Everything here is pure: no platform calls, so a request rejected here has
//! not touched any external state.

use serde::de::DeserializeOwned;

use crate::bail_atrium;
use crate::errors::AtriumError;
use crate::models::{Plan, WorkspaceCreateRequest};

/// Hard cap applied by [`sanitize`], independent of business length rules.
pub const MAX_SANITIZED_CHARS: usize = 1000;
pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 50;

/// A create request that passed every business rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceDraft {
    pub name: String,
    pub slug: String,
    pub plan: Plan,
    pub description: Option<String>,
}

impl WorkspaceDraft {
    /// Name of the tenant boundary backing this workspace.
    pub fn team_name(&self) -> String {
        format!("{} Workspace", self.name)
    }
}

/// Sanitize and validate a parsed request. Pure: no external calls.
pub fn validate_request(request: &WorkspaceCreateRequest) -> Result<WorkspaceDraft, AtriumError> {
    let name = sanitize(&request.name);
    validate_name(&name)?;
    let plan = resolve_plan(request.plan.as_deref())?;
    let description = request
        .description
        .as_deref()
        .map(sanitize)
        .filter(|d| !d.is_empty());

    Ok(WorkspaceDraft {
        slug: slugify(&name),
        name,
        plan,
        description,
    })
}

/// Parse a raw request body as JSON.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, AtriumError> {
    if body.trim().is_empty() {
        bail_atrium!(invalid_input, "request body is empty");
    }
    serde_json::from_str(body).map_err(|e| AtriumError::invalid_input(format!("invalid JSON: {e}")))
}

/// Strip NUL and other control characters, trim, cap at 1000 chars.
pub fn sanitize(input: &str) -> String {
    let cleaned: String = input.chars().filter(|c| !c.is_control()).collect();
    cleaned.trim().chars().take(MAX_SANITIZED_CHARS).collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-')
}

/// Business rules for an already sanitized workspace name.
pub fn validate_name(name: &str) -> Result<(), AtriumError> {
    if name.is_empty() {
        bail_atrium!(validation, "name", "Workspace name is required");
    }

    let len = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        bail_atrium!(
            validation,
            "name",
            format!(
                "Workspace name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
            )
        );
    }

    if !name.chars().all(is_name_char) {
        bail_atrium!(validation, "name", "Workspace name contains invalid characters");
    }

    if slugify(name).is_empty() {
        bail_atrium!(
            validation,
            "name",
            "Workspace name must contain at least one letter or digit"
        );
    }

    Ok(())
}

/// Missing or empty plan means [`Plan::Free`].
pub fn resolve_plan(plan: Option<&str>) -> Result<Plan, AtriumError> {
    match plan.map(str::trim) {
        None | Some("") => Ok(Plan::default()),
        Some(raw) => raw
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| {
                AtriumError::validation("plan", "Plan must be one of free, pro, enterprise")
            }),
    }
}

/// URL-friendly slug: lower-case, non-alphanumeric runs become one `-`,
/// no leading or trailing `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}
