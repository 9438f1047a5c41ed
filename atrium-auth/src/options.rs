// Authentication options.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TRIGGER_HEADER: &str = "x-appwrite-trigger";
pub const DEFAULT_SESSION_HEADER: &str = "x-appwrite-session";

/// Which invocation headers carry trigger proof and the caller's session.
/// Names are lower-case; lookups through `InvocationHeaders` ignore case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthOptions {
    /// Header the function runtime sets on every invocation
    pub trigger_header: String,
    /// Header carrying the caller's session token
    pub session_header: String,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            trigger_header: DEFAULT_TRIGGER_HEADER.to_string(),
            session_header: DEFAULT_SESSION_HEADER.to_string(),
        }
    }
}
