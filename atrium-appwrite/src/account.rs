use anyhow::Result;
use async_trait::async_trait;
use atrium_auth::SessionStrategy;
use atrium_core::SessionInfo;

use crate::client::AppwriteClient;
use crate::error::PlatformError;
use crate::models::User;

/// `/account` endpoints. Needs session credentials, not an API key.
#[derive(Debug, Clone)]
pub struct Account {
    client: AppwriteClient,
}

impl Account {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<User, PlatformError> {
        self.client.get("account").await
    }
}

/// Verifies a caller's session by reading their account with it.
#[derive(Debug, Clone)]
pub struct AccountSessionStrategy {
    client: AppwriteClient,
}

impl AccountSessionStrategy {
    /// `client` must carry the endpoint and project only; the session is
    /// attached per call.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionStrategy for AccountSessionStrategy {
    fn name(&self) -> &str {
        "appwrite-account"
    }

    async fn verify_session(&self, token: &str) -> Result<SessionInfo> {
        let user = Account::new(self.client.clone().with_session(token)).get().await?;

        Ok(SessionInfo {
            user_id: user.id,
            session_id: token.to_string(),
            email: user.email,
            name: user.name,
        })
    }
}
