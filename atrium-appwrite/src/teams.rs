use serde_json::json;

use crate::client::AppwriteClient;
use crate::error::PlatformError;
use crate::models::{Membership, Team};

/// `/teams` endpoints.
#[derive(Debug, Clone)]
pub struct Teams {
    client: AppwriteClient,
}

impl Teams {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    /// `team_id` may be [`ID::unique`](crate::ID::unique).
    pub async fn create(&self, team_id: &str, name: &str) -> Result<Team, PlatformError> {
        self.client
            .post("teams", &json!({ "teamId": team_id, "name": name }))
            .await
    }

    pub async fn delete(&self, team_id: &str) -> Result<(), PlatformError> {
        self.client.delete(&format!("teams/{team_id}")).await
    }

    /// With admin credentials the user joins immediately, no invite round trip.
    pub async fn create_membership(
        &self,
        team_id: &str,
        roles: &[String],
        user_id: &str,
    ) -> Result<Membership, PlatformError> {
        self.client
            .post(
                &format!("teams/{team_id}/memberships"),
                &json!({ "roles": roles, "userId": user_id }),
            )
            .await
    }
}
