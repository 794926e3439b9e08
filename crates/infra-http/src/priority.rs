// Rank-to-tier lookups through the proxy bridge

use crate::client::BridgeClient;
use async_trait::async_trait;
use radium_core::domain::{PlayerId, Priority};
use radium_core::port::{CollaboratorError, PriorityResolver};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PriorityResponse {
    tier: Priority,
}

/// `GET /players/{id}/priority`
pub struct HttpPriorityResolver {
    client: BridgeClient,
}

impl HttpPriorityResolver {
    pub fn new(client: BridgeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PriorityResolver for HttpPriorityResolver {
    async fn priority_tier(&self, player_id: PlayerId) -> Result<Priority, CollaboratorError> {
        let path = format!("/players/{}/priority", player_id);
        let response: PriorityResponse = self.client.get_json(&path).await?;
        Ok(response.tier)
    }
}
