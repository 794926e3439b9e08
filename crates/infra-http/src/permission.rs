// Permission lookups through the proxy bridge

use crate::client::BridgeClient;
use async_trait::async_trait;
use radium_core::domain::PlayerId;
use radium_core::port::{CollaboratorError, PermissionChecker};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PermissionResponse {
    granted: bool,
}

/// `GET /players/{id}/permissions/{key}`
pub struct HttpPermissionChecker {
    client: BridgeClient,
}

impl HttpPermissionChecker {
    pub fn new(client: BridgeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PermissionChecker for HttpPermissionChecker {
    async fn has_permission(
        &self,
        player_id: PlayerId,
        permission: &str,
    ) -> Result<bool, CollaboratorError> {
        let path = format!("/players/{}/permissions/{}", player_id, permission);
        let response: PermissionResponse = self.client.get_json(&path).await?;
        debug!(player = %player_id, permission = %permission, granted = response.granted, "Permission lookup");
        Ok(response.granted)
    }
}
