// Destination occupancy through the proxy bridge

use crate::client::BridgeClient;
use async_trait::async_trait;
use radium_core::port::{CapacityProbe, CollaboratorError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OnlineResponse {
    online: usize,
}

/// `GET /servers/{name}/players`
pub struct HttpCapacityProbe {
    client: BridgeClient,
}

impl HttpCapacityProbe {
    pub fn new(client: BridgeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CapacityProbe for HttpCapacityProbe {
    async fn online_players(&self, destination: &str) -> Result<usize, CollaboratorError> {
        let path = format!("/servers/{}/players", destination);
        let response: OnlineResponse = self.client.get_json(&path).await?;
        Ok(response.online)
    }
}
