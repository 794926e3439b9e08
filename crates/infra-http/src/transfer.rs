// Server transfers through the proxy bridge

use crate::client::BridgeClient;
use async_trait::async_trait;
use radium_core::domain::PlayerId;
use radium_core::port::{TransferGateway, TransferOutcome};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    server: &'a str,
}

#[derive(Debug, Deserialize)]
struct TransferResponse {
    success: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// `POST /players/{id}/transfer`
pub struct HttpTransferGateway {
    client: BridgeClient,
}

impl HttpTransferGateway {
    pub fn new(client: BridgeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransferGateway for HttpTransferGateway {
    async fn transfer(&self, player_id: PlayerId, destination: &str) -> TransferOutcome {
        let path = format!("/players/{}/transfer", player_id);
        let request = TransferRequest {
            server: destination,
        };

        match self
            .client
            .post_json::<_, TransferResponse>(&path, &request)
            .await
        {
            Ok(response) if response.success => TransferOutcome::Success,
            Ok(response) => TransferOutcome::Failure(
                response
                    .reason
                    .unwrap_or_else(|| "transfer refused".to_string()),
            ),
            Err(e) => {
                warn!(player = %player_id, server = %destination, error = %e, "Transfer request failed");
                TransferOutcome::Failure(e.to_string())
            }
        }
    }
}
