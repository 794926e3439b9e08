//! Radium Queue Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    DisconnectResponse, JoinOutcome, JoinRequest, LeaveOutcome, PauseOutcome, PlayerRequest,
    PositionResponse, QueueCommandRequest, ReloadResponse, SendOutcome, StatusResponse,
};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Client for the queue daemon.
///
/// The proxy and lobby bridges hold one of these instead of their own
/// queue state; the daemon owns the only registry.
///
/// # Example
///
/// ```no_run
/// use radium_sdk::RadiumQueueClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RadiumQueueClient::connect("http://127.0.0.1:9640").await?;
/// let status = client.status().await?;
/// println!("{} queues", status.queues.len());
/// # Ok(())
/// # }
/// ```
pub struct RadiumQueueClient {
    client: HttpClient,
}

impl RadiumQueueClient {
    /// Connect to the daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9640`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Put a player in line (or through, with a bypass permission)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use radium_sdk::{RadiumQueueClient, JoinOutcome};
    /// # async fn example(id: uuid::Uuid) -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = RadiumQueueClient::connect("http://127.0.0.1:9640").await?;
    /// match client.join(id, "Steve", "practice").await? {
    ///     JoinOutcome::Queued { position, .. } => println!("#{}", position.position),
    ///     other => println!("{:?}", other),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn join(
        &self,
        player_id: Uuid,
        player_name: impl Into<String>,
        queue: impl Into<String>,
    ) -> Result<JoinOutcome> {
        let request = JoinRequest {
            player_id,
            player_name: player_name.into(),
            queue: queue.into(),
        };
        self.call("queue.join.v1", &request).await
    }

    pub async fn leave(&self, player_id: Uuid) -> Result<LeaveOutcome> {
        self.call("queue.leave.v1", &PlayerRequest { player_id }).await
    }

    /// Pause a queue. `actor` is the issuing player, `None` for console.
    pub async fn pause(&self, queue: impl Into<String>, actor: Option<Uuid>) -> Result<PauseOutcome> {
        let request = QueueCommandRequest {
            queue: queue.into(),
            actor,
        };
        self.call("queue.pause.v1", &request).await
    }

    pub async fn unpause(
        &self,
        queue: impl Into<String>,
        actor: Option<Uuid>,
    ) -> Result<PauseOutcome> {
        let request = QueueCommandRequest {
            queue: queue.into(),
            actor,
        };
        self.call("queue.unpause.v1", &request).await
    }

    /// Send the head of a queue now, waiting for the transfer result
    pub async fn send(&self, queue: impl Into<String>, actor: Option<Uuid>) -> Result<SendOutcome> {
        let request = QueueCommandRequest {
            queue: queue.into(),
            actor,
        };
        self.call("queue.send.v1", &request).await
    }

    pub async fn position(&self, player_id: Uuid) -> Result<PositionResponse> {
        self.call("queue.position.v1", &PlayerRequest { player_id })
            .await
    }

    /// Player went offline; removes them without messaging
    pub async fn disconnect(&self, player_id: Uuid) -> Result<DisconnectResponse> {
        self.call("player.disconnect.v1", &PlayerRequest { player_id })
            .await
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        let response: StatusResponse = self
            .client
            .request("queue.status.v1", rpc_params![])
            .await?;
        Ok(response)
    }

    /// Re-read the daemon's queue configuration
    pub async fn reload(&self) -> Result<ReloadResponse> {
        let response: ReloadResponse = self
            .client
            .request("admin.reload.v1", rpc_params![])
            .await?;
        Ok(response)
    }

    async fn call<P: Serialize, R: DeserializeOwned>(&self, method: &str, request: &P) -> Result<R> {
        let params = object_params(request)?;
        let response: R = self.client.request(method, params).await?;
        Ok(response)
    }
}

/// Requests travel as named (object) parameters
fn object_params<P: Serialize>(request: &P) -> Result<ObjectParams> {
    let mut params = ObjectParams::new();
    match serde_json::to_value(request)? {
        serde_json::Value::Object(fields) => {
            for (name, value) in fields {
                params.insert(&name, value)?;
            }
            Ok(params)
        }
        other => Err(SdkError::Other(format!(
            "request must serialize to an object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::core::traits::ToRpcParams;

    #[test]
    fn test_requests_become_named_params() {
        let id = Uuid::new_v4();
        let params = object_params(&PlayerRequest { player_id: id }).unwrap();
        let raw = params.to_rpc_params().unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(raw.get()).unwrap();
        assert_eq!(value["player_id"], id.to_string());
    }
}
