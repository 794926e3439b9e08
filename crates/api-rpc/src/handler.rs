//! RPC Method Handlers
//!
//! Thin adapters from JSON-RPC parameters onto the admission controller.

use crate::error::to_rpc_error;
use crate::types::{
    DisconnectResponse, JoinRequest, PlayerRequest, PositionResponse, QueueCommandRequest,
    ReloadResponse, StatusResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use radium_core::application::{
    Actor, AdmissionController, JoinOutcome, LeaveOutcome, PauseOutcome, SendOutcome,
};
use radium_core::error::AppError;
use radium_core::port::QueueConfigSource;
use std::sync::Arc;
use tracing::info;

/// Longest player name the proxy can produce
const MAX_PLAYER_NAME_LEN: usize = 16;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    controller: Arc<AdmissionController>,
    config_source: Arc<dyn QueueConfigSource>,
}

impl RpcHandler {
    pub fn new(
        controller: Arc<AdmissionController>,
        config_source: Arc<dyn QueueConfigSource>,
    ) -> Self {
        Self {
            controller,
            config_source,
        }
    }

    /// queue.join.v1
    pub async fn join(&self, params: JoinRequest) -> Result<JoinOutcome, ErrorObjectOwned> {
        let name = params.player_name.trim();
        if name.is_empty() || name.len() > MAX_PLAYER_NAME_LEN {
            return Err(to_rpc_error(AppError::Validation(format!(
                "player_name must be 1-{} characters",
                MAX_PLAYER_NAME_LEN
            ))));
        }
        if params.queue.trim().is_empty() {
            return Err(to_rpc_error(AppError::Validation(
                "queue must not be empty".to_string(),
            )));
        }

        Ok(self
            .controller
            .join(params.player_id, name, params.queue.trim())
            .await)
    }

    /// queue.leave.v1
    pub fn leave(&self, params: PlayerRequest) -> LeaveOutcome {
        self.controller.leave(params.player_id)
    }

    /// queue.pause.v1
    pub async fn pause(&self, params: QueueCommandRequest) -> Result<PauseOutcome, ErrorObjectOwned> {
        self.controller
            .pause(actor(&params), &params.queue)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.unpause.v1
    pub async fn unpause(
        &self,
        params: QueueCommandRequest,
    ) -> Result<PauseOutcome, ErrorObjectOwned> {
        self.controller
            .unpause(actor(&params), &params.queue)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.send.v1
    pub async fn send(&self, params: QueueCommandRequest) -> Result<SendOutcome, ErrorObjectOwned> {
        self.controller
            .send_next(actor(&params), &params.queue)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.position.v1
    pub fn position(&self, params: PlayerRequest) -> PositionResponse {
        match self.controller.position(params.player_id) {
            Some((queue, position)) => PositionResponse {
                player_id: params.player_id,
                queue: Some(queue),
                position: Some(position.position),
                total: Some(position.total),
            },
            None => PositionResponse {
                player_id: params.player_id,
                queue: None,
                position: None,
                total: None,
            },
        }
    }

    /// queue.status.v1
    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            queues: self
                .controller
                .statuses()
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    /// player.disconnect.v1
    pub fn disconnect(&self, params: PlayerRequest) -> DisconnectResponse {
        DisconnectResponse {
            player_id: params.player_id,
            removed: self.controller.disconnect(params.player_id),
        }
    }

    /// admin.reload.v1
    pub async fn reload(&self) -> Result<ReloadResponse, ErrorObjectOwned> {
        let source = Arc::clone(&self.config_source);
        let config = tokio::task::spawn_blocking(move || source.load())
            .await
            .map_err(|e| to_rpc_error(AppError::Internal(e.to_string())))?
            .map_err(to_rpc_error)?;

        let report = self.controller.apply_config(&config);
        info!(
            loaded = report.loaded.len(),
            dropped = report.dropped.len(),
            evicted = report.evicted.len(),
            "Configuration reloaded"
        );
        Ok(report.into())
    }
}

fn actor(params: &QueueCommandRequest) -> Actor {
    params.actor.map(Actor::Player).unwrap_or(Actor::Console)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use radium_core::application::{Feedback, RuntimeSettings, TransferDispatcher};
    use radium_core::domain::{PlayerId, QueueConfigSet, QueueRegistry, QueueSettings};
    use radium_core::port::config_source::mocks::StaticConfigSource;
    use radium_core::port::messenger::mocks::RecordingMessenger;
    use radium_core::port::permission::mocks::MockPermissionChecker;
    use radium_core::port::priority::mocks::MockPriorityResolver;
    use radium_core::port::time_provider::SystemTimeProvider;
    use radium_core::port::transfer::mocks::MockTransferGateway;
    use std::time::Duration;

    fn config(queues: &[&str]) -> QueueConfigSet {
        let mut config = QueueConfigSet::default();
        for name in queues {
            config
                .queues
                .insert(name.to_string(), QueueSettings::default());
        }
        config
    }

    fn handler() -> (RpcHandler, Arc<StaticConfigSource>) {
        let registry = Arc::new(QueueRegistry::new(Arc::new(SystemTimeProvider)));
        let settings = Arc::new(RuntimeSettings::default());
        let feedback = Feedback::new(Arc::new(RecordingMessenger::new()), settings);
        let timeout = Duration::from_secs(1);
        let dispatcher = TransferDispatcher::new(
            registry.clone(),
            Arc::new(MockTransferGateway::new_success()),
            feedback.clone(),
            timeout,
        );
        let controller = Arc::new(AdmissionController::new(
            registry,
            Arc::new(MockPermissionChecker::new()),
            Arc::new(MockPriorityResolver::with_fallback(5)),
            dispatcher,
            feedback,
            timeout,
        ));
        controller.apply_config(&config(&["practice"]));

        let source = Arc::new(StaticConfigSource::new(config(&["practice"])));
        (RpcHandler::new(controller, source.clone()), source)
    }

    #[tokio::test]
    async fn test_join_then_position() {
        let (handler, _) = handler();
        let player = PlayerId::new_v4();

        let outcome = handler
            .join(JoinRequest {
                player_id: player,
                player_name: "Steve".to_string(),
                queue: "practice".to_string(),
            })
            .await
            .unwrap();
        assert!(matches!(outcome, JoinOutcome::Queued { .. }));

        let position = handler.position(PlayerRequest { player_id: player });
        assert_eq!(position.queue.as_deref(), Some("practice"));
        assert_eq!(position.position, Some(1));
    }

    #[tokio::test]
    async fn test_join_validates_name() {
        let (handler, _) = handler();
        let err = handler
            .join(JoinRequest {
                player_id: PlayerId::new_v4(),
                player_name: "   ".to_string(),
                queue: "practice".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);
    }

    #[tokio::test]
    async fn test_pause_unknown_queue_is_not_found() {
        let (handler, _) = handler();
        let err = handler
            .pause(QueueCommandRequest {
                queue: "nowhere".to_string(),
                actor: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_player_actor_without_admin_is_forbidden() {
        let (handler, _) = handler();
        let err = handler
            .send(QueueCommandRequest {
                queue: "practice".to_string(),
                actor: Some(PlayerId::new_v4()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_reload_reads_source() {
        let (handler, source) = handler();
        source.replace(config(&["practice", "minigames"]));

        let response = handler.reload().await.unwrap();

        assert_eq!(response.loaded.len(), 2);
        let names: Vec<_> = handler.status().queues.into_iter().map(|q| q.name).collect();
        assert_eq!(names, vec!["minigames".to_string(), "practice".to_string()]);
    }

    #[tokio::test]
    async fn test_disconnect_reports_removal() {
        let (handler, _) = handler();
        let player = PlayerId::new_v4();
        assert!(!handler.disconnect(PlayerRequest { player_id: player }).removed);
    }
}
