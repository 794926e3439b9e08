//! RPC Round Trip
//!
//! The SDK against a live JSON-RPC server, the way the proxy bridge talks
//! to the daemon.

mod common;

use common::{network_config, Harness};
use radium_api_rpc::{RpcServer, RpcServerConfig, ServerHandle};
use radium_core::domain::QueueSettings;
use radium_core::port::config_source::mocks::StaticConfigSource;
use radium_sdk::{
    JoinOutcome, JoinRejection, LeaveOutcome, PauseOutcome, RadiumQueueClient, SendOutcome,
    TransferResolution,
};
use std::sync::Arc;
use uuid::Uuid;

const NOT_FOUND: i32 = 4001;
const FORBIDDEN: i32 = 4004;
const VALIDATION_ERROR: i32 = 4000;

async fn serve(h: &Harness) -> (RadiumQueueClient, Arc<StaticConfigSource>, ServerHandle) {
    let source = Arc::new(StaticConfigSource::new(network_config()));
    let server = RpcServer::new(
        RpcServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        h.controller.clone(),
        source.clone(),
    );
    let (addr, handle) = server.start().await.unwrap();
    let client = RadiumQueueClient::connect(format!("http://{}", addr))
        .await
        .unwrap();
    (client, source, handle)
}

#[tokio::test]
async fn test_join_position_leave_over_rpc() {
    let h = Harness::network();
    let (client, _, handle) = serve(&h).await;
    let vip = h.player(3);
    let owner = h.player(1);

    client.join(vip, "Vip", "practice").await.unwrap();
    let outcome = client.join(owner, "Owner", "practice").await.unwrap();
    match outcome {
        JoinOutcome::Queued {
            tier_label,
            position,
            ..
        } => {
            assert_eq!(tier_label, "Owner");
            assert_eq!(position.position, 1);
            assert_eq!(position.total, 2);
        }
        other => panic!("expected queued, got {:?}", other),
    }

    let position = client.position(vip).await.unwrap();
    assert_eq!(position.queue.as_deref(), Some("practice"));
    assert_eq!(position.position, Some(2));

    let again = client.join(vip, "Vip", "minigames").await.unwrap();
    assert_eq!(
        again,
        JoinOutcome::Rejected {
            error: JoinRejection::AlreadyQueued {
                queue: "practice".to_string()
            }
        }
    );

    assert_eq!(
        client.leave(vip).await.unwrap(),
        LeaveOutcome::Left {
            queue: "practice".to_string()
        }
    );
    assert_eq!(client.leave(vip).await.unwrap(), LeaveOutcome::NotQueued);
    assert!(client.position(vip).await.unwrap().queue.is_none());

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_admin_commands_over_rpc() {
    let h = Harness::network();
    let (client, source, handle) = serve(&h).await;
    let player = h.player(9);

    let paused = client.pause("practice", None).await.unwrap();
    assert!(matches!(paused, PauseOutcome::Paused { .. }));
    let joined = client.join(player, "Steve", "practice").await.unwrap();
    assert!(matches!(
        joined,
        JoinOutcome::Rejected {
            error: JoinRejection::QueuePaused { .. }
        }
    ));
    client.unpause("practice", None).await.unwrap();

    client.join(player, "Steve", "practice").await.unwrap();
    let sent = client.send("practice", None).await.unwrap();
    assert!(matches!(
        sent,
        SendOutcome::Sent {
            resolution: TransferResolution::Transferred,
            ..
        }
    ));

    let mut config = network_config();
    config
        .queues
        .insert("bedwars".to_string(), QueueSettings::default());
    source.replace(config);
    let reloaded = client.reload().await.unwrap();
    assert_eq!(reloaded.loaded.len(), 3);

    let status = client.status().await.unwrap();
    let names: Vec<_> = status.queues.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, vec!["bedwars", "minigames", "practice"]);

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_rpc_error_codes() {
    let h = Harness::network();
    let (client, _, handle) = serve(&h).await;

    let err = client.pause("nowhere", None).await.unwrap_err();
    assert_eq!(err.code(), Some(NOT_FOUND));

    let err = client
        .send("practice", Some(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(FORBIDDEN));

    let err = client
        .join(Uuid::new_v4(), "", "practice")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(VALIDATION_ERROR));

    handle.stop().unwrap();
}
