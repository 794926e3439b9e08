//! Queue Scenarios
//!
//! End-to-end behaviour of the admission controller, registry and
//! promotion sweep wired together with mock collaborators.

mod common;

use common::{eventually, network_config, Harness};
use radium_core::application::constants::BYPASS_PERMISSION;
use radium_core::application::{
    Actor, JoinOutcome, LeaveOutcome, PauseOutcome, SendOutcome, TransferResolution,
};
use radium_core::domain::{JoinError, Position, QueueSettings};
use radium_core::port::transfer::mocks::MockBehavior;

/// A (VIP) joins first, then B and C (Owner): the line reads B, C, A
#[tokio::test]
async fn test_priority_then_join_time_ordering() {
    let h = Harness::network();
    let a = h.player(3);
    let b = h.player(1);
    let c = h.player(1);

    h.controller.join(a, "A", "practice").await;
    h.clock.advance(10);
    h.controller.join(b, "B", "practice").await;
    h.clock.advance(10);
    h.controller.join(c, "C", "practice").await;

    assert_eq!(h.waiting("practice"), vec!["B", "C", "A"]);
    assert_eq!(
        h.registry.position_of(&a),
        Some(Position {
            position: 3,
            total: 3
        })
    );
    assert!(h.registry.verify_consistency().is_ok());
}

#[tokio::test]
async fn test_same_tier_keeps_arrival_order_within_one_millisecond() {
    let h = Harness::network();
    for name in ["first", "second", "third"] {
        let id = h.player(9);
        h.controller.join(id, name, "practice").await;
    }
    assert_eq!(h.waiting("practice"), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_player_is_in_at_most_one_queue() {
    let h = Harness::network();
    let player = h.player(9);

    let first = h.controller.join(player, "Steve", "practice").await;
    assert!(matches!(first, JoinOutcome::Queued { .. }));

    let second = h.controller.join(player, "Steve", "minigames").await;
    assert_eq!(
        second,
        JoinOutcome::Rejected {
            error: JoinError::AlreadyQueued {
                queue: "practice".to_string()
            }
        }
    );
    assert!(h.waiting("minigames").is_empty());
    assert_eq!(h.registry.current_queue_of(&player).as_deref(), Some("practice"));
}

#[tokio::test]
async fn test_disabled_queue_is_not_joinable() {
    let mut config = network_config();
    config.queues.insert(
        "survival".to_string(),
        QueueSettings {
            enabled: false,
            ..QueueSettings::default()
        },
    );
    let h = Harness::new(config);
    let player = h.player(9);

    let outcome = h.controller.join(player, "Steve", "survival").await;

    assert_eq!(
        outcome,
        JoinOutcome::Rejected {
            error: JoinError::QueueNotFound {
                queue: "survival".to_string()
            }
        }
    );
    assert!(h.messenger.last_for(player).is_some());
}

#[tokio::test]
async fn test_leave_is_idempotent() {
    let h = Harness::network();
    let player = h.player(9);
    h.controller.join(player, "Steve", "practice").await;

    assert_eq!(
        h.controller.leave(player),
        LeaveOutcome::Left {
            queue: "practice".to_string()
        }
    );
    assert_eq!(h.controller.leave(player), LeaveOutcome::NotQueued);
    assert!(!h.controller.disconnect(player));
    assert!(h.waiting("practice").is_empty());
}

#[tokio::test]
async fn test_pause_twice_and_unpause_twice() {
    let h = Harness::network();

    let paused = h.controller.pause(Actor::Console, "practice").await.unwrap();
    let again = h.controller.pause(Actor::Console, "practice").await.unwrap();
    assert!(matches!(paused, PauseOutcome::Paused { .. }));
    assert!(matches!(again, PauseOutcome::AlreadyPaused { .. }));

    let unpaused = h.controller.unpause(Actor::Console, "practice").await.unwrap();
    let again = h.controller.unpause(Actor::Console, "practice").await.unwrap();
    assert!(matches!(unpaused, PauseOutcome::Unpaused { .. }));
    assert!(matches!(again, PauseOutcome::AlreadyUnpaused { .. }));
}

#[tokio::test]
async fn test_paused_queue_holds_line_and_refuses_joins() {
    let h = Harness::network();
    let waiting = h.player(9);
    h.controller.join(waiting, "Alex", "practice").await;
    h.controller.pause(Actor::Console, "practice").await.unwrap();

    let late = h.player(1);
    let outcome = h.controller.join(late, "Late", "practice").await;
    assert_eq!(
        outcome,
        JoinOutcome::Rejected {
            error: JoinError::QueuePaused {
                queue: "practice".to_string()
            }
        }
    );

    let sweep = h.sweep();
    assert_eq!(sweep.tick().await, 0);
    assert_eq!(h.waiting("practice"), vec!["Alex"]);
    assert_eq!(h.gateway.call_count(), 0);

    h.controller.unpause(Actor::Console, "practice").await.unwrap();
    assert_eq!(sweep.tick().await, 1);
    eventually(|| h.gateway.call_count() == 1).await;
    assert_eq!(h.gateway.transfers()[0], (waiting, "practice".to_string()));
}

#[tokio::test]
async fn test_bypass_sends_without_queueing() {
    let h = Harness::network();
    let staff = h.player(1);
    h.permissions.grant(staff, BYPASS_PERMISSION);

    let outcome = h.controller.join(staff, "Staff", "practice").await;

    assert_eq!(
        outcome,
        JoinOutcome::Bypassed {
            queue: "practice".to_string()
        }
    );
    assert!(h.waiting("practice").is_empty());
    eventually(|| h.gateway.call_count() == 1).await;
    eventually(|| h.registry.current_queue_of(&staff).is_none()).await;
}

#[tokio::test]
async fn test_failed_transfer_requeues_in_same_tier() {
    let h = Harness::network();
    let unlucky = h.player(1);
    let owner = h.player(1);
    let member = h.player(9);
    h.gateway
        .set_player_behavior(unlucky, MockBehavior::Fail("server full".to_string()));

    h.controller.join(unlucky, "Unlucky", "practice").await;
    h.clock.advance(10);
    h.controller.join(owner, "Owner", "practice").await;
    h.clock.advance(10);
    h.controller.join(member, "Member", "practice").await;
    h.clock.advance(100);

    let outcome = h.controller.send_next(Actor::Console, "practice").await.unwrap();

    let SendOutcome::Sent {
        player_id,
        resolution,
        ..
    } = outcome
    else {
        panic!("expected a send, got {:?}", outcome);
    };
    assert_eq!(player_id, unlucky);
    assert_eq!(
        resolution,
        TransferResolution::Requeued {
            position: Position {
                position: 2,
                total: 3
            }
        }
    );
    // fresh timestamp behind the other Owner, still ahead of Members
    assert_eq!(h.waiting("practice"), vec!["Owner", "Unlucky", "Member"]);
    assert_eq!(h.registry.in_flight_count("practice"), 0);
    assert!(h.registry.verify_consistency().is_ok());
}

#[tokio::test]
async fn test_leave_during_transfer_cancels_requeue() {
    let h = Harness::network();
    let player = h.player(9);
    h.gateway.set_behavior(MockBehavior::Fail("offline".to_string()));
    h.controller.join(player, "Steve", "practice").await;

    // in flight: the player counts as occupied until the transfer resolves
    let transfer = h.registry.take_for_transfer("practice").unwrap();
    let other = h.controller.join(player, "Steve", "minigames").await;
    assert!(matches!(other, JoinOutcome::Rejected { .. }));

    assert!(matches!(h.controller.leave(player), LeaveOutcome::Left { .. }));
    let resolution = h.dispatcher.run(transfer).await;

    assert_eq!(resolution, TransferResolution::Cancelled);
    assert!(h.waiting("practice").is_empty());
    assert!(h.registry.current_queue_of(&player).is_none());
}

#[tokio::test]
async fn test_capacity_gates_the_sweep() {
    let mut config = network_config();
    config.queues.insert(
        "practice".to_string(),
        QueueSettings {
            max_players: 2,
            send_delay_seconds: 0,
            ..QueueSettings::default()
        },
    );
    let h = Harness::new(config);
    h.capacity.set_online("practice", 2);
    for name in ["A", "B"] {
        let id = h.player(9);
        h.controller.join(id, name, "practice").await;
    }

    let sweep = h.sweep();
    assert_eq!(sweep.tick().await, 0);

    h.capacity.set_online("practice", 1);
    assert_eq!(sweep.tick().await, 1);
    assert_eq!(h.waiting("practice"), vec!["B"]);
}

#[tokio::test]
async fn test_reload_evicts_players_of_dropped_queue() {
    let h = Harness::network();
    let stays = h.player(9);
    let evicted = h.player(9);
    h.controller.join(stays, "Stays", "practice").await;
    h.controller.join(evicted, "Evicted", "minigames").await;
    h.controller.pause(Actor::Console, "practice").await.unwrap();
    let before = h.messenger.messages_for(evicted).len();

    let mut config = network_config();
    config.queues.remove("minigames");
    let report = h.controller.apply_config(&config);

    assert_eq!(report.dropped, vec!["minigames".to_string()]);
    assert_eq!(report.evicted.len(), 1);
    assert!(h.registry.current_queue_of(&evicted).is_none());
    assert_eq!(h.messenger.messages_for(evicted).len(), before + 1);

    // surviving queue keeps its line and its paused flag
    assert_eq!(h.waiting("practice"), vec!["Stays"]);
    assert!(h.registry.definition("practice").unwrap().paused);
}

#[tokio::test]
async fn test_manual_send_on_empty_queue() {
    let h = Harness::network();
    let outcome = h.controller.send_next(Actor::Console, "practice").await.unwrap();
    assert_eq!(
        outcome,
        SendOutcome::Empty {
            queue: "practice".to_string()
        }
    );
    assert!(h.controller.send_next(Actor::Console, "nowhere").await.is_err());
}
