//! Concurrency Tests
//!
//! Many joins, leaves and promotions racing on a multi-threaded runtime.
//! The registry must never hold a player in two places.

mod common;

use common::{eventually, Harness};
use radium_core::application::{JoinOutcome, LeaveOutcome};
use radium_core::domain::{JoinError, PlayerId};
use radium_core::port::permission::mocks::MockBehavior;
use std::collections::HashSet;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_joins_to_two_queues_admit_once() {
    let h = Harness::network();

    for _ in 0..50 {
        let player = h.player(9);
        let a = {
            let controller = h.controller.clone();
            tokio::spawn(async move { controller.join(player, "Racer", "practice").await })
        };
        let b = {
            let controller = h.controller.clone();
            tokio::spawn(async move { controller.join(player, "Racer", "minigames").await })
        };
        let outcomes = [a.await.unwrap(), b.await.unwrap()];

        let queued = outcomes
            .iter()
            .filter(|o| matches!(o, JoinOutcome::Queued { .. }))
            .count();
        let rejected = outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    JoinOutcome::Rejected {
                        error: JoinError::AlreadyQueued { .. }
                    }
                )
            })
            .count();
        assert_eq!((queued, rejected), (1, 1), "outcomes: {:?}", outcomes);
    }

    let total = h.waiting("practice").len() + h.waiting("minigames").len();
    assert_eq!(total, 50);
    assert!(h.registry.verify_consistency().is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_leaves_remove_exactly_once() {
    let h = Harness::network();
    let player = h.player(9);
    h.controller.join(player, "Steve", "practice").await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let controller = h.controller.clone();
        handles.push(tokio::spawn(async move { controller.leave(player) }));
    }

    let mut left = 0;
    for handle in handles {
        if matches!(handle.await.unwrap(), LeaveOutcome::Left { .. }) {
            left += 1;
        }
    }
    assert_eq!(left, 1);
    assert!(h.waiting("practice").is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_join_leave_churn_keeps_index_consistent() {
    let h = Harness::network();
    h.permissions
        .set_behavior(MockBehavior::Delay(Duration::from_millis(2)));

    let players: Vec<PlayerId> = (0..40).map(|i| h.player(1 + (i % 9) as u32)).collect();
    let mut handles = Vec::new();
    for (i, player) in players.iter().copied().enumerate() {
        let controller = h.controller.clone();
        handles.push(tokio::spawn(async move {
            let queue = if i % 2 == 0 { "practice" } else { "minigames" };
            for round in 0..5 {
                controller.join(player, "Churn", queue).await;
                if round % 2 == 0 {
                    controller.leave(player);
                }
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert!(h.registry.verify_consistency().is_ok());

    // rounds 0, 2 and 4 end with a leave, so nobody is left waiting
    assert!(h.waiting("practice").is_empty());
    assert!(h.waiting("minigames").is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sweep_racing_leaves_never_duplicates_transfers() {
    let h = Harness::network();
    let players: Vec<PlayerId> = (0..60).map(|_| h.player(9)).collect();
    for player in &players {
        h.controller.join(*player, "Queued", "practice").await;
    }

    let sweep = h.sweep();
    let leaver = {
        let controller = h.controller.clone();
        let players = players.clone();
        tokio::spawn(async move {
            for player in players.iter().step_by(2) {
                controller.leave(*player);
                tokio::task::yield_now().await;
            }
        })
    };
    for _ in 0..10 {
        sweep.tick().await;
        tokio::task::yield_now().await;
    }
    leaver.await.unwrap();
    while sweep.tick().await > 0 {}

    eventually(|| h.registry.in_flight_count("practice") == 0).await;

    let transfers = h.gateway.transfers();
    let unique: HashSet<_> = transfers.iter().map(|(id, _)| *id).collect();
    assert_eq!(unique.len(), transfers.len(), "a player was sent twice");
    assert!(h.waiting("practice").is_empty());
    assert!(h.registry.verify_consistency().is_ok());
}
