//! Shared wiring for the integration suites: the real registry and
//! controller, with every collaborator replaced by an in-memory mock.

#![allow(dead_code)]

use radium_core::application::{
    AdmissionController, Feedback, PromotionSweep, RuntimeSettings, TransferDispatcher,
};
use radium_core::domain::{PlayerId, QueueConfigSet, QueueRegistry, QueueSettings};
use radium_core::port::capacity::mocks::MockCapacityProbe;
use radium_core::port::messenger::mocks::RecordingMessenger;
use radium_core::port::permission::mocks::MockPermissionChecker;
use radium_core::port::priority::mocks::MockPriorityResolver;
use radium_core::port::time_provider::mocks::ManualTimeProvider;
use radium_core::port::transfer::mocks::MockTransferGateway;
use std::sync::Arc;
use std::time::Duration;

pub const TIMEOUT: Duration = Duration::from_secs(3);

pub struct Harness {
    pub controller: Arc<AdmissionController>,
    pub registry: Arc<QueueRegistry>,
    pub clock: Arc<ManualTimeProvider>,
    pub permissions: Arc<MockPermissionChecker>,
    pub priorities: Arc<MockPriorityResolver>,
    pub gateway: Arc<MockTransferGateway>,
    pub capacity: Arc<MockCapacityProbe>,
    pub messenger: Arc<RecordingMessenger>,
    pub dispatcher: TransferDispatcher,
}

impl Harness {
    pub fn new(config: QueueConfigSet) -> Self {
        let clock = Arc::new(ManualTimeProvider::new(1_000));
        let registry = Arc::new(QueueRegistry::new(clock.clone()));
        let permissions = Arc::new(MockPermissionChecker::new());
        let priorities = Arc::new(MockPriorityResolver::new());
        let gateway = Arc::new(MockTransferGateway::new_success());
        let capacity = Arc::new(MockCapacityProbe::new());
        let messenger = Arc::new(RecordingMessenger::new());

        let settings = Arc::new(RuntimeSettings::from_config(&config));
        let feedback = Feedback::new(messenger.clone(), settings);
        let dispatcher =
            TransferDispatcher::new(registry.clone(), gateway.clone(), feedback.clone(), TIMEOUT);
        let controller = Arc::new(AdmissionController::new(
            registry.clone(),
            permissions.clone(),
            priorities.clone(),
            dispatcher.clone(),
            feedback,
            TIMEOUT,
        ));
        controller.apply_config(&config);

        Self {
            controller,
            registry,
            clock,
            permissions,
            priorities,
            gateway,
            capacity,
            messenger,
            dispatcher,
        }
    }

    pub fn network() -> Self {
        Self::new(network_config())
    }

    pub fn sweep(&self) -> PromotionSweep {
        PromotionSweep::new(
            self.registry.clone(),
            self.capacity.clone(),
            self.dispatcher.clone(),
            Duration::from_secs(1),
            TIMEOUT,
        )
    }

    /// Register a player's rank and return their id
    pub fn player(&self, tier: u32) -> PlayerId {
        let id = PlayerId::new_v4();
        self.priorities.set_tier(id, tier);
        id
    }

    pub fn waiting(&self, queue: &str) -> Vec<String> {
        self.registry
            .snapshot(queue)
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.player_name)
            .collect()
    }
}

/// Owner/VIP/Member tiers; `practice` and `minigames` with no pacing
pub fn network_config() -> QueueConfigSet {
    let mut config = QueueConfigSet::default();
    config.queue.priority_levels.insert(1, "Owner".to_string());
    config.queue.priority_levels.insert(3, "VIP".to_string());
    config.queue.priority_levels.insert(9, "Member".to_string());
    for name in ["practice", "minigames"] {
        config.queues.insert(
            name.to_string(),
            QueueSettings {
                send_delay_seconds: 0,
                ..QueueSettings::default()
            },
        );
    }
    config
}

/// Poll until `condition` holds, yielding to spawned transfers
pub async fn eventually<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}
