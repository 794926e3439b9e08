//! Radium Queue Daemon - Main Entry Point
//!
//! Owns the only queue registry on the network; proxy and lobby bridges
//! talk to it over JSON-RPC.

mod config;
mod logging;

use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::{DaemonConfig, FileConfigSource, DEFAULT_CONFIG_PATH};
use radium_api_rpc::RpcServer;
use radium_core::application::{
    shutdown_channel, AdmissionController, Feedback, PositionNotifier, PromotionSweep,
    RuntimeSettings, TransferDispatcher,
};
use radium_core::domain::QueueRegistry;
use radium_core::port::time_provider::SystemTimeProvider;
use radium_infra_http::{
    BridgeClient, HttpCapacityProbe, HttpMessenger, HttpPermissionChecker, HttpPriorityResolver,
    HttpTransferGateway,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config_path =
        std::env::var("RADIUM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = DaemonConfig::load(&config_path)?;

    // 2. Initialize logging
    let _log_guard = logging::init(&config.logging)?;
    info!("Radium queue daemon v{} starting...", VERSION);
    info!(config = %config_path, bridge = %config.bridge.base_url, "Configuration loaded");

    // 3. Setup dependencies (DI wiring)
    let collaborator_timeout = config.engine.collaborator_timeout();
    let bridge = BridgeClient::new(&config.bridge.base_url, config.bridge.request_timeout())?;

    let registry = Arc::new(QueueRegistry::new(Arc::new(SystemTimeProvider)));
    let queue_config = config.queue_config();
    let settings = Arc::new(RuntimeSettings::from_config(&queue_config));
    let feedback = Feedback::new(Arc::new(HttpMessenger::new(bridge.clone())), settings);

    let dispatcher = TransferDispatcher::new(
        registry.clone(),
        Arc::new(HttpTransferGateway::new(bridge.clone())),
        feedback.clone(),
        collaborator_timeout,
    );
    let controller = Arc::new(AdmissionController::new(
        registry.clone(),
        Arc::new(HttpPermissionChecker::new(bridge.clone())),
        Arc::new(HttpPriorityResolver::new(bridge.clone())),
        dispatcher.clone(),
        feedback.clone(),
        collaborator_timeout,
    ));

    // 4. Load queues
    let report = controller.apply_config(&queue_config);
    for rejected in &report.rejected {
        warn!(reason = %rejected, "Queue definition rejected");
    }
    info!(queues = ?report.loaded, "Queues loaded");

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_server = RpcServer::new(
        config.rpc_server(),
        controller.clone(),
        Arc::new(FileConfigSource::new(&config_path)),
    );
    let (rpc_addr, rpc_handle) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow!("RPC server start failed: {}", e))?;

    // 6. Start background tasks
    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let sweep = PromotionSweep::new(
        registry.clone(),
        Arc::new(HttpCapacityProbe::new(bridge)),
        dispatcher,
        config.engine.sweep_interval(),
        collaborator_timeout,
    );
    let sweep_token = shutdown_rx.clone();
    let sweep_handle = tokio::spawn(async move {
        if let Err(e) = sweep.run(sweep_token).await {
            error!(error = ?e, "Promotion sweep failed");
        }
    });

    let notifier = PositionNotifier::new(registry, feedback);
    let notifier_handle = tokio::spawn(async move {
        if let Err(e) = notifier.run(shutdown_rx).await {
            error!(error = ?e, "Position notifier failed");
        }
    });

    info!(addr = %rpc_addr, "System ready. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow!("RPC server stop failed: {}", e))?;
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        let _ = tokio::join!(sweep_handle, notifier_handle);
    })
    .await;
    if drained.is_err() {
        warn!("Background tasks did not stop in time");
    }

    info!("Shutdown complete.");
    Ok(())
}
