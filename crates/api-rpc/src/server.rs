//! JSON-RPC Server
//!
//! Serves the queue command surface over HTTP (TCP).

use crate::handler::RpcHandler;
use crate::types::{JoinRequest, PlayerRequest, QueueCommandRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use radium_core::application::AdmissionController;
use radium_core::port::QueueConfigSource;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9640;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        controller: Arc<AdmissionController>,
        config_source: Arc<dyn QueueConfigSource>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(controller, config_source)),
        }
    }

    /// Build the method table
    pub fn module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("queue.join.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: JoinRequest = params.parse()?;
                    handler.join(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_method("queue.leave.v1", move |params, _, _| {
                let req: PlayerRequest = params.parse()?;
                Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.leave(req))
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.pause.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueCommandRequest = params.parse()?;
                    handler.pause(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.unpause.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueCommandRequest = params.parse()?;
                    handler.unpause(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.send.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueCommandRequest = params.parse()?;
                    handler.send(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_method("queue.position.v1", move |params, _, _| {
                let req: PlayerRequest = params.parse()?;
                Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.position(req))
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_method("queue.status.v1", move |_, _, _| {
                Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.status())
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_method("player.disconnect.v1", move |params, _, _| {
                let req: PlayerRequest = params.parse()?;
                Ok::<_, jsonrpsee::types::ErrorObjectOwned>(handler.disconnect(req))
            })
            .map_err(|e| e.to_string())?;

        // Admin APIs
        let handler = self.handler.clone();
        module
            .register_async_method("admin.reload.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.reload().await }
            })
            .map_err(|e| e.to_string())?;

        Ok(module)
    }

    /// Start the JSON-RPC server; returns the bound address and a stop handle
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let module = self.module()?;
        info!(addr = %local_addr, "JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok((local_addr, handle))
    }
}
