//! Daemon configuration
//!
//! A TOML file (optional) layered with `RADIUM__SECTION__KEY` environment
//! variables. The queue sections are re-read on `admin.reload.v1`.

use ::config::{Config, Environment, File};
use radium_api_rpc::RpcServerConfig;
use radium_core::domain::{GlobalQueueSettings, MessageTemplates, QueueConfigSet, QueueName, QueueSettings};
use radium_core::error::{AppError, Result};
use radium_core::port::QueueConfigSource;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "radium.toml";
const ENV_PREFIX: &str = "RADIUM";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub rpc: RpcSection,
    pub bridge: BridgeSection,
    pub engine: EngineSection,
    pub logging: LoggingSection,
    pub queue: GlobalQueueSettings,
    pub queues: BTreeMap<QueueName, QueueSettings>,
    pub messages: MessageTemplates,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcSection {
    pub host: String,
    pub port: u16,
}

impl Default for RpcSection {
    fn default() -> Self {
        let defaults = RpcServerConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
        }
    }
}

/// Where the proxy/lobby bridge serves the collaborator endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeSection {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9641".to_string(),
            request_timeout_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub sweep_interval_ms: u64,
    pub collaborator_timeout_ms: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            sweep_interval_ms: 1_000,
            collaborator_timeout_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// "json" or "pretty"; `RADIUM_LOG_FORMAT` wins when set
    pub format: Option<String>,
    /// Daily rolling log files are written here when set
    pub directory: Option<PathBuf>,
}

impl DaemonConfig {
    /// Load from `path` (missing file is fine) plus the environment
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        settings
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn queue_config(&self) -> QueueConfigSet {
        QueueConfigSet {
            queue: self.queue.clone(),
            queues: self.queues.clone(),
            messages: self.messages.clone(),
        }
    }

    pub fn rpc_server(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc.host.clone(),
            port: self.rpc.port,
        }
    }
}

impl BridgeSection {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl EngineSection {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms.max(1))
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms.max(1))
    }
}

/// Re-reads the daemon's config file for the reload command
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QueueConfigSource for FileConfigSource {
    fn load(&self) -> Result<QueueConfigSet> {
        DaemonConfig::load(&self.path).map(|config| config.queue_config())
    }
}
