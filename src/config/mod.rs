use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::crm::PersistPolicy;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Allow cross-origin requests from any origin (browser front-ends on another port)
    #[serde(default)]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_port: default_api_port(),
            cors_permissive: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Seed sample clients, interactions, follow-ups and notes at startup
    #[serde(default = "default_true")]
    pub seed_fixtures: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seed_fixtures: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory holding one JSON snapshot per workspace collection
    #[serde(default = "default_workspace_dir")]
    pub dir: PathBuf,
    /// Write emptied collections as `[]`. When false, an emptied collection
    /// is left at its last non-empty snapshot.
    #[serde(default = "default_true")]
    pub persist_empty_collections: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            dir: default_workspace_dir(),
            persist_empty_collections: true,
        }
    }
}

impl WorkspaceConfig {
    pub fn persist_policy(&self) -> PersistPolicy {
        PersistPolicy::from_persist_empty(self.persist_empty_collections)
    }
}

fn default_workspace_dir() -> PathBuf {
    PathBuf::from("./data/workspace")
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&content)?
        } else {
            info!("No config file found, using defaults");
            Config::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse configuration file")
    }

    /// Apply CONNECTSPHERE_* environment variables on top of the file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("CONNECTSPHERE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CONNECTSPHERE_PORT") {
            self.server.api_port = port
                .parse()
                .with_context(|| format!("Invalid CONNECTSPHERE_PORT: {}", port))?;
        }
        if let Ok(dir) = std::env::var("CONNECTSPHERE_WORKSPACE_DIR") {
            self.workspace.dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Sanity-check values that deserialize fine but cannot work at runtime.
    /// Returns every problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.server.host.trim().is_empty() {
            problems.push("server.host must not be empty".to_string());
        }
        if self.server.api_port == 0 {
            problems.push("server.api_port must be between 1 and 65535".to_string());
        }
        if self.workspace.dir.as_os_str().is_empty() {
            problems.push("workspace.dir must not be empty".to_string());
        }
        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            problems.push(format!("logging.level '{}' is not a valid filter", self.logging.level));
        }

        problems
    }

    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.api_port)
    }
}
