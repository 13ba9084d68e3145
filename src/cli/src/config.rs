//! Configuration for the faucet CLI.

use crate::errors::CliError;
use anyhow::Result;
use faucet_core::Deployment;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "FAUCET_CONFIG";

/// Configuration for the faucet CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// The node REST endpoint
    pub node: String,
    /// The signer service that holds the wallet keys
    pub signer: String,
    /// The account to use instead of asking the signer
    pub account: Option<String>,
    /// Name of a built-in deployment
    pub deployment: String,
    /// Path to a deployment file, takes precedence over `deployment`
    pub deployment_file: Option<PathBuf>,
    /// Seconds between balance refreshes
    pub poll_interval_secs: u64,
    /// Seconds to wait for a transaction to be committed
    pub confirmation_timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            node: "https://fullnode.testnet.aptoslabs.com".to_string(),
            signer: "http://localhost:8090".to_string(),
            account: None,
            deployment: "asset-faucet".to_string(),
            deployment_file: None,
            poll_interval_secs: 10,
            confirmation_timeout_secs: 20,
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the config path: `$FAUCET_CONFIG`, or `faucet/config.json`
    /// under the user's config directory.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push("faucet");
        dir.push("config.json");
        dir
    }

    /// Loads the deployment this config points at and validates it.
    pub fn load_deployment(&self) -> Result<Deployment, CliError> {
        let deployment = match &self.deployment_file {
            Some(path) => Deployment::from_file(path)?,
            None => Deployment::preset(&self.deployment)?,
        };
        Ok(deployment)
    }

    /// Returns the refresh interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Returns the confirmation timeout.
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs.max(1))
    }
}
