use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, WalletError};
use crate::infrastructure::{DetectOptions, DEFAULT_DETECT_TIMEOUT};

/// Default polling interval for receipts and filters
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(7000);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    pub timeout_ms: u64,
    pub must_be_metamask: bool,
    pub silent: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_DETECT_TIMEOUT.as_millis() as u64,
            must_be_metamask: false,
            silent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub poll_interval_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub detect: DetectConfig,

    #[serde(default)]
    pub rpc: RpcConfig,
}

impl WalletConfig {
    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            timeout: Duration::from_millis(self.detect.timeout_ms),
            must_be_metamask: self.detect.must_be_metamask,
            silent: self.detect.silent,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.rpc.poll_interval_ms)
    }
}

/// Load the config from its default location, falling back to defaults
pub fn load() -> WalletConfig {
    let Some(path) = config_path() else {
        return WalletConfig::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return WalletConfig::default(),
    };
    toml::from_str::<WalletConfig>(&content).unwrap_or_default()
}

/// Load the config at `path`, reporting read and parse errors
pub fn load_from(path: &Path) -> Result<WalletConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| WalletError::Config(format!("{}: {e}", path.display())))?;
    toml::from_str::<WalletConfig>(&content)
        .map_err(|e| WalletError::Config(format!("{}: {e}", path.display())))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("WALLET_CONNECTOR_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("wallet-connector").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("wallet-connector").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "wallet-connector", "wallet-connector")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
