use anyhow::Context;
use console_shared::MacAddress;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config/device.json";

/// Bridge settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub bind_addr: String,
    /// Telemetry period in milliseconds.
    pub data_ms: u64,
    pub store_path: PathBuf,
    pub static_dir: PathBuf,
    /// Station MAC the simulated device reports as its own.
    pub my_mac: String,
    /// Followers that send heartbeats while this device leads a fleet.
    pub follower_count: usize,
    /// Include the 9-value chart sample (`d`) in telemetry frames.
    pub chart_push: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            data_ms: 50,
            store_path: PathBuf::from("./data/params.json"),
            static_dir: PathBuf::from("./frontend/dist/public"),
            my_mac: "24:6F:28:A1:B2:C3".to_string(),
            follower_count: 3,
            chart_push: true,
        }
    }
}

impl DeviceConfig {
    pub fn my_mac(&self) -> anyhow::Result<MacAddress> {
        self.my_mac.parse().context("my_mac in device config")
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(addr) = std::env::var("CONSOLE_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Ok(ms) = std::env::var("CONSOLE_DATA_MS") {
            self.data_ms = ms
                .parse()
                .with_context(|| format!("CONSOLE_DATA_MS={ms:?} is not a number"))?;
        }
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("CONSOLE_DEVICE_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Reads the config file, falling back to defaults when it does not exist,
/// then applies environment overrides.
pub fn load_config() -> anyhow::Result<DeviceConfig> {
    let mut cfg = read_config_file(&config_path())?;
    cfg.apply_env()?;
    anyhow::ensure!(cfg.data_ms > 0, "data_ms must be positive");
    cfg.my_mac()?;
    Ok(cfg)
}

fn read_config_file(path: &Path) -> anyhow::Result<DeviceConfig> {
    if !path.exists() {
        tracing::info!("no device config at {path:?}, using defaults");
        return Ok(DeviceConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read device config {path:?}"))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid device config {path:?}"))
}
