// Persistent device parameters: fleet settings and the pitch zero-offset.

use anyhow::Context;
use console_shared::{MacAddress, Role};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PITCH_ZERO: f64 = -2.1;

/// Fleet settings as the device keeps them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    pub role: Role,
    pub leader_mac: [u8; 6],
    pub group_id: u8,
    pub espnow_enabled: bool,
}

impl GroupSettings {
    pub fn leader_mac(&self) -> MacAddress {
        MacAddress(self.leader_mac)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceParams {
    pub group: GroupSettings,
    pub pitch_zero: f64,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            group: GroupSettings::default(),
            pitch_zero: DEFAULT_PITCH_ZERO,
        }
    }
}

/// JSON file holding [`DeviceParams`].
#[derive(Debug, Clone)]
pub struct ParamStore {
    path: PathBuf,
}

impl ParamStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means nothing was ever saved: defaults.
    pub fn load(&self) -> anyhow::Result<DeviceParams> {
        if !self.path.exists() {
            tracing::info!("[PARAMS] no saved parameters at {:?}, using defaults", self.path);
            return Ok(DeviceParams::default());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read parameters {:?}", self.path))?;
        let params: DeviceParams = serde_json::from_str(&raw)
            .with_context(|| format!("invalid parameter file {:?}", self.path))?;
        tracing::info!(
            "[PARAMS] loaded: role={} group_id={} pitch_zero={:.2}",
            params.group.role,
            params.group.group_id,
            params.pitch_zero
        );
        Ok(params)
    }

    /// Written to a sibling temp file, then renamed into place.
    pub fn save(&self, params: &DeviceParams) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create parameter dir {dir:?}"))?;
        }
        let raw = serde_json::to_string_pretty(params)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw).with_context(|| format!("failed to write {tmp:?}"))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {:?}", self.path))?;
        tracing::debug!("[PARAMS] saved to {:?}", self.path);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::scratch_path;
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let store = ParamStore::new(scratch_path("missing"));
        let params = store.load().unwrap();
        assert_eq!(params, DeviceParams::default());
        assert_eq!(params.pitch_zero, DEFAULT_PITCH_ZERO);
        assert_eq!(params.group.role, Role::Standalone);
    }

    #[test]
    fn saved_parameters_survive_reload() {
        let store = ParamStore::new(scratch_path("reload"));
        let params = DeviceParams {
            group: GroupSettings {
                role: Role::Follower,
                leader_mac: [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF],
                group_id: 7,
                espnow_enabled: true,
            },
            pitch_zero: 1.5,
        };
        store.save(&params).unwrap();

        let reloaded = ParamStore::new(store.path()).load().unwrap();
        assert_eq!(reloaded, params);
        assert_eq!(reloaded.group.leader_mac().to_string(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = scratch_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(ParamStore::new(path).load().is_err());
    }
}
