// device.rs
//
// The simulated vehicle: answers dashboard commands, persists parameters and
// builds telemetry frames.

use crate::config::DeviceConfig;
use crate::sim::{BotSim, FleetSim};
use crate::store::{DeviceParams, GroupSettings, ParamStore};
use console_shared::{
    clamp_pitch_zero, ChartConfig, ChartSpec, ConsoleCmd, DeviceMsg, EspNowStatus,
    GroupConfigParam, GroupConfigReport, GroupStatus, MacAddress, Role, TelemetryFrame,
};

/// Share of heartbeats after which a simulated follower goes quiet for a while.
const FOLLOWER_DROPOUT_CHANCE: f64 = 0.02;

/// Where the answer to a command goes.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Only the client that asked.
    Direct(DeviceMsg),
    /// Every connected dashboard.
    Broadcast(DeviceMsg),
}

pub struct Device {
    my_mac: MacAddress,
    /// Fleet settings in effect since start. Saved changes apply after a restart.
    running: GroupSettings,
    params: DeviceParams,
    store: ParamStore,
    chart_push: bool,
    bot: BotSim,
    fleet: FleetSim,
}

impl Device {
    pub fn new(cfg: &DeviceConfig, store: ParamStore, params: DeviceParams) -> anyhow::Result<Self> {
        let my_mac = cfg.my_mac()?;
        Ok(Self {
            my_mac,
            running: params.group.clone(),
            params,
            store,
            chart_push: cfg.chart_push,
            bot: BotSim::new(),
            fleet: FleetSim::new(my_mac, cfg.follower_count, FOLLOWER_DROPOUT_CHANCE),
        })
    }

    pub fn pitch_zero(&self) -> f64 {
        self.params.pitch_zero
    }

    /// The peer-to-peer link comes up at start when enabled.
    fn espnow_ready(&self) -> bool {
        self.running.espnow_enabled
    }

    fn espnow_status(&self) -> EspNowStatus {
        if self.espnow_ready() {
            EspNowStatus::Ok
        } else {
            EspNowStatus::Other("error".to_string())
        }
    }

    pub fn handle(&mut self, cmd: ConsoleCmd) -> anyhow::Result<Option<Reply>> {
        match cmd {
            ConsoleCmd::GetGroupConfig => Ok(Some(Reply::Direct(DeviceMsg::GroupConfig(
                self.group_config_report(),
            )))),
            ConsoleCmd::GroupConfig { param } => {
                self.save_group_config(param)?;
                Ok(None)
            }
            ConsoleCmd::GetPitchZero => Ok(Some(Reply::Direct(DeviceMsg::PitchZero {
                value: self.params.pitch_zero,
            }))),
            ConsoleCmd::PitchZeroSet { value } => {
                let value = self.set_pitch_zero(value)?;
                Ok(Some(Reply::Broadcast(DeviceMsg::PitchZero { value })))
            }
        }
    }

    pub fn group_config_report(&self) -> GroupConfigReport {
        GroupConfigReport {
            role: self.running.role,
            my_mac: self.my_mac.to_string(),
            leader_mac: self.running.leader_mac().to_string(),
            group_id: i64::from(self.running.group_id),
            espnow_enabled: self.running.espnow_enabled,
            espnow_status: self.espnow_status(),
        }
    }

    /// Stores new fleet settings. Unparseable leader MACs keep the current one;
    /// a group id outside 0..=255 reads as 0.
    pub fn save_group_config(&mut self, param: GroupConfigParam) -> anyhow::Result<()> {
        let mut next = self.running.clone();
        next.role = param.role;
        next.group_id = u8::try_from(param.group_id).unwrap_or(0);
        next.espnow_enabled = param.espnow_enabled;

        if next.role == Role::Follower
            && let Some(raw) = param.leader_mac.as_deref().filter(|s| !s.is_empty())
        {
            match raw.parse::<MacAddress>() {
                Ok(mac) => next.leader_mac = mac.octets(),
                Err(e) => tracing::warn!("[GROUP] ignoring leader MAC: {e}"),
            }
        }

        self.params.group = next;
        self.store.save(&self.params)?;
        tracing::info!(
            "[GROUP] config updated (role={} group_id={} espnow={}), reboot required",
            self.params.group.role,
            self.params.group.group_id,
            self.params.group.espnow_enabled
        );
        Ok(())
    }

    pub fn set_pitch_zero(&mut self, value: f64) -> anyhow::Result<f64> {
        let value = clamp_pitch_zero(value);
        self.params.pitch_zero = value;
        self.store.save(&self.params)?;
        tracing::info!("[PARAMS] pitch_zero={value:.2}");
        Ok(value)
    }

    /// Chart titles and legends, sent to each dashboard when it connects.
    pub fn chart_config(&self) -> DeviceMsg {
        let charts = ChartSpec::defaults()
            .into_iter()
            .map(|spec| ChartConfig {
                title: Some(spec.title),
                legends: Some(spec.labels),
            })
            .collect();
        DeviceMsg::ChartConfig { charts }
    }

    /// Next periodic frame. `d` only while chart push is on, fleet status
    /// only while ESP-NOW is on, follower list only on a leader.
    pub fn telemetry(&mut self, now_ms: i64, dt_s: f64) -> TelemetryFrame {
        let (mut frame, sample) = self.bot.step(dt_s, self.params.pitch_zero);
        if self.chart_push {
            frame.sample = Some(sample.to_vec());
        }

        if self.running.espnow_enabled {
            let followers = if self.running.role == Role::Leader {
                self.fleet.tick(now_ms);
                Some(self.fleet.reports())
            } else {
                None
            };
            frame.group_status = Some(GroupStatus {
                followers,
                espnow_status: Some(self.espnow_status()),
            });
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::scratch_path;

    fn device_with(params: DeviceParams) -> Device {
        let cfg = DeviceConfig::default();
        let store = ParamStore::new(scratch_path("device"));
        Device::new(&cfg, store, params).unwrap()
    }

    fn leader_params() -> DeviceParams {
        DeviceParams {
            group: GroupSettings {
                role: Role::Leader,
                leader_mac: [0; 6],
                group_id: 4,
                espnow_enabled: true,
            },
            pitch_zero: -2.1,
        }
    }

    #[test]
    fn get_group_config_reports_running_settings() {
        let mut device = device_with(leader_params());
        let reply = device.handle(ConsoleCmd::GetGroupConfig).unwrap();
        let Some(Reply::Direct(DeviceMsg::GroupConfig(report))) = reply else {
            panic!("expected a direct group_config reply, got {reply:?}");
        };
        assert_eq!(report.role, Role::Leader);
        assert_eq!(report.my_mac, "24:6F:28:A1:B2:C3");
        assert_eq!(report.leader_mac, "00:00:00:00:00:00");
        assert_eq!(report.group_id, 4);
        assert!(report.espnow_enabled);
        assert_eq!(report.espnow_status, EspNowStatus::Ok);
    }

    #[test]
    fn saved_group_config_applies_after_restart() {
        let mut device = device_with(DeviceParams::default());
        let param = GroupConfigParam {
            role: Role::Follower,
            group_id: 9,
            espnow_enabled: true,
            leader_mac: Some("aa:bb:cc:dd:ee:ff".into()),
        };
        assert_eq!(device.handle(ConsoleCmd::GroupConfig { param }).unwrap(), None);

        assert_eq!(device.group_config_report().role, Role::Standalone);

        let reloaded = device.store.load().unwrap();
        assert_eq!(reloaded.group.role, Role::Follower);
        assert_eq!(reloaded.group.group_id, 9);
        assert_eq!(reloaded.group.leader_mac().to_string(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn group_id_out_of_range_reads_as_zero() {
        let mut device = device_with(DeviceParams::default());
        let param = GroupConfigParam {
            role: Role::Leader,
            group_id: 300,
            espnow_enabled: false,
            leader_mac: None,
        };
        device.save_group_config(param).unwrap();
        assert_eq!(device.params.group.group_id, 0);
    }

    #[test]
    fn leader_mac_only_taken_for_followers_that_parse() {
        let mut device = device_with(DeviceParams::default());
        device
            .save_group_config(GroupConfigParam {
                role: Role::Leader,
                group_id: 1,
                espnow_enabled: true,
                leader_mac: Some("AA:BB:CC:DD:EE:FF".into()),
            })
            .unwrap();
        assert_eq!(device.params.group.leader_mac, [0; 6]);

        device
            .save_group_config(GroupConfigParam {
                role: Role::Follower,
                group_id: 1,
                espnow_enabled: true,
                leader_mac: Some("not-a-mac".into()),
            })
            .unwrap();
        assert_eq!(device.params.group.role, Role::Follower);
        assert_eq!(device.params.group.leader_mac, [0; 6]);
    }

    #[test]
    fn pitch_zero_set_clamps_persists_and_broadcasts() {
        let mut device = device_with(DeviceParams::default());
        let reply = device
            .handle(ConsoleCmd::PitchZeroSet { value: 7.3 })
            .unwrap();
        assert_eq!(reply, Some(Reply::Broadcast(DeviceMsg::PitchZero { value: 5.0 })));
        assert_eq!(device.pitch_zero(), 5.0);
        assert_eq!(device.store.load().unwrap().pitch_zero, 5.0);

        let reply = device.handle(ConsoleCmd::GetPitchZero).unwrap();
        assert_eq!(reply, Some(Reply::Direct(DeviceMsg::PitchZero { value: 5.0 })));
    }

    #[test]
    fn telemetry_carries_sample_and_leader_status() {
        let mut device = device_with(leader_params());
        let frame = device.telemetry(50_000, 0.05);
        assert_eq!(frame.sample.as_ref().map(Vec::len), Some(9));
        let status = frame.group_status.expect("espnow enabled");
        assert_eq!(status.espnow_status, Some(EspNowStatus::Ok));
        let followers = status.followers.expect("leader reports followers");
        assert_eq!(followers.len(), DeviceConfig::default().follower_count);
        assert!(followers.iter().all(|f| f.last_seen_ms == 50_000));
    }

    #[test]
    fn standalone_telemetry_has_no_fleet_status() {
        let mut device = device_with(DeviceParams::default());
        let frame = device.telemetry(1_000, 0.05);
        assert!(frame.group_status.is_none());
    }

    #[test]
    fn follower_status_omits_follower_list() {
        let mut params = leader_params();
        params.group.role = Role::Follower;
        let mut device = device_with(params);
        let status = device.telemetry(1_000, 0.05).group_status.unwrap();
        assert!(status.followers.is_none());
        assert!(status.espnow_status.is_some());
    }

    #[test]
    fn chart_config_names_all_charts() {
        let device = device_with(DeviceParams::default());
        let DeviceMsg::ChartConfig { charts } = device.chart_config() else {
            panic!("expected chart_config");
        };
        assert_eq!(charts.len(), 3);
        assert_eq!(charts[0].title.as_deref(), Some("Angle tracking"));
        assert_eq!(charts[2].legends.as_ref().map(Vec::len), Some(3));
    }
}
