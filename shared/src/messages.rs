use serde::{Deserialize, Serialize};

use crate::group::{GroupConfigReport, GroupStatus, Role};
use crate::wire::{flag, flag_as_int, null_as_default, nullable_floats};

/// Number of live charts on the dashboard.
pub const CHART_COUNT: usize = 3;
/// Series drawn on every chart.
pub const SERIES_PER_CHART: usize = 3;
/// Values in one telemetry sample (`d`), grouped 3/3/3 across the charts.
pub const SAMPLE_LEN: usize = CHART_COUNT * SERIES_PER_CHART;

/// Title and legend overrides for one chart. Missing parts leave the chart as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legends: Option<Vec<String>>,
}

/// Periodic frame broadcast by the device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pitch: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roll: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub yaw: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub battery: f64,
    #[serde(default, deserialize_with = "flag")]
    pub fallen: bool,
    /// Chart sample; only present while chart push is enabled on the device.
    /// Null entries (NaN on the device) read as 0 in place.
    #[serde(
        default,
        rename = "d",
        deserialize_with = "nullable_floats",
        skip_serializing_if = "Option::is_none"
    )]
    pub sample: Option<Vec<f64>>,
    /// Fleet status; only present while ESP-NOW is enabled on the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_status: Option<GroupStatus>,
}

/// Everything the device sends to a dashboard.
///
/// `{"type":"telemetry", ...}`, `{"type":"group_config", ...}`,
/// `{"type":"pitch_zero","value":-2.1}`, `{"type":"chart_config","charts":[...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceMsg {
    Telemetry(TelemetryFrame),
    GroupConfig(GroupConfigReport),
    PitchZero {
        #[serde(default, deserialize_with = "null_as_default")]
        value: f64,
    },
    ChartConfig {
        #[serde(default)]
        charts: Vec<ChartConfig>,
    },
}

/// Parameters of a `group_config` write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupConfigParam {
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_id: i64,
    #[serde(default, serialize_with = "flag_as_int", deserialize_with = "flag")]
    pub espnow_enabled: bool,
    /// Only meaningful (and only sent) for followers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_mac: Option<String>,
}

/// Everything a dashboard sends to the device. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleCmd {
    GetGroupConfig,
    GroupConfig { param: GroupConfigParam },
    GetPitchZero,
    PitchZeroSet { value: f64 },
}
