use serde::{Deserialize, Serialize};

use crate::messages::{CHART_COUNT, SERIES_PER_CHART};

pub const DEFAULT_MAX_POINTS: usize = 100;

/// Which panels a dashboard page carries and how its charts are set up.
/// Served by the device bridge at `/api/layout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub version: u32,
    pub panels: Vec<PanelKind>,
    #[serde(default)]
    pub charts: Vec<ChartSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Charts,
    Attitude,
    Fleet,
    PitchZero,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub labels: Vec<String>,
    pub axis: AxisConfig,
    #[serde(default = "default_max_points")]
    pub max_points: usize,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub min: f64,
    pub max: f64,
    pub title: String,
}

fn default_max_points() -> usize {
    DEFAULT_MAX_POINTS
}

fn default_enabled() -> bool {
    true
}

impl ChartSpec {
    fn new(title: &str, labels: [&str; SERIES_PER_CHART], min: f64, max: f64, axis: &str) -> Self {
        Self {
            title: title.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            axis: AxisConfig {
                min,
                max,
                title: axis.to_string(),
            },
            max_points: DEFAULT_MAX_POINTS,
            enabled: true,
        }
    }

    /// The stock chart set: angle tracking, torque output, speed tracking.
    pub fn defaults() -> [ChartSpec; CHART_COUNT] {
        [
            ChartSpec::new("Angle tracking", ["target", "now", "err"], -15.0, 15.0, "Angle (°)"),
            ChartSpec::new("Torque output", ["ang_duty", "spd×10", "pos×10"], -300.0, 300.0, "Torque"),
            ChartSpec::new("Speed tracking", ["spd.now", "spd.tar", "pos_err×10"], -20.0, 20.0, "Speed (rad/s)"),
        ]
    }
}

impl DashboardLayout {
    pub fn has_panel(&self, kind: PanelKind) -> bool {
        self.panels.contains(&kind)
    }

    /// Exactly one spec per chart: extra entries are dropped, missing ones
    /// fall back to the stock set.
    pub fn chart_specs(&self) -> [ChartSpec; CHART_COUNT] {
        let mut specs = ChartSpec::defaults();
        for (slot, spec) in specs.iter_mut().zip(self.charts.iter()) {
            *slot = spec.clone();
        }
        specs
    }
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            version: 1,
            panels: vec![
                PanelKind::Charts,
                PanelKind::Attitude,
                PanelKind::Fleet,
                PanelKind::PitchZero,
                PanelKind::Log,
            ],
            charts: ChartSpec::defaults().to_vec(),
        }
    }
}
