// frontend/src/telemetry_dashboard/console.rs
//
// Application state: every controller the dashboard runs, plus routing of
// inbound device messages to them.

use console_shared::{ConsoleCmd, DashboardLayout, DeviceMsg, PanelKind, TelemetryFrame};

use super::chart_feed::{ChartEngine, ChartFeed};
use super::fleet::{FleetConfigurator, SaveError, SaveNotice};
use super::log_book::LogBook;
use super::pitch_zero::PitchZeroCalibrator;
use super::transport::{LogSink, Transport};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("undecodable device frame: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Latest vehicle attitude from telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attitude {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
    pub battery: f64,
    pub fallen: bool,
}

impl From<&TelemetryFrame> for Attitude {
    fn from(frame: &TelemetryFrame) -> Self {
        Self {
            pitch: frame.pitch,
            roll: frame.roll,
            yaw: frame.yaw,
            battery: frame.battery,
            fallen: frame.fallen,
        }
    }
}

pub struct Console {
    pub layout: DashboardLayout,
    pub charts: Option<ChartFeed>,
    pub fleet: Option<FleetConfigurator>,
    pub pitch_zero: Option<PitchZeroCalibrator>,
    pub attitude: Option<Attitude>,
    pub log: LogBook,
}

impl Console {
    /// Builds the controllers the layout asks for. Each one that needs the
    /// device's current values requests them through `tx`.
    pub fn initialize(
        layout: DashboardLayout,
        engine: &mut dyn ChartEngine,
        tx: &dyn Transport,
    ) -> Self {
        let mut log = LogBook::new();

        let charts = if layout.has_panel(PanelKind::Charts) {
            Some(ChartFeed::initialize(layout.chart_specs(), engine, &mut log))
        } else {
            tracing::warn!("[CHART] no chart panel in layout, chart feed disabled");
            None
        };
        let fleet = FleetConfigurator::initialize(&layout, tx);
        let pitch_zero = PitchZeroCalibrator::initialize(&layout, tx);

        Self {
            layout,
            charts,
            fleet,
            pitch_zero,
            attitude: None,
            log,
        }
    }

    /// Called after a (re)connect: the device may have changed while we were away.
    pub fn on_connected(&mut self, tx: &dyn Transport) {
        self.log.append_log("[WS] connected".to_string());
        if let Some(fleet) = &self.fleet {
            fleet.request_configuration(tx);
        }
        if self.pitch_zero.is_some() {
            tx.send(&ConsoleCmd::GetPitchZero);
        }
    }

    pub fn on_disconnected(&mut self) {
        self.log.append_log("[WS] disconnected".to_string());
    }

    /// Decodes and dispatches one text frame.
    pub fn handle_text(&mut self, text: &str) -> Result<(), ConsoleError> {
        let msg: DeviceMsg = serde_json::from_str(text)?;
        self.dispatch(msg);
        Ok(())
    }

    pub fn dispatch(&mut self, msg: DeviceMsg) {
        match msg {
            DeviceMsg::Telemetry(frame) => {
                self.attitude = Some(Attitude::from(&frame));
                if let (Some(charts), Some(sample)) = (self.charts.as_mut(), frame.sample.as_deref()) {
                    charts.feed_sample(sample);
                }
                if let (Some(fleet), Some(status)) = (self.fleet.as_mut(), frame.group_status) {
                    fleet.handle_status(status);
                }
            }
            DeviceMsg::GroupConfig(report) => {
                if let Some(fleet) = self.fleet.as_mut() {
                    fleet.handle_configuration(report);
                }
            }
            DeviceMsg::PitchZero { value } => {
                if let Some(pitch_zero) = self.pitch_zero.as_mut() {
                    pitch_zero.update_from_remote(value);
                }
            }
            DeviceMsg::ChartConfig { charts } => {
                if let Some(feed) = self.charts.as_mut() {
                    feed.apply_configuration(&charts);
                    self.log.append_log(format!("[CONFIG] chart configuration ({} charts)", charts.len()));
                }
            }
        }
    }

    /// Saves the fleet form; the result is what the operator is shown.
    pub fn save_fleet(&mut self, tx: &dyn Transport) -> Option<Result<SaveNotice, SaveError>> {
        let result = self.fleet.as_ref()?.save_configuration(tx);
        match &result {
            Ok(_) => self.log.append_log("[SAVE] group config sent, restart required".to_string()),
            Err(e) => tracing::warn!("[GROUP] save rejected: {e}"),
        }
        Some(result)
    }

    pub fn send_pitch_zero(&mut self, tx: &dyn Transport) {
        if let Some(pitch_zero) = &self.pitch_zero {
            pitch_zero.send(tx, &mut self.log);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry_dashboard::chart_feed::{ChartFrame, ChartSink, SeriesStyle};
    use crate::telemetry_dashboard::fleet::FollowerList;
    use crate::telemetry_dashboard::transport::testing::RecordingTransport;
    use console_shared::{ChartSpec, EspNowStatus, Role, SERIES_PER_CHART};

    struct NullSink;

    impl ChartSink for NullSink {
        fn append_point(&mut self, _series: usize, _value: f64) {}
        fn set_label(&mut self, _series: usize, _label: &str) {}
        fn redraw(&mut self, _frame: ChartFrame<'_>) {}
    }

    struct NullEngine;

    impl ChartEngine for NullEngine {
        fn create(
            &mut self,
            _index: usize,
            _spec: &ChartSpec,
            _styles: &[SeriesStyle; SERIES_PER_CHART],
        ) -> Option<Box<dyn ChartSink>> {
            Some(Box::new(NullSink))
        }
    }

    fn console(tx: &RecordingTransport) -> Console {
        let console = Console::initialize(DashboardLayout::default(), &mut NullEngine, tx);
        assert_eq!(tx.take(), vec![ConsoleCmd::GetGroupConfig, ConsoleCmd::GetPitchZero]);
        console
    }

    #[test]
    fn telemetry_routes_sample_status_and_attitude() {
        let tx = RecordingTransport::default();
        let mut console = console(&tx);

        console
            .handle_text(
                r#"{"type":"telemetry","pitch":1.5,"roll":-0.5,"yaw":90,"battery":11.8,"fallen":false,
                    "d":[1,2,3,4,5,6,7,8,9],
                    "group_status":{"followers":[{"mac":"AA:BB:CC:DD:EE:01","last_seen_ms":0}],"espnow_status":"ok"}}"#,
            )
            .unwrap();

        let attitude = console.attitude.unwrap();
        assert_eq!(attitude.pitch, 1.5);
        assert_eq!(attitude.battery, 11.8);
        assert!(!attitude.fallen);

        let charts = console.charts.as_ref().unwrap();
        assert_eq!(charts.series(2, 2).unwrap().last(), Some(&9.0));

        let fleet = console.fleet.as_ref().unwrap();
        assert_eq!(fleet.state().espnow_status, EspNowStatus::Ok);
        assert!(matches!(fleet.follower_list(5_000), FollowerList::Entries(ref e) if !e[0].online));
    }

    #[test]
    fn telemetry_with_nulls_still_updates_dashboard() {
        let tx = RecordingTransport::default();
        let mut console = console(&tx);

        console
            .handle_text(
                r#"{"type":"telemetry","pitch":null,"roll":2,"yaw":null,"battery":null,
                    "d":[1,null,3,4,5,6,7,8,9],
                    "group_status":{"espnow_status":"ok","followers":[]}}"#,
            )
            .unwrap();

        let attitude = console.attitude.unwrap();
        assert_eq!(attitude.pitch, 0.0);
        assert_eq!(attitude.roll, 2.0);

        let charts = console.charts.as_ref().unwrap();
        assert_eq!(charts.series(0, 1).unwrap().last(), Some(&0.0));
        assert_eq!(charts.series(0, 2).unwrap().last(), Some(&3.0));

        let fleet = console.fleet.as_ref().unwrap();
        assert_eq!(fleet.state().espnow_status, EspNowStatus::Ok);

        console
            .handle_text(r#"{"type":"telemetry","group_status":{"espnow_status":""}}"#)
            .unwrap();
        let fleet = console.fleet.as_ref().unwrap();
        assert_eq!(fleet.state().espnow_status, EspNowStatus::Ok);
    }

    #[test]
    fn telemetry_without_sample_leaves_charts_alone() {
        let tx = RecordingTransport::default();
        let mut console = console(&tx);
        console.handle_text(r#"{"type":"telemetry","pitch":0.1}"#).unwrap();
        let charts = console.charts.as_ref().unwrap();
        assert!(charts.series(0, 0).unwrap().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn config_and_pitch_zero_reach_their_controllers() {
        let tx = RecordingTransport::default();
        let mut console = console(&tx);

        console
            .handle_text(r#"{"type":"group_config","role":"leader","group_id":2,"espnow_enabled":1}"#)
            .unwrap();
        console.handle_text(r#"{"type":"pitch_zero","value":-7}"#).unwrap();
        console
            .handle_text(r#"{"type":"chart_config","charts":[{"title":"Pitch"}]}"#)
            .unwrap();

        let state = console.fleet.as_ref().unwrap().state();
        assert_eq!(state.role, Role::Leader);
        assert_eq!(state.group_id, 2);
        assert!(state.espnow_enabled);
        assert_eq!(console.pitch_zero.as_ref().unwrap().value(), -5.0);
        assert_eq!(console.charts.as_ref().unwrap().slot(0).unwrap().title(), "Pitch");
        assert!(tx.take().is_empty());
    }

    #[test]
    fn undecodable_frames_are_rejected() {
        let tx = RecordingTransport::default();
        let mut console = console(&tx);
        assert!(matches!(console.handle_text("not json"), Err(ConsoleError::Decode(_))));
        assert!(matches!(console.handle_text(r#"{"type":"reboot"}"#), Err(ConsoleError::Decode(_))));
    }

    #[test]
    fn missing_panels_leave_other_controllers_working() {
        let tx = RecordingTransport::default();
        let layout = DashboardLayout {
            panels: vec![PanelKind::PitchZero],
            ..DashboardLayout::default()
        };
        let mut console = Console::initialize(layout, &mut NullEngine, &tx);
        assert_eq!(tx.take(), vec![ConsoleCmd::GetPitchZero]);
        assert!(console.charts.is_none());
        assert!(console.fleet.is_none());

        console
            .handle_text(r#"{"type":"telemetry","d":[1,2,3],"group_status":{"followers":[]}}"#)
            .unwrap();
        console.handle_text(r#"{"type":"pitch_zero","value":1.25}"#).unwrap();
        assert_eq!(console.pitch_zero.as_ref().unwrap().display(), "1.3");
        assert!(console.save_fleet(&tx).is_none());
    }

    #[test]
    fn reconnect_requests_fresh_values() {
        let tx = RecordingTransport::default();
        let mut console = console(&tx);
        console.on_connected(&tx);
        assert_eq!(tx.take(), vec![ConsoleCmd::GetGroupConfig, ConsoleCmd::GetPitchZero]);
        assert_eq!(console.log.lines().next(), Some("[WS] connected"));
    }

    #[test]
    fn pitch_zero_send_goes_to_log_book() {
        let tx = RecordingTransport::default();
        let mut console = console(&tx);
        console.pitch_zero.as_mut().unwrap().slide(3.0);
        console.send_pitch_zero(&tx);
        assert_eq!(tx.take(), vec![ConsoleCmd::PitchZeroSet { value: 3.0 }]);
        assert_eq!(console.log.lines().next(), Some("[SAVE] pitch_zero=3.0°"));
    }
}
