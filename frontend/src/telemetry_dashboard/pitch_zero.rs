// frontend/src/telemetry_dashboard/pitch_zero.rs

use console_shared::{clamp_pitch_zero, ConsoleCmd, DashboardLayout, PanelKind, PITCH_ZERO_MAX, PITCH_ZERO_MIN};

use super::transport::{LogSink, Transport};

pub const SLIDER_MIN: f64 = PITCH_ZERO_MIN;
pub const SLIDER_MAX: f64 = PITCH_ZERO_MAX;
pub const SLIDER_STEP: f64 = 0.1;

/// Pitch zero-offset slider. Sliding is local; only `send` talks to the device.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchZeroCalibrator {
    value: f64,
}

impl PitchZeroCalibrator {
    pub fn initialize(layout: &DashboardLayout, tx: &dyn Transport) -> Option<Self> {
        if !layout.has_panel(PanelKind::PitchZero) {
            tracing::warn!("[PITCH] no pitch-zero panel in layout, calibrator disabled");
            return None;
        }
        tx.send(&ConsoleCmd::GetPitchZero);
        Some(Self { value: 0.0 })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn slide(&mut self, value: f64) {
        self.value = clamp_finite(value);
    }

    /// Raw slider/input text. Unparseable text reads as 0.
    pub fn slide_text(&mut self, text: &str) {
        self.slide(text.trim().parse().unwrap_or(0.0));
    }

    pub fn send(&self, tx: &dyn Transport, log: &mut dyn LogSink) {
        tx.send(&ConsoleCmd::PitchZeroSet { value: self.value });
        log.append_log(format!("[SAVE] pitch_zero={}°", one_decimal(self.value)));
    }

    /// Device-reported value. Never echoed back.
    pub fn update_from_remote(&mut self, value: f64) {
        self.value = clamp_finite(value);
    }

    pub fn display(&self) -> String {
        one_decimal(self.value)
    }
}

/// One decimal, halves rounded away from zero (1.25 -> "1.3").
fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

fn clamp_finite(value: f64) -> f64 {
    if value.is_finite() {
        clamp_pitch_zero(value)
    } else {
        0.0
    }
}
