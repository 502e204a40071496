mod group;
pub mod layout;
mod mac;
mod messages;
mod wire;

pub use group::{EspNowStatus, FollowerReport, GroupConfigReport, GroupStatus, Role};
pub use layout::{AxisConfig, ChartSpec, DashboardLayout, PanelKind};
pub use mac::{MacAddress, MacParseError};
pub use messages::{
    ChartConfig, ConsoleCmd, DeviceMsg, GroupConfigParam, TelemetryFrame, CHART_COUNT,
    SAMPLE_LEN, SERIES_PER_CHART,
};

/// Lowest pitch zero-offset the device accepts, in degrees.
pub const PITCH_ZERO_MIN: f64 = -5.0;
/// Highest pitch zero-offset the device accepts, in degrees.
pub const PITCH_ZERO_MAX: f64 = 5.0;

/// Clamp a pitch zero-offset into the accepted range. NaN reads as 0.
pub fn clamp_pitch_zero(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(PITCH_ZERO_MIN, PITCH_ZERO_MAX)
}
