// frontend/src/telemetry_dashboard/mod.rs
//
// Controller core (always built, no UI crates) and the Dioxus panels that
// render it (feature `ui`).

pub mod chart_feed;
pub mod console;
pub mod fleet;
pub mod log_book;
pub mod pitch_zero;
pub mod ring_buffer;
pub mod svg_chart;
pub mod transport;

#[cfg(feature = "ui")]
mod attitude_tab;
#[cfg(feature = "ui")]
mod charts_tab;
#[cfg(feature = "ui")]
mod dashboard;
#[cfg(feature = "ui")]
mod fleet_tab;
#[cfg(feature = "ui")]
mod log_tab;
#[cfg(feature = "ui")]
mod pitch_zero_tab;
#[cfg(feature = "ui")]
pub mod ws;

pub use console::{Attitude, Console, ConsoleError};
#[cfg(feature = "ui")]
pub use dashboard::TelemetryDashboard;
