#[cfg(feature = "ui")]
pub mod app;
pub mod telemetry_dashboard;
