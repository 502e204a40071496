// frontend/src/telemetry_dashboard/transport.rs

use console_shared::ConsoleCmd;

/// Outbound half of the device connection. Sends are fire-and-forget: a
/// closed or missing socket drops the command.
pub trait Transport {
    fn send(&self, cmd: &ConsoleCmd);
}

/// Operator-visible append-only log.
pub trait LogSink {
    fn append_log(&mut self, line: String);
}

/// Used before the socket is up.
pub struct Disconnected;

impl Transport for Disconnected {
    fn send(&self, cmd: &ConsoleCmd) {
        tracing::debug!("[WS] not connected, dropping {cmd:?}");
    }
}
