use crate::device::Device;
use console_shared::{ConsoleCmd, DeviceMsg};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, mpsc};

/// A dashboard command plus the way back to the client that sent it.
#[derive(Debug)]
pub struct Request {
    pub cmd: ConsoleCmd,
    pub reply_tx: mpsc::Sender<DeviceMsg>,
}

#[derive(Clone)]
pub struct AppState {
    pub device: Arc<Mutex<Device>>,

    /// Commands from dashboards → device task
    pub cmd_tx: mpsc::Sender<Request>,

    /// Telemetry and broadcast replies → every dashboard
    pub ws_tx: broadcast::Sender<DeviceMsg>,

    /// Built frontend served for every unmatched route
    pub static_dir: PathBuf,
}

impl AppState {
    /// A panic while the device was locked leaves it usable; its state is
    /// plain data.
    pub fn device(&self) -> MutexGuard<'_, Device> {
        self.device.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
