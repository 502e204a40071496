use crate::device::Reply;
use crate::state::{AppState, Request};
use console_shared::DeviceMsg;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

/// Drives the simulated device: one telemetry frame every `data_ms`, and
/// dashboard commands in arrival order.
pub async fn telemetry_task(
    state: Arc<AppState>,
    data_ms: u64,
    mut rx: mpsc::Receiver<Request>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut data_interval = interval(Duration::from_millis(data_ms));
    data_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = data_interval.tick() => {
                let now = Instant::now();
                let dt_s = now.duration_since(last_tick).as_secs_f64();
                last_tick = now;

                let frame = state.device().telemetry(get_current_timestamp_ms(), dt_s);
                // No receivers just means no dashboard is open.
                let _ = state.ws_tx.send(DeviceMsg::Telemetry(frame));
            }
            Some(req) = rx.recv() => {
                let Request { cmd, reply_tx } = req;
                tracing::debug!("[DEVICE] command {cmd:?}");
                let result = state.device().handle(cmd);
                match result {
                    Ok(Some(Reply::Direct(msg))) => {
                        if reply_tx.send(msg).await.is_err() {
                            tracing::debug!("[DEVICE] client left before its reply");
                        }
                    }
                    Ok(Some(Reply::Broadcast(msg))) => {
                        let _ = state.ws_tx.send(msg);
                    }
                    Ok(None) => {}
                    Err(e) => tracing::error!("[DEVICE] command failed: {e:#}"),
                }
            }
            recv = shutdown_rx.recv() => {
                match recv {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) | Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("[DEVICE] stopping");
                        break;
                    }
                }
            }
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch.
pub fn get_current_timestamp_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
