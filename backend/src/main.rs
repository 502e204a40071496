// main.rs

mod config;
mod device;
mod layout;
mod sim;
mod state;
mod store;
mod telemetry_task;
mod web;

use crate::config::load_config;
use crate::device::Device;
use crate::state::AppState;
use crate::store::ParamStore;
use crate::telemetry_task::telemetry_task;

use anyhow::Context;
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // --- Config + stored parameters ---
    let cfg = load_config()?;
    let store = ParamStore::new(&cfg.store_path);
    tracing::info!("parameters kept in {:?}", store.path());
    let params = store.load()?;
    let device = Device::new(&cfg, store, params)?;
    tracing::info!(
        "device {} up: data every {} ms, chart push {}, pitch_zero {:.2}",
        cfg.my_mac,
        cfg.data_ms,
        if cfg.chart_push { "on" } else { "off" },
        device.pitch_zero()
    );

    // --- Channels ---
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (ws_tx, _ws_rx) = broadcast::channel(512);
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    // --- Shared state ---
    let state = Arc::new(AppState {
        device: Arc::new(Mutex::new(device)),
        cmd_tx,
        ws_tx,
        static_dir: cfg.static_dir.clone(),
    });

    // --- Background tasks ---
    let device_task = tokio::spawn(telemetry_task(state.clone(), cfg.data_ms, cmd_rx, shutdown_rx));

    // --- Webserver ---
    let app: Router = web::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    tracing::info!("console bridge listening on http://{}", cfg.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c: {e}");
            }
            tracing::info!("shutting down");
        })
        .await?;

    let _ = shutdown_tx.send(());
    device_task.await?;
    Ok(())
}
