use crate::layout;
use crate::state::{AppState, Request};
use axum::http::StatusCode;
use axum::{
    extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use console_shared::{ConsoleCmd, DeviceMsg};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

/// Direct replies queued per client before the device task waits.
const REPLY_QUEUE: usize = 16;

/// Public router constructor
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.static_dir)
        .precompressed_br()
        .precompressed_gzip();

    Router::new()
        .route("/api/layout", get(get_layout))
        .route("/ws", get(ws_handler))
        // anything that doesn’t match the above routes goes to the static files
        .fallback_service(static_dir)
        .layer(CompressionLayer::new())
        .with_state(state)
}

async fn get_layout() -> impl IntoResponse {
    match layout::load_layout() {
        Ok(layout) => Json(layout).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

fn encode(msg: &DeviceMsg) -> Option<Message> {
    match serde_json::to_string(msg) {
        Ok(text) => Some(Message::Text(Utf8Bytes::from(text))),
        Err(e) => {
            tracing::error!("[WS] failed to encode {msg:?}: {e}");
            None
        }
    }
}

async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    let mut broadcast_rx = state.ws_tx.subscribe();
    let (reply_tx, mut reply_rx) = mpsc::channel::<DeviceMsg>(REPLY_QUEUE);
    let cmd_tx = state.cmd_tx.clone();
    let (mut sender, mut receiver) = socket.split();

    tracing::info!("[WS] dashboard connected");

    // Chart titles and legends go out before anything else.
    let hello = state.device().chart_config();

    // Task: server -> client (broadcasts and this client's replies)
    let send_task = async move {
        if let Some(msg) = encode(&hello)
            && sender.send(msg).await.is_err()
        {
            return;
        }

        loop {
            let next = tokio::select! {
                biased;

                reply = reply_rx.recv() => match reply {
                    Some(msg) => msg,
                    None => break,
                },

                recv = broadcast_rx.recv() => match recv {
                    Ok(msg) => msg,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::debug!("[WS] client lagged, skipped {n} messages");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            let Some(msg) = encode(&next) else {
                continue;
            };
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    };

    // Task: client -> server (commands)
    let recv_task = async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ConsoleCmd>(&text) {
                    Ok(cmd) => {
                        let req = Request {
                            cmd,
                            reply_tx: reply_tx.clone(),
                        };
                        if let Err(e) = cmd_tx.send(req).await {
                            tracing::warn!("[WS] failed to forward command to device: {e}");
                        }
                    }
                    Err(e) => {
                        tracing::warn!("[WS] invalid command JSON {text:?}: {e}");
                    }
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
        // Dropping the last reply sender ends the send task.
        drop(reply_tx);
    };

    // Run both directions until one side ends
    tokio::join!(send_task, recv_task);
    tracing::info!("[WS] dashboard disconnected");
}
