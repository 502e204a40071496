// frontend/src/telemetry_dashboard/ws.rs
//
// Device connection for the UI: base URL, the reconnecting WebSocket
// supervisor for web and desktop, and a small JSON GET helper.

use console_shared::ConsoleCmd;
use dioxus::prelude::*;
use dioxus_signals::Signal;
use serde::Deserialize;

use super::console::Console;
use super::transport::{Disconnected, Transport};

const RECONNECT_DELAY_MS: u64 = 800;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

// When this number changes, the current connection is torn down and rebuilt.
pub(crate) static WS_EPOCH: GlobalSignal<u64> = Signal::global(|| 0);

#[cfg(target_arch = "wasm32")]
static WS_RAW: GlobalSignal<Option<web_sys::WebSocket>> = Signal::global(|| None);

static WS_SENDER: GlobalSignal<Option<WsSender>> = Signal::global(|| None::<WsSender>);

pub(crate) fn bump_ws_epoch() {
    *WS_SENDER.write() = None;

    #[cfg(target_arch = "wasm32")]
    {
        if let Some(ws) = WS_RAW.write().take() {
            let _ = ws.close();
        }
    }

    *WS_EPOCH.write() += 1;
}

fn normalize_base_url(mut url: String) -> String {
    if let Some(idx) = url.find('#') {
        url.truncate(idx);
    }
    if let Some(scheme_end) = url.find("://") {
        let rest = &url[scheme_end + 3..];
        if let Some(slash) = rest.find('/') {
            url.truncate(scheme_end + 3 + slash);
        }
    }
    url.trim_end_matches('/').to_string()
}

// ---------- Base URL ----------
pub struct UrlConfig;

impl UrlConfig {
    /// Empty on web: requests go to the page origin.
    pub fn base_http() -> String {
        #[cfg(target_arch = "wasm32")]
        {
            String::new()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::env::var("CONSOLE_BASE_URL")
                .ok()
                .map(normalize_base_url)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        }
    }

    /// ws/wss scheme + host[:port], no path.
    pub fn base_ws() -> String {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let loc = window.location();
                let protocol = loc.protocol().unwrap_or_else(|_| "http:".to_string());
                let host = loc.host().unwrap_or_else(|_| "localhost:3000".to_string());
                let ws_scheme = if protocol == "https:" { "wss" } else { "ws" };
                return format!("{ws_scheme}://{host}");
            }
        }

        let base_http = UrlConfig::base_http();
        let base_http = if base_http.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            base_http
        };

        if base_http.starts_with("https://") {
            base_http.replacen("https://", "wss://", 1)
        } else if base_http.starts_with("http://") {
            base_http.replacen("http://", "ws://", 1)
        } else if base_http.starts_with("wss://") || base_http.starts_with("ws://") {
            base_http
        } else {
            format!("ws://{base_http}")
        }
    }
}

// ---------- Cross-platform WS handle ----------
#[derive(Clone)]
pub(crate) struct WsSender {
    #[cfg(target_arch = "wasm32")]
    ws: web_sys::WebSocket,

    #[cfg(not(target_arch = "wasm32"))]
    tx: tokio::sync::mpsc::UnboundedSender<String>,
}

impl Transport for WsSender {
    fn send(&self, cmd: &ConsoleCmd) {
        let text = match serde_json::to_string(cmd) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("[WS] failed to encode {cmd:?}: {e}");
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        {
            if self.ws.send_with_str(&text).is_err() {
                tracing::warn!("[WS] send failed, dropping {text}");
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            if self.tx.send(text).is_err() {
                tracing::warn!("[WS] writer gone, dropping command");
            }
        }
    }
}

/// Whatever socket is currently open, or nothing.
pub struct ActiveSocket;

impl Transport for ActiveSocket {
    fn send(&self, cmd: &ConsoleCmd) {
        match WS_SENDER.peek().clone() {
            Some(sender) => sender.send(cmd),
            None => Disconnected.send(cmd),
        }
    }
}

pub fn now_ms() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as i64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        chrono::Utc::now().timestamp_millis()
    }
}

// ---------- HTTP helpers ----------
#[cfg(target_arch = "wasm32")]
pub async fn http_get_json<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, String> {
    use gloo_net::http::Request;

    let w = web_sys::window().ok_or("no window".to_string())?;
    let origin = w
        .location()
        .origin()
        .map_err(|_| "failed to read window.location.origin".to_string())?;
    let url = format!("{origin}{path}");

    Request::get(&url)
        .send()
        .await
        .map_err(|e| e.to_string())?
        .json::<T>()
        .await
        .map_err(|e| e.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn http_get_json<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, String> {
    let url = format!("{}{path}", UrlConfig::base_http());

    reqwest::get(url)
        .await
        .map_err(|e| e.to_string())?
        .json::<T>()
        .await
        .map_err(|e| e.to_string())
}

// ---------------------------------------------------------
// WebSocket supervisor (reconnect loop), both platforms
// ---------------------------------------------------------
pub async fn connect_ws_supervisor(
    epoch: u64,
    console: Signal<Option<Console>>,
    connected: Signal<bool>,
) {
    tracing::info!("[WS] supervisor starting (epoch={epoch})");

    while *WS_EPOCH.peek() == epoch {
        let res = {
            #[cfg(target_arch = "wasm32")]
            {
                connect_ws_once_wasm(epoch, console, connected).await
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                connect_ws_once_native(epoch, console, connected).await
            }
        };

        if *WS_EPOCH.peek() != epoch {
            break;
        }
        if let Err(e) = res {
            tracing::warn!("[WS] {e}");
        }

        #[cfg(target_arch = "wasm32")]
        gloo_timers::future::TimeoutFuture::new(RECONNECT_DELAY_MS as u32).await;

        #[cfg(not(target_arch = "wasm32"))]
        tokio::time::sleep(std::time::Duration::from_millis(RECONNECT_DELAY_MS)).await;
    }

    tracing::info!("[WS] supervisor stopped (epoch={epoch})");
}

fn mark_connected(
    mut console: Signal<Option<Console>>,
    mut connected: Signal<bool>,
    sender: &WsSender,
) {
    connected.set(true);
    if let Some(console) = console.write().as_mut() {
        console.on_connected(sender);
    }
}

fn mark_disconnected(mut console: Signal<Option<Console>>, mut connected: Signal<bool>) {
    if !*connected.peek() {
        return;
    }
    connected.set(false);
    if let Some(console) = console.write().as_mut() {
        console.on_disconnected();
    }
}

#[cfg(target_arch = "wasm32")]
async fn connect_ws_once_wasm(
    epoch: u64,
    console: Signal<Option<Console>>,
    connected: Signal<bool>,
) -> Result<(), String> {
    use futures_channel::oneshot;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{CloseEvent, ErrorEvent, Event, MessageEvent, WebSocket};

    let ws_url = format!("{}/ws", UrlConfig::base_ws());
    tracing::info!("[WS] connecting to {ws_url} (epoch={epoch})");

    let ws = WebSocket::new(&ws_url).map_err(|_| "failed to create websocket".to_string())?;
    let sender = WsSender { ws: ws.clone() };

    *WS_RAW.write() = Some(ws.clone());
    *WS_SENDER.write() = Some(sender.clone());

    let (closed_tx, closed_rx) = oneshot::channel::<()>();
    let closed_tx = std::rc::Rc::new(std::cell::RefCell::new(Some(closed_tx)));

    {
        let onopen: Closure<dyn FnMut(Event)> = Closure::new(move |_e: Event| {
            tracing::info!("[WS] open");
            mark_connected(console, connected, &sender);
        });
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();
    }

    {
        let onmessage: Closure<dyn FnMut(MessageEvent)> = Closure::new(move |e: MessageEvent| {
            if let Some(s) = e.data().as_string() {
                handle_ws_message(&s, console);
            }
        });
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();
    }

    {
        let closed_tx = closed_tx.clone();
        let onerror: Closure<dyn FnMut(ErrorEvent)> = Closure::new(move |e: ErrorEvent| {
            tracing::warn!("[WS] error: {}", e.message());
            if let Some(tx) = closed_tx.borrow_mut().take() {
                let _ = tx.send(());
            }
        });
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }

    {
        let closed_tx = closed_tx.clone();
        let onclose: Closure<dyn FnMut(CloseEvent)> = Closure::new(move |e: CloseEvent| {
            tracing::info!("[WS] close code={} reason='{}'", e.code(), e.reason());
            if let Some(tx) = closed_tx.borrow_mut().take() {
                let _ = tx.send(());
            }
        });
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();
    }

    futures_util::pin_mut!(closed_rx);

    loop {
        if *WS_EPOCH.peek() != epoch {
            let _ = ws.close();
            break;
        }

        let done = futures_util::future::select(
            &mut closed_rx,
            gloo_timers::future::TimeoutFuture::new(150),
        )
        .await;

        if let futures_util::future::Either::Left(_) = done {
            break;
        }
    }

    if *WS_EPOCH.peek() == epoch {
        *WS_SENDER.write() = None;
        *WS_RAW.write() = None;
    }
    mark_disconnected(console, connected);

    Err("websocket closed".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
async fn connect_ws_once_native(
    epoch: u64,
    console: Signal<Option<Console>>,
    connected: Signal<bool>,
) -> Result<(), String> {
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    let ws_url = format!("{}/ws", UrlConfig::base_ws());
    tracing::info!("[WS] connecting to {ws_url} (epoch={epoch})");

    let (ws_stream, _) = tokio_tungstenite::connect_async(ws_url.as_str())
        .await
        .map_err(|e| format!("connect failed: {e}"))?;

    let (mut write, mut read) = ws_stream.split();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let sender = WsSender { tx };
    *WS_SENDER.write() = Some(sender.clone());

    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if write.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    tracing::info!("[WS] open");
    mark_connected(console, connected, &sender);

    while *WS_EPOCH.peek() == epoch {
        let Some(item) = read.next().await else { break };

        match item {
            Ok(Message::Text(s)) => handle_ws_message(&s, console),
            Ok(Message::Close(frame)) => {
                tracing::info!("[WS] close {frame:?}");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("[WS] read error: {e}");
                break;
            }
        }
    }

    writer.abort();
    if *WS_EPOCH.peek() == epoch {
        *WS_SENDER.write() = None;
    }
    mark_disconnected(console, connected);

    Err("websocket closed".to_string())
}

fn handle_ws_message(s: &str, mut console: Signal<Option<Console>>) {
    let mut guard = console.write();
    let Some(console) = guard.as_mut() else {
        tracing::debug!("[WS] dashboard not ready, dropping frame");
        return;
    };
    if let Err(e) = console.handle_text(s) {
        tracing::warn!("[WS] {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_reduced_to_origin() {
        assert_eq!(
            normalize_base_url("http://robot.local:3000/dashboard#x".to_string()),
            "http://robot.local:3000"
        );
        assert_eq!(normalize_base_url("http://10.0.0.2/".to_string()), "http://10.0.0.2");
    }
}
