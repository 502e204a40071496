// frontend/src/telemetry_dashboard/dashboard.rs
//
// Root dashboard component: fetches the layout, builds the `Console`, runs the
// WebSocket supervisor and lays out the panels the layout asks for.

use console_shared::{DashboardLayout, PanelKind};
use dioxus::prelude::*;

use super::attitude_tab::AttitudeTab;
use super::charts_tab::ChartsTab;
use super::console::Console;
use super::fleet_tab::FleetTab;
use super::log_tab::LogTab;
use super::pitch_zero_tab::PitchZeroTab;
use super::svg_chart::{SharedPicture, SvgChartEngine};
use super::ws::{bump_ws_epoch, connect_ws_supervisor, http_get_json, ActiveSocket, WS_EPOCH};

#[component]
pub fn TelemetryDashboard() -> Element {
    let mut console = use_signal(|| None::<Console>);
    let mut pictures = use_signal(Vec::<Option<SharedPicture>>::new);
    let connected = use_signal(|| false);

    use_future(move || async move {
        let layout = match http_get_json::<DashboardLayout>("/api/layout").await {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!("[UI] layout request failed ({e}), using built-in layout");
                DashboardLayout::default()
            }
        };

        let mut engine = SvgChartEngine::default();
        let built = Console::initialize(layout, &mut engine, &ActiveSocket);
        pictures.set(engine.into_pictures());
        console.set(Some(built));
        tracing::info!("[UI] dashboard ready");

        // Started only once the console exists so no frame arrives before it.
        let epoch = *WS_EPOCH.peek();
        connect_ws_supervisor(epoch, console, connected).await;
    });

    use_drop(bump_ws_epoch);

    let panels: Option<Vec<PanelKind>> = console.read().as_ref().map(|c| c.layout.panels.clone());
    let Some(panels) = panels else {
        return rsx! {
            div { style: "padding:24px; color:#94a3b8; font-family:system-ui;", "Loading dashboard…" }
        };
    };
    let has = |kind: PanelKind| panels.contains(&kind);

    let (badge_text, badge_style) = if *connected.read() {
        ("connected", "border:1px solid #15803d; background:#052e16; color:#bbf7d0;")
    } else {
        ("disconnected", "border:1px solid #b91c1c; background:#2a0b0b; color:#fecaca;")
    };

    rsx! {
        div { style: "padding:16px; display:flex; flex-direction:column; gap:12px; font-family:system-ui; height:100vh; overflow-y:auto;",
            div { style: "display:flex; align-items:center; justify-content:space-between;",
                h1 { style: "margin:0; font-size:18px; color:#e5e7eb;", "Balance-bot console" }
                span { style: "padding:2px 10px; border-radius:999px; font-size:12px; {badge_style}", "{badge_text}" }
            }

            if has(PanelKind::Charts) {
                ChartsTab { console, pictures }
            }

            div { style: "display:grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap:12px;",
                if has(PanelKind::Attitude) {
                    AttitudeTab { console }
                }
                if has(PanelKind::PitchZero) {
                    PitchZeroTab { console }
                }
            }

            if has(PanelKind::Fleet) {
                FleetTab { console }
            }
            if has(PanelKind::Log) {
                LogTab { console }
            }
        }
    }
}
