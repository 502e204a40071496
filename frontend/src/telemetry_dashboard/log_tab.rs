// frontend/src/telemetry_dashboard/log_tab.rs

use dioxus::prelude::*;

use super::console::Console;

#[component]
pub fn LogTab(console: Signal<Option<Console>>) -> Element {
    let lines: Vec<String> = console
        .read()
        .as_ref()
        .map(|c| c.log.lines().map(str::to_string).collect())
        .unwrap_or_default();
    let empty = lines.is_empty();

    rsx! {
        div { style: "padding:16px; border:1px solid #334155; border-radius:14px; background:#020617;",
            h2 { style: "margin:0 0 8px 0; color:#e5e7eb; font-size:16px;", "Log" }
            div { style: "max-height:240px; overflow-y:auto; font-family:monospace; font-size:12px; color:#94a3b8; display:flex; flex-direction:column; gap:2px;",
                for line in lines {
                    div { "{line}" }
                }
                if empty {
                    div { "No log entries." }
                }
            }
        }
    }
}
