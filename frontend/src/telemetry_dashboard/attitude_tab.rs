// frontend/src/telemetry_dashboard/attitude_tab.rs

use dioxus::prelude::*;

use super::console::{Attitude, Console};

#[component]
pub fn AttitudeTab(console: Signal<Option<Console>>) -> Element {
    let attitude = console.read().as_ref().and_then(|c| c.attitude);

    rsx! {
        div { style: "padding:16px; display:flex; flex-direction:column; gap:8px; border:1px solid #334155; border-radius:14px; background:#020617; color:#cbd5f5;",
            h2 { style: "margin:0; color:#e5e7eb; font-size:16px;", "Attitude" }
            if let Some(att) = attitude {
                Readout { attitude: att }
            } else {
                div { style: "color:#94a3b8;", "Waiting for telemetry…" }
            }
        }
    }
}

#[component]
fn Readout(attitude: Attitude) -> Element {
    let rows = [
        ("Pitch", format!("{:.1}°", attitude.pitch)),
        ("Roll", format!("{:.1}°", attitude.roll)),
        ("Yaw", format!("{:.1}°", attitude.yaw)),
        ("Battery", format!("{:.2} V", attitude.battery)),
    ];

    rsx! {
        div { style: "display:grid; grid-template-columns: repeat(4, 1fr); gap:8px;",
            for (name, value) in rows {
                div { style: "border:1px solid #1f2937; border-radius:10px; padding:8px;",
                    div { style: "font-size:11px; color:#94a3b8;", "{name}" }
                    div { style: "font-family:monospace; font-size:16px;", "{value}" }
                }
            }
        }
        if attitude.fallen {
            div { style: "border:1px solid #b91c1c; background:#2a0b0b; color:#fecaca; padding:8px; border-radius:10px; font-weight:700;",
                "FALLEN"
            }
        }
    }
}
