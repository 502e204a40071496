// frontend/src/telemetry_dashboard/pitch_zero_tab.rs

use dioxus::prelude::*;

use super::console::Console;
use super::pitch_zero::{SLIDER_MAX, SLIDER_MIN, SLIDER_STEP};
use super::ws::ActiveSocket;

#[component]
pub fn PitchZeroTab(console: Signal<Option<Console>>) -> Element {
    let Some((value, display)) = console
        .read()
        .as_ref()
        .and_then(|c| c.pitch_zero.as_ref())
        .map(|pz| (pz.value(), pz.display()))
    else {
        return rsx! {};
    };
    let mut console = console;

    rsx! {
        div { style: "padding:16px; display:flex; flex-direction:column; gap:10px; border:1px solid #334155; border-radius:14px; background:#020617; color:#cbd5f5;",
            h2 { style: "margin:0; color:#e5e7eb; font-size:16px;", "Pitch zero" }
            div { style: "display:flex; align-items:center; gap:12px;",
                input {
                    style: "flex:1;",
                    r#type: "range",
                    min: "{SLIDER_MIN}",
                    max: "{SLIDER_MAX}",
                    step: "{SLIDER_STEP}",
                    value: "{value}",
                    oninput: move |evt: FormEvent| {
                        if let Some(pz) = console.write().as_mut().and_then(|c| c.pitch_zero.as_mut()) {
                            pz.slide_text(&evt.value());
                        }
                    },
                }
                span { style: "min-width:56px; text-align:right; font-family:monospace; font-size:16px;", "{display}°" }
            }
            button {
                style: "align-self:flex-start; padding:0.5rem 0.9rem; border-radius:0.75rem; cursor:pointer; border:1px solid #1d4ed8; background:#0b1b3a; color:#bfdbfe; font-weight:700;",
                onclick: move |_| {
                    if let Some(console) = console.write().as_mut() {
                        console.send_pitch_zero(&ActiveSocket);
                    }
                },
                "Send"
            }
        }
    }
}
