// frontend/src/telemetry_dashboard/fleet_tab.rs

use console_shared::Role;
use dioxus::prelude::*;

use super::console::Console;
use super::fleet::{FleetForm, FollowerList, StatusView, NO_FOLLOWERS_TEXT};
use super::ws::{now_ms, ActiveSocket};

const INPUT_STYLE: &str = "width:100%; padding:6px 8px; border-radius:8px; border:1px solid #334155; \
                           background:#0b1220; color:#e5e7eb;";

fn btn_style(border: &str, bg: &str, fg: &str) -> String {
    format!(
        "padding:0.5rem 0.9rem; border-radius:0.75rem; cursor:pointer; \
         border:1px solid {border}; background:{bg}; color:{fg}; font-weight:700;"
    )
}

const NOTICE_STYLE: &str = "border:1px solid #15803d; background:#052e16; color:#bbf7d0; padding:10px; \
                            border-radius:10px; white-space:pre-line;";
const ERROR_STYLE: &str =
    "border:1px solid #b91c1c; background:#2a0b0b; color:#fecaca; padding:10px; border-radius:10px;";

fn follower_style(online: bool) -> &'static str {
    if online {
        "border:1px solid #15803d; border-radius:10px; padding:8px;"
    } else {
        "border:1px solid #334155; border-radius:10px; padding:8px; opacity:0.6;"
    }
}

/// Result of the last save, shown until the next one.
#[derive(Clone, PartialEq)]
enum Banner {
    Notice(String),
    Error(String),
}

#[component]
pub fn FleetTab(console: Signal<Option<Console>>) -> Element {
    let mut banner = use_signal(|| None::<Banner>);

    let guard = console.read();
    let Some(fleet) = guard.as_ref().and_then(|c| c.fleet.as_ref()) else {
        return rsx! {};
    };
    let form: FleetForm = fleet.form().clone();
    let status: StatusView = fleet.status_view();
    let followers = fleet.follower_list(now_ms());
    drop(guard);

    let banner_view = banner.read().clone().map(|b| match b {
        Banner::Notice(text) => (NOTICE_STYLE, text),
        Banner::Error(text) => (ERROR_STYLE, text),
    });
    let mut console = console;

    rsx! {
        div { style: "padding:16px; display:flex; flex-direction:column; gap:12px; border:1px solid #334155; border-radius:14px; background:#020617;",
            h2 { style: "margin:0; color:#e5e7eb; font-size:16px;", "Fleet" }

            div { style: "display:grid; grid-template-columns: 140px 1fr; gap:8px; align-items:center; color:#cbd5f5; font-size:13px;",
                label { "Role" }
                select {
                    style: INPUT_STYLE,
                    onchange: move |evt: FormEvent| {
                        let role = Role::from_wire(&evt.value());
                        if let Some(fleet) = console.write().as_mut().and_then(|c| c.fleet.as_mut()) {
                            fleet.set_role(role);
                        }
                    },
                    for role in Role::ALL {
                        option { value: role.as_str(), selected: role == form.role, "{role.display_name()}" }
                    }
                }

                label { "Group ID" }
                input {
                    style: INPUT_STYLE,
                    r#type: "number",
                    min: "0",
                    max: "255",
                    value: "{form.group_id_text}",
                    oninput: move |evt: FormEvent| {
                        if let Some(fleet) = console.write().as_mut().and_then(|c| c.fleet.as_mut()) {
                            fleet.set_group_id_text(evt.value());
                        }
                    },
                }

                if form.leader_mac_visible() {
                    label { "Leader MAC" }
                    input {
                        style: INPUT_STYLE,
                        placeholder: "AA:BB:CC:DD:EE:FF",
                        value: "{form.leader_mac_text}",
                        oninput: move |evt: FormEvent| {
                            if let Some(fleet) = console.write().as_mut().and_then(|c| c.fleet.as_mut()) {
                                fleet.set_leader_mac_text(evt.value());
                            }
                        },
                    }
                }

                label { "ESP-NOW" }
                input {
                    r#type: "checkbox",
                    checked: form.espnow_enabled,
                    onchange: move |evt: FormEvent| {
                        if let Some(fleet) = console.write().as_mut().and_then(|c| c.fleet.as_mut()) {
                            fleet.set_espnow_enabled(evt.checked());
                        }
                    },
                }
            }

            div { style: "display:flex; gap:8px;",
                button {
                    style: btn_style("#15803d", "#052e16", "#bbf7d0"),
                    onclick: move |_| {
                        let result = console.write().as_mut().and_then(|c| c.save_fleet(&ActiveSocket));
                        match result {
                            Some(Ok(notice)) => banner.set(Some(Banner::Notice(notice.message().to_string()))),
                            Some(Err(e)) => banner.set(Some(Banner::Error(e.to_string()))),
                            None => {}
                        }
                    },
                    "Save"
                }
                button {
                    style: btn_style("#334155", "#0b1220", "#e5e7eb"),
                    onclick: move |_| {
                        if let Some(fleet) = console.read().as_ref().and_then(|c| c.fleet.as_ref()) {
                            fleet.request_configuration(&ActiveSocket);
                        }
                    },
                    "Refresh"
                }
            }

            if let Some((style, text)) = banner_view {
                div { style, "{text}" }
            }

            StatusPanel { status, followers }
        }
    }
}

#[component]
fn StatusPanel(status: StatusView, followers: FollowerList) -> Element {
    let lamp_color = if status.lamp_on { "#22c55e" } else { "#475569" };

    rsx! {
        div { style: "display:flex; flex-direction:column; gap:8px; padding-top:8px; border-top:1px solid #1f2937; color:#cbd5f5; font-size:13px;",
            div { "Role: " strong { "{status.role_name}" } }
            div { "This device: " code { "{status.my_mac}" } }
            div { style: "display:flex; align-items:center; gap:6px;",
                "ESP-NOW: "
                span { style: "display:inline-block; width:10px; height:10px; border-radius:50%; background:{lamp_color};" }
                "{status.lamp_text}"
            }

            if status.show_followers {
                div { "Followers: " strong { "{status.follower_count}" } }
                if let FollowerList::Entries(entries) = followers {
                    div { style: "display:grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap:8px;",
                        for entry in entries {
                            div { key: "{entry.ordinal}", style: follower_style(entry.online),
                                div { "Follower #{entry.ordinal}" }
                                div { style: "font-family:monospace;", "{entry.mac}" }
                                div { if entry.online { "online" } else { "offline" } }
                            }
                        }
                    }
                } else {
                    div { style: "color:#94a3b8;", "{NO_FOLLOWERS_TEXT}" }
                }
            }
        }
    }
}
