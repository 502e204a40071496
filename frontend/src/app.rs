// frontend/src/app.rs

use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

// --- global css ---
const GLOBAL_CSS: &str = r#"
html, body {
    margin: 0;
    padding: 0;
    width: 100%;
    height: 100%;
    background: #020617;
    overflow: hidden;
}

:root, html {
    color-scheme: dark;
}

#main {
    width: 100%;
    height: 100%;
    background: #020617;
}

* { box-sizing: border-box; }
"#;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[route("/")]
    Dashboard {},
}

#[component]
pub fn App() -> Element {
    rsx! {
        document::Style { "{GLOBAL_CSS}" }
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }

        div {
            style: "min-height: 100vh; width: 100%; background: #020617; color: #e5e7eb;",
            Router::<Route> {}
        }
    }
}

#[component]
pub fn Dashboard() -> Element {
    rsx! { crate::telemetry_dashboard::TelemetryDashboard {} }
}
