use console_frontend::app;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(target_arch = "wasm32"))]
fn init_panic_hook() {}

#[cfg(target_arch = "wasm32")]
fn main() {
    init_panic_hook();
    dioxus::logger::initialize_default();

    launch(app::App);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    init_panic_hook();
    dioxus::logger::initialize_default();

    let cfg = dioxus_desktop::Config::new().with_window(
        dioxus_desktop::WindowBuilder::new().with_title("Balance-bot console"),
    );
    LaunchBuilder::desktop().with_cfg(cfg).launch(app::App);
}
