//! # lms-client
//!
//! Leptos + WASM front end for the classroom learning-management system.
//!
//! The crate's core is the session store (`state::session`), which restores
//! and persists the signed-in identity, and the navigation guard
//! (`router::guard`), which gates every route on authentication and role.
//! Pages and components are thin views over those two.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod router;
pub mod state;

/// Browser entry point: install logging, restore the session, then mount.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed, which leaves logging working.
    let _ = console_log::init_with_level(log::Level::Debug);
    wasm_bindgen_futures::spawn_local(bootstrap());
}

#[cfg(feature = "csr")]
async fn bootstrap() {
    use leptos::prelude::*;

    use crate::app::App;

    let config = crate::config::ClientConfig::from_build_env();
    let api = crate::net::request::ApiClient::new(&config);
    let store = crate::state::session::SessionStore::restore(crate::state::storage::LocalStorage, &api).await;
    log::info!("mounting app: authorized={}", store.snapshot().authorized);

    leptos::mount::mount_to_body(move || view! { <App store=store config=config/> });
}
