// SPDX-License-Identifier: MIT OR Apache-2.0
//! Puppet Editor - sprite puppet animation editor
//!
//! Sprites are loaded into a pool, appended to a timeline of parts and played
//! back at a fixed tick rate. Projects are saved as JSON plus a packed sprite
//! sheet and can be exported as animated GIFs.
//!
//! ## Architecture
//!
//! The timeline, playback and export core lives in `puppet_editor_timeline`.
//! This binary adds file formats, background I/O and the egui shell, with
//! `egui_dock` for panel docking.

mod app;
mod clock;
mod config;
mod dialogs;
mod loader;
mod menus;
mod notices;
mod panel_types;
mod panels;
mod project;
mod sheet;
mod state;
mod tasks;
mod textures;

use app::EditorApp;
use config::{EditorConfig, CONFIG_FILE_NAME};
use panels::log::TracingBridge;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_LOG_FILTER: &str = "puppet_editor_app=debug,puppet_editor_timeline=debug,wgpu=warn,naga=warn";

fn main() {
    // Create the log panel tracing bridge (channel pair)
    let (bridge_layer, tracing_rx) = TracingBridge::new();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(bridge_layer)
        .init();

    tracing::info!("Starting Puppet Editor v{}", env!("CARGO_PKG_VERSION"));

    let config = EditorConfig::load_or_default(Path::new(CONFIG_FILE_NAME));

    if let Err(e) = EditorApp::run(config, Some(tracing_rx)) {
        tracing::error!("Editor crashed: {e}");
        std::process::exit(1);
    }
}
