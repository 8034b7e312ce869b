use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{load_settings, FileAdapter};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::CalcApp;

#[derive(Parser, Debug)]
struct Args {
    /// Address of the computation service (overrides settings and env).
    #[arg(long)]
    base_url: Option<String>,
    /// Settings file; defaults to ./calc.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = &args.base_url {
        settings = settings.with_base_url(base_url)?;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let files = FileAdapter::new(settings.file_range_policy);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Calculation")
            .with_inner_size([960.0, 600.0])
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Calculation",
        options,
        Box::new(move |cc| {
            backend_bridge::runtime::launch(cmd_rx, ui_tx, cc.egui_ctx.clone(), settings);
            Ok(Box::new(CalcApp::new(cmd_tx, ui_rx, files)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to start the window: {err}"))
}
