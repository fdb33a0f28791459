#![warn(clippy::all, rust_2018_idioms)]

mod app;
mod config;
mod controls;
mod obs;
mod state;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::PanelApp;
use crate::config::Config;

/// Slate - control panel for OBS recording sessions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host the obs-websocket server listens on
    #[arg(long)]
    host: Option<String>,

    /// Port of the obs-websocket server
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_figment(args.host, args.port)?;

    // Initialize logging from the configured level, RUST_LOG, or "info"
    let filter = match config.log_level {
        Some(ref level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Starting Slate");
    info!("OBS target: {}", config.url());

    // The GUI owns the main thread; connection tasks run on this runtime
    let runtime = tokio::runtime::Runtime::new()?;
    let handle = runtime.handle().clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([460.0, 220.0])
            .with_title("Slate"),
        ..Default::default()
    };

    eframe::run_native(
        "Slate",
        native_options,
        Box::new(move |cc| Ok(Box::new(PanelApp::new(cc, &config, handle)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))?;

    Ok(())
}
