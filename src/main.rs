#![windows_subsystem = "windows"]

mod clicker;
mod config;
mod error;
mod gui;
mod input;
mod text_cache;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use tracing::{error, info};

use config::Cli;
use error::StartupError;
use gui::ClickerApp;

fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_font(path: &Path) -> Result<Vec<u8>, StartupError> {
    let bytes = std::fs::read(path).map_err(|source| StartupError::Font {
        path: path.to_owned(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(StartupError::EmptyFont(path.to_owned()));
    }
    Ok(bytes)
}

fn run(cli: Cli) -> Result<(), StartupError> {
    let font = load_font(&cli.font)?;
    info!(font = %cli.font.display(), start_balance = cli.start_balance, "starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config::WINDOW_WIDTH, config::WINDOW_HEIGHT])
            .with_resizable(false)
            .with_decorations(true),
        centered: true,
        ..Default::default()
    };

    let start_balance = cli.start_balance;
    eframe::run_native(
        config::WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            gui::install_fonts(&cc.egui_ctx, font);
            Box::new(ClickerApp::new(start_balance))
        }),
    )
    .map_err(|e| StartupError::Window(e.to_string()))?;

    info!("window closed");
    Ok(())
}
