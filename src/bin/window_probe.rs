//! Opens the game window for one second and exits.
//!
//! Useful for checking that a display and a working GL context are available
//! before launching the game itself.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{error, info};

const TITLE: &str = "Clicker Game";
const HOLD: Duration = Duration::from_secs(1);

struct Probe {
    opened: Option<Instant>,
}

impl eframe::App for Probe {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let opened = *self.opened.get_or_insert(now);

        match HOLD.checked_sub(now.duration_since(opened)) {
            Some(left) if !left.is_zero() => ctx.request_repaint_after(left),
            _ => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        TITLE,
        options,
        Box::new(|_cc| Box::new(Probe { opened: None })),
    );

    match result {
        Ok(()) => {
            info!("window opened and closed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("unable to create window: {e}");
            ExitCode::FAILURE
        }
    }
}
