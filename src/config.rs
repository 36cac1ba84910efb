use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use eframe::egui;

use crate::clicker::Effect;

pub const WINDOW_TITLE: &str = "Clicker Game";
pub const WINDOW_WIDTH: f32 = 1920.0;
pub const WINDOW_HEIGHT: f32 = 1080.0;

/// 60 frames per second.
pub const FRAME_BUDGET: Duration = Duration::from_micros(1_000_000 / 60);
pub const ACCRUAL_INTERVAL: Duration = Duration::from_millis(1000);
pub const HIGHLIGHT_WINDOW: Duration = Duration::from_millis(200);

pub const LARGE_FONT_SIZE: f32 = 48.0;
pub const SMALL_FONT_SIZE: f32 = 28.0;
pub const FONT_FAMILY: &str = "bold";
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

// Upgrade button row
const BUTTON_LEFT: f32 = 60.0;
const BUTTON_TOP: f32 = 420.0;
const BUTTON_WIDTH: f32 = 420.0;
const BUTTON_HEIGHT: f32 = 220.0;
const BUTTON_GAP: f32 = 40.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "A small desktop clicker game")]
pub struct Cli {
    /// Bold sans-serif TTF used for every piece of text
    #[arg(long, default_value = DEFAULT_FONT_PATH)]
    pub font: PathBuf,
    /// Currency the player starts with
    #[arg(long, default_value_t = 0)]
    pub start_balance: u64,
}

/// Static description of one upgrade slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeSpec {
    pub label: &'static str,
    pub base_cost: u64,
    pub multiplier: f64,
    pub effect: Effect,
    pub enabled: bool,
}

pub const UPGRADES: [UpgradeSpec; 4] = [
    UpgradeSpec {
        label: "Click Power",
        base_cost: 10,
        multiplier: 1.5,
        effect: Effect::ClickPower,
        enabled: true,
    },
    UpgradeSpec {
        label: "Auto Clicker",
        base_cost: 25,
        multiplier: 1.6,
        effect: Effect::PassiveIncome,
        enabled: true,
    },
    UpgradeSpec {
        label: "Coming Soon",
        base_cost: 100,
        multiplier: 1.7,
        effect: Effect::None,
        enabled: false,
    },
    UpgradeSpec {
        label: "Coming Soon",
        base_cost: 500,
        multiplier: 1.8,
        effect: Effect::None,
        enabled: false,
    },
];

/// Screen rectangle of the button for upgrade slot `index`.
pub fn button_rect(index: usize) -> egui::Rect {
    let x = BUTTON_LEFT + index as f32 * (BUTTON_WIDTH + BUTTON_GAP);
    egui::Rect::from_min_size(
        egui::pos2(x, BUTTON_TOP),
        egui::vec2(BUTTON_WIDTH, BUTTON_HEIGHT),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    pub quit: egui::Key,
    pub click: egui::Key,
    /// One key per upgrade slot, in slot order.
    pub purchase: Vec<egui::Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: egui::Key::Escape,
            click: egui::Key::Space,
            purchase: vec![
                egui::Key::Num1,
                egui::Key::Num2,
                egui::Key::Num3,
                egui::Key::Num4,
            ],
        }
    }
}

impl KeyBindings {
    pub fn purchase_slot(&self, key: egui::Key) -> Option<usize> {
        self.purchase.iter().position(|k| *k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_do_not_overlap_and_fit_the_window() {
        for i in 0..UPGRADES.len() {
            let rect = button_rect(i);
            assert!(rect.max.x <= WINDOW_WIDTH);
            assert!(rect.max.y <= WINDOW_HEIGHT);
            if i > 0 {
                assert!(!rect.intersects(button_rect(i - 1)));
            }
        }
    }

    #[test]
    fn every_slot_has_a_purchase_key() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.purchase.len(), UPGRADES.len());
        assert_eq!(bindings.purchase_slot(egui::Key::Num3), Some(2));
        assert_eq!(bindings.purchase_slot(egui::Key::Space), None);
    }

    #[test]
    fn live_upgrades_grow_in_price() {
        for spec in UPGRADES.iter() {
            assert!(spec.base_cost > 0);
            assert!(spec.multiplier > 1.0);
        }
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["clicker_game"]);
        assert_eq!(cli.font, PathBuf::from(DEFAULT_FONT_PATH));
        assert_eq!(cli.start_balance, 0);

        let cli = Cli::parse_from(["clicker_game", "--start-balance", "1000", "--font", "a.ttf"]);
        assert_eq!(cli.start_balance, 1000);
        assert_eq!(cli.font, PathBuf::from("a.ttf"));
    }
}
