use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{debug, info};

use crate::clicker::{GameState, Upgrade};
use crate::config::{self, KeyBindings};
use crate::input::{self, Action, InputEvent};
use crate::text_cache::{GalleyRasterizer, TextCache};

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(30, 30, 36);
const TEXT: egui::Color32 = egui::Color32::from_rgb(235, 235, 235);
const DIM_TEXT: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);
const BUTTON_FILL: egui::Color32 = egui::Color32::from_rgb(50, 50, 60);
const DISABLED_FILL: egui::Color32 = egui::Color32::from_rgb(40, 40, 44);

const HELP: &str = "Space: click    1-4: buy upgrade    Esc: quit";

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Caps the frame rate by reporting how much of the frame budget is left.
pub struct FrameClock {
    budget: Duration,
    started: Instant,
}

impl FrameClock {
    pub fn new(budget: Duration, now: Instant) -> Self {
        Self { budget, started: now }
    }

    pub fn begin(&mut self, now: Instant) {
        self.started = now;
    }

    /// Time to wait before the next frame, or `None` if the budget is spent.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.budget
            .checked_sub(now.saturating_duration_since(self.started))
            .filter(|left| !left.is_zero())
    }
}

/// Border of an upgrade button.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct BorderStyle {
    pub color: egui::Color32,
    pub thickness: f32,
}

pub fn border_style(affordable: bool, highlighted: bool) -> BorderStyle {
    match (affordable, highlighted) {
        (true, false) => BorderStyle {
            color: egui::Color32::from_rgb(0, 170, 80),
            thickness: 4.0,
        },
        (true, true) => BorderStyle {
            color: egui::Color32::from_rgb(90, 255, 140),
            thickness: 8.0,
        },
        (false, false) => BorderStyle {
            color: egui::Color32::from_rgb(130, 40, 40),
            thickness: 4.0,
        },
        (false, true) => BorderStyle {
            color: egui::Color32::from_rgb(220, 70, 70),
            thickness: 8.0,
        },
    }
}

type GalleyCache = TextCache<Arc<egui::Galley>>;

/// Every piece of text that changes while playing.
struct Hud {
    balance: GalleyCache,
    click_power: GalleyCache,
    per_second: GalleyCache,
    levels: Vec<GalleyCache>,
    costs: Vec<GalleyCache>,
}

impl Hud {
    fn new(upgrades: &[Upgrade]) -> Self {
        Self {
            balance: TextCache::new(egui::pos2(60.0, 60.0)),
            click_power: TextCache::new(egui::pos2(60.0, 150.0)),
            per_second: TextCache::new(egui::pos2(60.0, 195.0)),
            levels: upgrades
                .iter()
                .map(|u| TextCache::new(u.rect.min + egui::vec2(24.0, 100.0)))
                .collect(),
            costs: upgrades
                .iter()
                .map(|u| TextCache::new(u.rect.min + egui::vec2(24.0, 150.0)))
                .collect(),
        }
    }
}

fn bold(size: f32) -> egui::FontId {
    egui::FontId::new(size, egui::FontFamily::Name(config::FONT_FAMILY.into()))
}

/// Registers the game font under its own family name.
pub fn install_fonts(ctx: &egui::Context, font: Vec<u8>) {
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(config::FONT_FAMILY.to_owned(), egui::FontData::from_owned(font));
    fonts.families.insert(
        egui::FontFamily::Name(config::FONT_FAMILY.into()),
        vec![config::FONT_FAMILY.to_owned()],
    );
    ctx.set_fonts(fonts);
}

fn upgrade_button(
    painter: &egui::Painter,
    upgrade: &Upgrade,
    level: &mut GalleyCache,
    cost: &mut GalleyCache,
    small: &mut GalleyRasterizer<'_>,
    style: BorderStyle,
) {
    painter.rect_filled(upgrade.rect, egui::Rounding::same(6.0), style.color);

    let inner = upgrade.rect.shrink(style.thickness);
    let fill = if upgrade.enabled { BUTTON_FILL } else { DISABLED_FILL };
    painter.rect_filled(inner, egui::Rounding::same(4.0), fill);

    let text_color = if upgrade.enabled { TEXT } else { DIM_TEXT };
    painter.text(
        upgrade.rect.min + egui::vec2(24.0, 24.0),
        egui::Align2::LEFT_TOP,
        upgrade.label,
        bold(config::LARGE_FONT_SIZE),
        text_color,
    );

    level.paint(painter, small, &format!("Level {}", upgrade.level), text_color);
    let cost_text = if upgrade.enabled {
        format!("Cost: {}", upgrade.cost)
    } else {
        "Locked".to_owned()
    };
    cost.paint(painter, small, &cost_text, text_color);
}

pub struct ClickerApp {
    state: LoopState,
    hud: Hud,
    game: GameState,
    bindings: KeyBindings,
    clock: FrameClock,
}

impl ClickerApp {
    pub fn new(start_balance: u64) -> Self {
        let now = Instant::now();
        let game = GameState::new(start_balance, now);
        Self {
            state: LoopState::Running,
            hud: Hud::new(&game.upgrades),
            game,
            bindings: KeyBindings::default(),
            clock: FrameClock::new(config::FRAME_BUDGET, now),
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context, now: Instant) {
        let events = ctx.input(|i| i.events.clone());
        for event in events.iter().filter_map(InputEvent::from_egui) {
            if self.state == LoopState::Terminated {
                break;
            }
            for action in input::apply(&mut self.game, &self.bindings, event, now) {
                match action {
                    Action::Quit => {
                        info!("quit requested");
                        self.state = LoopState::Terminated;
                    }
                    Action::Purchased(p) => {
                        info!(slot = p.slot, level = p.level, paid = p.paid, "upgrade bought")
                    }
                    Action::Clicked { gained } => debug!(gained, "click"),
                    Action::Rejected(why) => debug!(%why, "purchase rejected"),
                }
            }
        }
    }

    fn render(&mut self, ctx: &egui::Context, now: Instant) {
        let hover = ctx.input(|i| i.pointer.hover_pos());
        let mut large = GalleyRasterizer::new(ctx, bold(config::LARGE_FONT_SIZE));
        let mut small = GalleyRasterizer::new(ctx, bold(config::SMALL_FONT_SIZE));
        let hud = &mut self.hud;
        let game = &self.game;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let painter = ui.painter();

                hud.balance
                    .paint(painter, &mut large, &format!("Balance: {}", game.balance), TEXT);
                hud.click_power.paint(
                    painter,
                    &mut small,
                    &format!("Click power: {}", game.per_click),
                    TEXT,
                );
                hud.per_second.paint(
                    painter,
                    &mut small,
                    &format!("Per second: {}", game.per_second),
                    TEXT,
                );
                painter.text(
                    egui::pos2(60.0, 300.0),
                    egui::Align2::LEFT_TOP,
                    HELP,
                    bold(config::SMALL_FONT_SIZE),
                    DIM_TEXT,
                );

                let slots = game.upgrades.iter().zip(&mut hud.levels).zip(&mut hud.costs);
                for ((upgrade, level), cost) in slots {
                    let hovered = hover.map_or(false, |pos| upgrade.rect.contains(pos));
                    let style = border_style(
                        upgrade.is_affordable(game.balance),
                        hovered || upgrade.flash.is_active(now),
                    );
                    upgrade_button(painter, upgrade, level, cost, &mut small, style);
                }
            });
    }
}

impl eframe::App for ClickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state == LoopState::Terminated {
            return;
        }

        let now = Instant::now();
        self.clock.begin(now);

        self.handle_input(ctx, now);
        if self.state == LoopState::Terminated {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        if self.game.accrue(now) {
            debug!(balance = self.game.balance, "passive income");
        }

        self.render(ctx, now);

        match self.clock.remaining(Instant::now()) {
            Some(left) => ctx.request_repaint_after(left),
            None => ctx.request_repaint(),
        }
    }
}

impl Drop for ClickerApp {
    fn drop(&mut self) {
        info!("shutting down");
    }
}
