use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{debug, info};

use crate::config::{self, UpgradeSpec};
use crate::error::PurchaseRejected;

/// Which income rate an upgrade drives.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Effect {
    ClickPower,
    PassiveIncome,
    None,
}

impl Effect {
    /// Per-click income for a click upgrade at `level`.
    pub fn click_power(level: u32) -> u64 {
        1 + 2 * u64::from(level)
    }

    /// Per-second income for an income upgrade at `level`.
    pub fn passive_income(level: u32) -> u64 {
        u64::from(level)
    }
}

/// A moment that stays "recent" for a fixed window after it happened.
#[derive(Clone, Copy, Debug)]
pub struct Flash {
    at: Option<Instant>,
    window: Duration,
}

impl Flash {
    pub fn new(window: Duration) -> Self {
        Self { at: None, window }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.at = Some(now);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        match self.at {
            Some(at) => now.saturating_duration_since(at) < self.window,
            None => false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Upgrade {
    pub rect: egui::Rect,
    pub label: &'static str,
    pub level: u32,
    pub cost: u64,
    pub multiplier: f64,
    pub effect: Effect,
    pub enabled: bool,
    pub flash: Flash,
}

impl Upgrade {
    pub fn new(spec: &UpgradeSpec, rect: egui::Rect) -> Self {
        Self {
            rect,
            label: spec.label,
            level: 0,
            cost: spec.base_cost,
            multiplier: spec.multiplier,
            effect: spec.effect,
            enabled: spec.enabled,
            flash: Flash::new(config::HIGHLIGHT_WINDOW),
        }
    }

    pub fn is_affordable(&self, balance: u64) -> bool {
        self.enabled && balance >= self.cost
    }

    /// Cost after one more purchase, truncated toward zero.
    pub fn next_cost(&self) -> u64 {
        (self.cost as f64 * self.multiplier) as u64
    }
}

/// Result of a successful purchase.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Purchase {
    pub slot: usize,
    pub paid: u64,
    pub level: u32,
}

pub struct GameState {
    pub balance: u64,
    pub per_click: u64,
    pub per_second: u64,
    pub upgrades: Vec<Upgrade>,
    last_tick: Instant,
}

impl GameState {
    /// Builds the game with the standard upgrade row.
    pub fn new(start_balance: u64, now: Instant) -> Self {
        let upgrades = config::UPGRADES
            .iter()
            .enumerate()
            .map(|(i, spec)| Upgrade::new(spec, config::button_rect(i)))
            .collect();
        Self::with_upgrades(start_balance, upgrades, now)
    }

    pub fn with_upgrades(start_balance: u64, upgrades: Vec<Upgrade>, now: Instant) -> Self {
        Self {
            balance: start_balance,
            per_click: Effect::click_power(0),
            per_second: Effect::passive_income(0),
            upgrades,
            last_tick: now,
        }
    }

    /// Manual click: adds the current per-click income.
    pub fn click(&mut self) {
        self.balance = self.balance.saturating_add(self.per_click);
    }

    /// Buys one level of the upgrade in `slot`, or changes nothing.
    pub fn purchase(&mut self, slot: usize, now: Instant) -> Result<Purchase, PurchaseRejected> {
        let balance = self.balance;
        let upgrade = self
            .upgrades
            .get_mut(slot)
            .ok_or(PurchaseRejected::NoSuchSlot(slot))?;
        if !upgrade.enabled {
            return Err(PurchaseRejected::Disabled(slot));
        }
        if balance < upgrade.cost {
            return Err(PurchaseRejected::Unaffordable {
                cost: upgrade.cost,
                balance,
            });
        }

        let paid = upgrade.cost;
        upgrade.level += 1;
        upgrade.cost = upgrade.next_cost();
        upgrade.flash.trigger(now);
        let (level, effect) = (upgrade.level, upgrade.effect);

        self.balance -= paid;
        match effect {
            Effect::ClickPower => self.per_click = Effect::click_power(level),
            Effect::PassiveIncome => self.per_second = Effect::passive_income(level),
            Effect::None => {}
        }

        debug!(slot, paid, level, balance = self.balance, "upgrade purchased");
        Ok(Purchase { slot, paid, level })
    }

    /// Adds passive income once if a full interval has passed since the last
    /// tick. Longer gaps still pay only once.
    pub fn accrue(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) < config::ACCRUAL_INTERVAL {
            return false;
        }
        self.balance = self.balance.saturating_add(self.per_second);
        self.last_tick = now;
        true
    }

    /// Slots whose rectangle contains `pos`, in slot order.
    pub fn slots_at(&self, pos: egui::Pos2) -> Vec<usize> {
        self.upgrades
            .iter()
            .enumerate()
            .filter(|(_, u)| u.rect.contains(pos))
            .map(|(i, _)| i)
            .collect()
    }
}

impl Drop for GameState {
    fn drop(&mut self) {
        info!(balance = self.balance, "game state released");
    }
}
