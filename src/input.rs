use std::time::Instant;

use eframe::egui;

use crate::clicker::{GameState, Purchase};
use crate::config::KeyBindings;
use crate::error::PurchaseRejected;

/// The subset of window events the game reacts to.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum InputEvent {
    KeyPressed(egui::Key),
    LeftClick(egui::Pos2),
}

impl InputEvent {
    /// Filters one raw egui event. Auto-repeated key presses are dropped.
    pub fn from_egui(event: &egui::Event) -> Option<Self> {
        match event {
            egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                ..
            } => Some(InputEvent::KeyPressed(*key)),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                ..
            } => Some(InputEvent::LeftClick(*pos)),
            _ => None,
        }
    }
}

/// What an input event did to the game.
#[derive(PartialEq, Clone, Debug)]
pub enum Action {
    Quit,
    Clicked { gained: u64 },
    Purchased(Purchase),
    Rejected(PurchaseRejected),
}

/// Applies one event to the game state. A click can land on several
/// overlapping buttons; each is tried independently in slot order.
pub fn apply(
    game: &mut GameState,
    bindings: &KeyBindings,
    event: InputEvent,
    now: Instant,
) -> Vec<Action> {
    match event {
        InputEvent::KeyPressed(key) if key == bindings.quit => vec![Action::Quit],
        InputEvent::KeyPressed(key) if key == bindings.click => {
            let gained = game.per_click;
            game.click();
            vec![Action::Clicked { gained }]
        }
        InputEvent::KeyPressed(key) => match bindings.purchase_slot(key) {
            Some(slot) => vec![attempt(game, slot, now)],
            None => Vec::new(),
        },
        InputEvent::LeftClick(pos) => game
            .slots_at(pos)
            .into_iter()
            .map(|slot| attempt(game, slot, now))
            .collect(),
    }
}

fn attempt(game: &mut GameState, slot: usize, now: Instant) -> Action {
    match game.purchase(slot, now) {
        Ok(purchase) => Action::Purchased(purchase),
        Err(why) => Action::Rejected(why),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clicker::Upgrade;
    use crate::config::UPGRADES;

    fn setup(balance: u64) -> (GameState, KeyBindings, Instant) {
        let now = Instant::now();
        (GameState::new(balance, now), KeyBindings::default(), now)
    }

    #[test]
    fn escape_quits() {
        let (mut g, b, now) = setup(0);
        let actions = apply(&mut g, &b, InputEvent::KeyPressed(egui::Key::Escape), now);
        assert_eq!(actions, vec![Action::Quit]);
    }

    #[test]
    fn space_clicks() {
        let (mut g, b, now) = setup(0);
        let actions = apply(&mut g, &b, InputEvent::KeyPressed(egui::Key::Space), now);
        assert_eq!(actions, vec![Action::Clicked { gained: 1 }]);
        assert_eq!(g.balance, 1);
    }

    #[test]
    fn number_keys_buy_their_slot() {
        let (mut g, b, now) = setup(100);
        let actions = apply(&mut g, &b, InputEvent::KeyPressed(egui::Key::Num2), now);
        assert_eq!(
            actions,
            vec![Action::Purchased(Purchase { slot: 1, paid: 25, level: 1 })]
        );
        assert_eq!(g.per_second, 1);
        assert!(g.upgrades[1].flash.is_active(now));
    }

    #[test]
    fn key_and_click_purchase_the_same_way() {
        let (mut by_key, b, now) = setup(50);
        let (mut by_click, _, _) = setup(50);
        apply(&mut by_key, &b, InputEvent::KeyPressed(egui::Key::Num1), now);
        let center = by_click.upgrades[0].rect.center();
        apply(&mut by_click, &b, InputEvent::LeftClick(center), now);
        assert_eq!(by_key.balance, by_click.balance);
        assert_eq!(by_key.per_click, by_click.per_click);
        assert_eq!(by_key.upgrades[0].cost, by_click.upgrades[0].cost);
    }

    #[test]
    fn click_outside_buttons_does_nothing() {
        let (mut g, b, now) = setup(100);
        let actions = apply(&mut g, &b, InputEvent::LeftClick(egui::pos2(5.0, 5.0)), now);
        assert!(actions.is_empty());
        assert_eq!(g.balance, 100);
    }

    #[test]
    fn unbound_key_is_ignored() {
        let (mut g, b, now) = setup(100);
        assert!(apply(&mut g, &b, InputEvent::KeyPressed(egui::Key::Q), now).is_empty());
    }

    #[test]
    fn overlapping_buttons_each_get_a_purchase_attempt() {
        let now = Instant::now();
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let upgrades = vec![Upgrade::new(&UPGRADES[0], rect), Upgrade::new(&UPGRADES[1], rect)];
        let mut g = GameState::with_upgrades(30, upgrades, now);
        let actions = apply(
            &mut g,
            &KeyBindings::default(),
            InputEvent::LeftClick(egui::pos2(50.0, 50.0)),
            now,
        );
        assert_eq!(
            actions,
            vec![
                Action::Purchased(Purchase { slot: 0, paid: 10, level: 1 }),
                Action::Rejected(PurchaseRejected::Unaffordable { cost: 25, balance: 20 }),
            ]
        );
    }

    #[test]
    fn unaffordable_key_purchase_is_rejected() {
        let (mut g, b, now) = setup(5);
        let actions = apply(&mut g, &b, InputEvent::KeyPressed(egui::Key::Num1), now);
        assert_eq!(
            actions,
            vec![Action::Rejected(PurchaseRejected::Unaffordable { cost: 10, balance: 5 })]
        );
        assert_eq!(g.balance, 5);
    }
}
