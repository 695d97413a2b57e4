//! Keyboard front end for the local player of a [`Session`].
//!
//! One-shot keys dispatch on the press edge. Movement keys arm the
//! [`RepeatPoller`], which the owner drives every frame through
//! [`KeyboardDriver::poll`]. Held keys are dropped whenever the local game
//! stops being playable (paused, over, or not started yet).

use crossterm::event::{KeyEvent, KeyEventKind};
use log::debug;

use crate::handler::RepeatPoller;
use crate::map::{handle_key_event, HeldKey};
use crate::session::{Outbound, Session};

#[derive(Debug, Clone, Default)]
pub struct KeyboardDriver {
    poller: RepeatPoller,
}

impl KeyboardDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_interval_ms(&self) -> u32 {
        self.poller.poll_interval_ms()
    }

    pub fn is_held(&self, key: HeldKey) -> bool {
        self.poller.is_held(key)
    }

    /// Forget every held key.
    ///
    /// For terminals that never report key releases: call once per frame
    /// so a press moves once and the terminal's own auto-repeat does the rest.
    pub fn release_all(&mut self) {
        self.poller.reset();
    }

    /// Handle one terminal key event and return what must be sent.
    pub fn on_key(&mut self, session: &mut Session, key: KeyEvent) -> Vec<Outbound> {
        match key.kind {
            KeyEventKind::Release => {
                self.poller.handle_key_release(key.code);
                Vec::new()
            }
            // Terminal auto-repeat; the poller owns repeats.
            KeyEventKind::Repeat => Vec::new(),
            KeyEventKind::Press => {
                if self.poller.handle_key_press(key.code) {
                    self.suspend_unless_playable(session);
                    return Vec::new();
                }
                let Some(action) = handle_key_event(key) else {
                    return Vec::new();
                };
                let out = session.dispatch(action).into_iter().collect();
                self.suspend_unless_playable(session);
                out
            }
        }
    }

    /// Advance the repeat timers by `elapsed_ms` and dispatch due moves.
    pub fn poll(&mut self, session: &mut Session, elapsed_ms: u32) -> Vec<Outbound> {
        if self.suspend_unless_playable(session) {
            return Vec::new();
        }
        let mut out = Vec::new();
        for action in self.poller.poll(elapsed_ms) {
            out.extend(session.dispatch(action));
        }
        self.suspend_unless_playable(session);
        out
    }

    /// Reset the repeat timers if the local game cannot take input.
    /// Returns whether it did.
    fn suspend_unless_playable(&mut self, session: &Session) -> bool {
        let playable = session.local().is_some_and(|local| local.playable());
        if !playable {
            debug!("input suspended for {}", session.own_name());
            self.poller.reset();
        }
        !playable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, Member};
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn started() -> Session {
        let mut session = Session::new("alice");
        session.on_members(vec![Member {
            display_name: "alice".to_string(),
            connection_id: "c1".to_string(),
            is_host: true,
        }]);
        session.on_game_started(7);
        session
    }

    #[test]
    fn test_held_key_moves_local_piece() {
        let mut session = started();
        let mut driver = KeyboardDriver::new();
        let x = session.local().unwrap().active().unwrap().x;

        assert!(driver.on_key(&mut session, press(KeyCode::Left)).is_empty());
        assert!(driver.is_held(HeldKey::Left));

        let out = driver.poll(&mut session, 16);
        assert_eq!(out, vec![Outbound::GameAction(Action::move_left())]);
        assert_eq!(session.local().unwrap().active().unwrap().x, x - 1);

        driver.on_key(&mut session, release(KeyCode::Left));
        assert!(driver.poll(&mut session, 200).is_empty());

        driver.on_key(&mut session, press(KeyCode::Right));
        driver.release_all();
        assert!(driver.poll(&mut session, 16).is_empty());
    }

    #[test]
    fn test_one_shot_keys_dispatch_on_press() {
        let mut session = started();
        let mut driver = KeyboardDriver::new();

        let out = driver.on_key(&mut session, press(KeyCode::Char(' ')));
        assert_eq!(out, vec![Outbound::GameAction(Action::HardDrop)]);
        assert_eq!(session.local().unwrap().score(), 10);
    }

    #[test]
    fn test_pause_drops_held_keys() {
        let mut session = started();
        let mut driver = KeyboardDriver::new();
        driver.on_key(&mut session, press(KeyCode::Right));
        driver.poll(&mut session, 16);

        let out = driver.on_key(&mut session, press(KeyCode::Char('p')));
        assert_eq!(out, vec![Outbound::GameAction(Action::Pause)]);
        assert!(!driver.is_held(HeldKey::Right));
        assert!(driver.poll(&mut session, 500).is_empty());

        // Presses while paused do not arm the timer either.
        driver.on_key(&mut session, press(KeyCode::Down));
        assert!(!driver.is_held(HeldKey::SoftDrop));

        driver.on_key(&mut session, press(KeyCode::Char('p')));
        assert!(driver.poll(&mut session, 500).is_empty());
    }

    #[test]
    fn test_game_over_drops_held_keys() {
        let mut session = started();
        let mut driver = KeyboardDriver::new();
        driver.on_key(&mut session, press(KeyCode::Left));

        let mut drops = 0;
        while !session.local().unwrap().game_over() {
            driver.on_key(&mut session, press(KeyCode::Char(' ')));
            drops += 1;
            assert!(drops < 200, "never topped out");
        }

        assert!(!driver.is_held(HeldKey::Left));
        assert!(driver.poll(&mut session, 500).is_empty());
    }

    #[test]
    fn test_input_before_start_is_ignored() {
        let mut session = Session::new("alice");
        let mut driver = KeyboardDriver::new();
        driver.on_key(&mut session, press(KeyCode::Left));
        assert!(!driver.is_held(HeldKey::Left));
        assert!(driver.on_key(&mut session, press(KeyCode::Char(' '))).is_empty());
        assert!(driver.poll(&mut session, 16).is_empty());
    }
}
