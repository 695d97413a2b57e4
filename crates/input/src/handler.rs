//! Held-key repeat poller.
//!
//! Driven by a fixed-period poll (see [`INPUT_POLL_MS`]). A held key fires on
//! the first poll after its press, then again whenever its cadence has
//! elapsed since the last fire: [`MOVE_REPEAT_MS`] for left/right and
//! [`SOFT_DROP_REPEAT_MS`] for soft drop.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::map::{held_key, HeldKey};
use crate::types::{Action, INPUT_POLL_MS, MOVE_REPEAT_MS, SOFT_DROP_REPEAT_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum KeyState {
    #[default]
    Released,
    /// Held, not fired yet
    Pressed,
    /// Held; milliseconds since the last fire
    Repeating(u32),
}

impl KeyState {
    fn poll(&mut self, elapsed_ms: u32, cadence_ms: u32) -> bool {
        match *self {
            KeyState::Released => false,
            KeyState::Pressed => {
                *self = KeyState::Repeating(0);
                true
            }
            KeyState::Repeating(since) => {
                let since = since.saturating_add(elapsed_ms);
                if since >= cadence_ms {
                    *self = KeyState::Repeating(0);
                    true
                } else {
                    *self = KeyState::Repeating(since);
                    false
                }
            }
        }
    }
}

/// Tracks held movement keys and emits repeated moves.
#[derive(Debug, Clone, Default)]
pub struct RepeatPoller {
    left: KeyState,
    right: KeyState,
    soft_drop: KeyState,
}

impl RepeatPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polling period the owner should drive [`RepeatPoller::poll`] at
    pub fn poll_interval_ms(&self) -> u32 {
        INPUT_POLL_MS
    }

    fn state_mut(&mut self, key: HeldKey) -> &mut KeyState {
        match key {
            HeldKey::Left => &mut self.left,
            HeldKey::Right => &mut self.right,
            HeldKey::SoftDrop => &mut self.soft_drop,
        }
    }

    /// Record a press. Returns `true` if the key is a movement key.
    ///
    /// Auto-repeated press events for a key that is already held are ignored.
    pub fn handle_key_press(&mut self, code: KeyCode) -> bool {
        let Some(key) = held_key(code) else {
            return false;
        };
        let state = self.state_mut(key);
        if *state == KeyState::Released {
            *state = KeyState::Pressed;
        }
        true
    }

    /// Release clears the key's timer.
    pub fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(key) = held_key(code) {
            *self.state_mut(key) = KeyState::Released;
        }
    }

    pub fn is_held(&self, key: HeldKey) -> bool {
        let state = match key {
            HeldKey::Left => self.left,
            HeldKey::Right => self.right,
            HeldKey::SoftDrop => self.soft_drop,
        };
        state != KeyState::Released
    }

    /// Advance by `elapsed_ms` and return the moves due on this poll.
    pub fn poll(&mut self, elapsed_ms: u32) -> ArrayVec<Action, 3> {
        let mut actions = ArrayVec::new();

        if self.left.poll(elapsed_ms, MOVE_REPEAT_MS) {
            actions.push(HeldKey::Left.action());
        }
        if self.right.poll(elapsed_ms, MOVE_REPEAT_MS) {
            actions.push(HeldKey::Right.action());
        }
        if self.soft_drop.poll(elapsed_ms, SOFT_DROP_REPEAT_MS) {
            actions.push(HeldKey::SoftDrop.action());
        }

        actions
    }

    /// Drop all held state. Called when the game pauses or ends.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
