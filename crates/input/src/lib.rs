//! Keyboard input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Action`] values and
//! provides the held-key repeat poller. One-shot keys (rotate, hard drop,
//! hold, pause) dispatch on the key edge; movement keys are only recorded as
//! held and the poller turns them into repeated moves. [`KeyboardDriver`]
//! feeds both into a room [`session::Session`].

pub mod driver;
pub mod handler;
pub mod map;

pub use tetris_versus_session as session;
pub use tetris_versus_types as types;

pub use driver::KeyboardDriver;
pub use handler::RepeatPoller;
pub use map::{handle_key_event, held_key, should_quit, HeldKey};
