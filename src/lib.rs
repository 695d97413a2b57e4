//! Tetris Versus (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `tetris_versus::{adapter,core,input,room,session,types}`.

pub use tetris_versus_adapter as adapter;
pub use tetris_versus_core as core;
pub use tetris_versus_input as input;
pub use tetris_versus_room as room;
pub use tetris_versus_session as session;
pub use tetris_versus_types as types;
