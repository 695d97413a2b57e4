//! Room coordinator.
//!
//! Owns every room's membership, host flag and start state. Operations are
//! plain synchronous functions over [`Rooms`]: each one mutates the map and
//! returns the event to deliver and the connections to deliver it to. The
//! caller owns transport and must call them one at a time, which is what
//! linearises start requests within a room.
//!
//! Randomness (game seed, garbage target) is injected as `&mut impl Rng`.

pub mod rooms;

pub use tetris_versus_types as types;

pub use rooms::{Delivery, Room, RoomCode, RoomEvent, Rooms};
