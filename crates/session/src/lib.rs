//! Client-side room session.
//!
//! One local engine plus one replica engine per other room member. Local
//! input is applied immediately and returned as outbound events for the
//! coordinator; relayed actions and garbage are applied only to the engine
//! whose owner they name.

pub mod clock;
pub mod session;

pub use tetris_versus_types as types;

pub use clock::GravityClock;
pub use session::{Outbound, Replica, Session};
