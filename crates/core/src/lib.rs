//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds one player's game engine. It has **zero dependencies**
//! on networking or I/O, which is what makes it usable as a remote replica:
//!
//! - **Deterministic**: the same seed produces the same infinite piece
//!   sequence, and the same ordered actions produce the same board
//! - **Testable**: every game rule is covered by unit tests
//! - **Fast**: stack-only board, queue and projections
//!
//! # Module Structure
//!
//! - [`board`]: 10x24 grid (20 visible + 4 buffer rows), collision, line clears, garbage
//! - [`game_state`]: the engine: active piece, hold, queue, scoring, pause and game over
//! - [`gravity`]: gravity interval schedule
//! - [`pieces`]: tetromino shapes and SRS rotation with wall kicks
//! - [`rng`]: 7-bag random piece generation
//! - [`snapshot`]: read-only rendered board and state snapshot
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every aligned run of 7 pieces holds each kind once
//! - **SRS Rotation**: wall kicks for all pieces except O, which never rotates
//! - **Hold**: store one piece, once per lock
//! - **Scoring**: `100 * lines + 10` per locked piece
//! - **Garbage**: rows pushed in from the bottom with one hole each
//! - **Game Over**: a piece locks inside the buffer rows, or a spawn is blocked
//!
//! # Example
//!
//! ```
//! use tetris_versus_core::GameState;
//! use tetris_versus_core::types::Action;
//!
//! let mut game = GameState::new(42);
//! game.apply(Action::move_right());
//! game.apply(Action::Rotate { clockwise: true });
//! game.apply(Action::HardDrop);
//!
//! assert_eq!(game.score(), 10);
//! ```

pub mod board;
pub mod game_state;
pub mod gravity;
pub mod pieces;
pub mod rng;
pub mod snapshot;

pub use tetris_versus_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{GameState, LockEvent};
pub use gravity::gravity_interval_ms;
pub use pieces::{get_shape, try_rotate, Piece};
pub use rng::{PieceQueue, SimpleRng};
pub use snapshot::{GameSnapshot, RenderCell, RenderedBoard};
