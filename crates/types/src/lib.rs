//! Core types module - shared data structures and constants
//!
//! This crate defines the vocabulary shared by the engine, the room
//! coordinator, the client session and the wire adapter. Everything here is
//! plain data with no external dependencies.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Visible height**: 20 rows
//! - **Buffer rows**: 4 hidden rows above the visible area
//! - **Total height**: 24 rows (indexed 0-23, row 0 is the top buffer row)
//! - **Spawn origin**: column 5, row 1
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INPUT_POLL_MS` | 16 | Held-key polling period |
//! | `MOVE_REPEAT_MS` | 100 | Repeat cadence for a held horizontal key |
//! | `SOFT_DROP_REPEAT_MS` | 50 | Repeat cadence for a held soft-drop key |
//! | `BASE_GRAVITY_MS` | 1000 | Gravity interval with zero lines cleared |
//! | `GRAVITY_STEP_MS` | 50 | Gravity speed-up per cleared line |
//! | `GRAVITY_FLOOR_MS` | 100 | Fastest gravity interval |
//!
//! # Examples
//!
//! ```
//! use tetris_versus_types::{Action, PieceKind, Rotation, BOARD_WIDTH, TOTAL_HEIGHT};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Action::tick(), Action::Move { dx: 0, dy: 1 });
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(TOTAL_HEIGHT, 24);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Playable (rendered) height in cells (20 rows)
pub const VISIBLE_HEIGHT: u8 = 20;

/// Hidden rows above the visible area used to detect overflow
pub const BUFFER_ROWS: u8 = 4;

/// Full grid height including buffer rows
pub const TOTAL_HEIGHT: u8 = VISIBLE_HEIGHT + BUFFER_ROWS;

/// Spawn origin column
pub const SPAWN_X: i8 = 5;

/// Spawn origin row
pub const SPAWN_Y: i8 = 1;

/// Number of upcoming pieces exposed by the queue
pub const QUEUE_LOOKAHEAD: usize = 5;

/// Points per cleared line
pub const LINE_CLEAR_POINTS: u32 = 100;

/// Points awarded for every locked piece
pub const PLACEMENT_POINTS: u32 = 10;

/// Held-key polling period
pub const INPUT_POLL_MS: u32 = 16;

/// Repeat cadence for held left/right
pub const MOVE_REPEAT_MS: u32 = 100;

/// Repeat cadence for held soft drop
pub const SOFT_DROP_REPEAT_MS: u32 = 50;

/// Gravity interval at zero cleared lines
pub const BASE_GRAVITY_MS: u32 = 1000;

/// Gravity interval decrease per cleared line
pub const GRAVITY_STEP_MS: u32 = 50;

/// Minimum gravity interval
pub const GRAVITY_FLOOR_MS: u32 = 100;

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical bag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_versus_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Uppercase single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Rotation state (facing)
///
/// - **North**: spawn orientation (0°)
/// - **East**: 90° clockwise
/// - **South**: 180°
/// - **West**: 270° clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use tetris_versus_types::Rotation;
    ///
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    ///
    /// ```
    /// use tetris_versus_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Number of clockwise quarter turns from North (0..=3)
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// A discrete, replayable engine input.
///
/// This is the single contract between local dispatch and network relay:
/// anything that is not an `Action` cannot be synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Translate the current piece; a blocked downward move locks it
    Move { dx: i8, dy: i8 },
    /// Rotate with wall kicks
    Rotate { clockwise: bool },
    /// Drop to the landing position and lock immediately
    HardDrop,
    /// Swap with (or stash into) the hold slot
    Hold,
    /// Toggle pause
    Pause,
    /// Inject garbage rows at the bottom
    ReceiveGarbage { lines: u32 },
}

impl Action {
    /// One gravity step
    pub fn tick() -> Self {
        Action::Move { dx: 0, dy: 1 }
    }

    pub fn move_left() -> Self {
        Action::Move { dx: -1, dy: 0 }
    }

    pub fn move_right() -> Self {
        Action::Move { dx: 1, dy: 0 }
    }
}

/// A cell on the game board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Locked piece cell, tagged with its shape
    Piece(PieceKind),
    /// Injected garbage
    Garbage,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        !self.is_empty()
    }
}

/// A participant in a room, as broadcast in membership lists
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    pub display_name: String,
    pub connection_id: String,
    pub is_host: bool,
}
