//! Game state module - one player's deterministic engine
//!
//! Ties together the board, the active piece, the bag queue and scoring.
//! Every operation is a transition in a small state machine with the states
//! active, paused and game-over. Invalid transitions are silent no-ops that
//! return `false`; nothing here fails or performs I/O.

use crate::board::Board;
use crate::gravity::gravity_interval_ms;
use crate::pieces::{try_rotate, Piece};
use crate::rng::{PieceQueue, SimpleRng};
use crate::snapshot::{GameSnapshot, RenderCell, RenderedBoard};
use crate::types::*;

/// Mixed into the seed for the garbage-hole generator so it does not replay
/// the bag shuffles.
const GARBAGE_SEED_SALT: u32 = 0x9E37_79B9;

/// Outcome of the most recent lock, consumed by the owner after a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub points: u32,
    /// The locked piece reached a buffer row and ended the game
    pub topped_out: bool,
}

/// Complete game state for one board
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<Piece>,
    hold: Option<PieceKind>,
    piece_queue: PieceQueue,
    garbage_rng: SimpleRng,
    seed: u32,
    score: u32,
    lines: u32,
    can_hold: bool,
    paused: bool,
    game_over: bool,
    /// Bumped after every operation that changed state.
    revision: u64,
    last_event: Option<LockEvent>,
}

impl GameState {
    /// Create a new game with the given seed and spawn the first piece
    pub fn new(seed: u32) -> Self {
        let mut state = Self {
            board: Board::new(),
            active: None,
            hold: None,
            piece_queue: PieceQueue::new(seed),
            garbage_rng: SimpleRng::new(seed ^ GARBAGE_SEED_SALT),
            seed,
            score: 0,
            lines: 0,
            can_hold: true,
            paused: false,
            game_over: false,
            revision: 0,
            last_event: None,
        };
        state.spawn_next();
        state
    }

    /// A fresh game for a local restart, seeded `seed + 1`
    pub fn restarted(&self) -> Self {
        Self::new(self.seed.wrapping_add(1))
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Neither paused nor over
    pub fn playable(&self) -> bool {
        !self.paused && !self.game_over
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Upcoming pieces, in draw order
    pub fn next_queue(&self) -> [PieceKind; QUEUE_LOOKAHEAD] {
        self.piece_queue.upcoming()
    }

    /// Current gravity period for this board's line count
    pub fn gravity_interval_ms(&self) -> u32 {
        gravity_interval_ms(self.lines)
    }

    /// Hard-drop landing position, only when it differs from the active piece
    pub fn ghost(&self) -> Option<Piece> {
        let active = self.active?;
        let landed = self.board.drop_position(&active);
        (landed != active).then_some(landed)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Pull the next piece from the queue into play.
    ///
    /// A blocked spawn ends the game.
    fn spawn_next(&mut self) {
        let piece = Piece::spawn(self.piece_queue.next_piece());
        self.place_active(piece);
    }

    fn place_active(&mut self, piece: Piece) {
        if self.board.fits(&piece) {
            self.active = Some(piece);
        } else {
            self.active = None;
            self.game_over = true;
        }
    }

    /// Translate the active piece.
    ///
    /// Returns whether the piece moved. A blocked downward move locks the
    /// piece instead (check `take_last_event`); any other blocked move
    /// changes nothing.
    pub fn move_piece(&mut self, dx: i8, dy: i8) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        // Offsets arrive from peers unchecked; an overflowing one cannot fit.
        if let Some(candidate) = active.checked_moved(dx, dy).filter(|p| self.board.fits(p)) {
            self.active = Some(candidate);
            self.touch();
            return true;
        }

        if dy > 0 {
            self.lock_piece();
        }
        false
    }

    /// One gravity step
    pub fn tick(&mut self) -> bool {
        self.move_piece(0, 1)
    }

    /// Rotate the active piece with SRS wall kicks
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        // O piece doesn't rotate
        if active.kind == PieceKind::O {
            return false;
        }

        match try_rotate(&active, clockwise, |p| self.board.fits(p)) {
            Some(rotated) => {
                self.active = Some(rotated);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Drop the active piece to its landing position and lock it
    pub fn hard_drop(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        self.active = Some(self.board.drop_position(&active));
        self.lock_piece();
        true
    }

    /// Stash the active piece, or swap it with the held one.
    ///
    /// Available once per lock.
    pub fn hold(&mut self) -> bool {
        if !self.playable() || !self.can_hold {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match self.hold.replace(active.kind) {
            Some(held) => self.place_active(Piece::spawn(held)),
            None => self.spawn_next(),
        }

        self.can_hold = false;
        self.touch();
        true
    }

    /// Toggle pause. Has no effect once the game is over.
    pub fn pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = !self.paused;
        self.touch();
        true
    }

    /// Push `lines` garbage rows in from the bottom.
    ///
    /// Accepted while paused. The active piece is left where it is.
    pub fn receive_garbage(&mut self, lines: u32) -> bool {
        if self.game_over || lines == 0 {
            return false;
        }
        self.board
            .inject_garbage(lines as usize, &mut self.garbage_rng);
        self.touch();
        true
    }

    /// Lock the active piece onto the board and handle line clears
    fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board.place(&active);
        let lines_cleared = self.board.clear_full_rows();
        let points = LINE_CLEAR_POINTS * lines_cleared + PLACEMENT_POINTS;

        self.score = self.score.saturating_add(points);
        self.lines += lines_cleared;

        let topped_out = active
            .cells()
            .iter()
            .any(|&(_, y)| y < BUFFER_ROWS as i8);

        self.last_event = Some(LockEvent {
            lines_cleared,
            points,
            topped_out,
        });

        if topped_out {
            self.game_over = true;
        } else {
            self.spawn_next();
            self.can_hold = true;
        }
        self.touch();
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Apply a game action
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Move { dx, dy } => self.move_piece(dx, dy),
            Action::Rotate { clockwise } => self.rotate(clockwise),
            Action::HardDrop => self.hard_drop(),
            Action::Hold => self.hold(),
            Action::Pause => self.pause(),
            Action::ReceiveGarbage { lines } => self.receive_garbage(lines),
        }
    }

    /// Board with the ghost and active piece drawn in
    pub fn render(&self) -> RenderedBoard {
        let mut out = RenderedBoard::from_board(&self.board);

        if let Some(ghost) = self.ghost() {
            for (x, y) in ghost.cells() {
                out.set(x, y, RenderCell::Ghost);
            }
        }
        if let Some(active) = self.active {
            for (x, y) in active.cells() {
                out.set(x, y, RenderCell::Piece(active.kind));
            }
        }

        out
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.render(),
            active: self.active,
            hold: self.hold,
            next_queue: self.next_queue(),
            can_hold: self.can_hold,
            paused: self.paused,
            game_over: self.game_over,
            seed: self.seed,
            score: self.score,
            lines: self.lines,
            revision: self.revision,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
