//! Read-only projections for presentation layers

use crate::board::Board;
use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, BOARD_WIDTH, BUFFER_ROWS, QUEUE_LOOKAHEAD, TOTAL_HEIGHT};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = TOTAL_HEIGHT as usize;

/// One cell of the rendered grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderCell {
    #[default]
    Empty,
    Piece(PieceKind),
    Garbage,
    /// Landing position of the active piece
    Ghost,
}

impl From<Cell> for RenderCell {
    fn from(value: Cell) -> Self {
        match value {
            Cell::Empty => RenderCell::Empty,
            Cell::Piece(kind) => RenderCell::Piece(kind),
            Cell::Garbage => RenderCell::Garbage,
        }
    }
}

/// Full 10x24 grid, buffer rows included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderedBoard {
    rows: [[RenderCell; WIDTH]; HEIGHT],
}

impl RenderedBoard {
    pub fn from_board(board: &Board) -> Self {
        let mut rows = [[RenderCell::Empty; WIDTH]; HEIGHT];
        for (y, row) in rows.iter_mut().enumerate() {
            for (dst, src) in row.iter_mut().zip(board.row(y).into_iter().flatten()) {
                *dst = RenderCell::from(*src);
            }
        }
        Self { rows }
    }

    pub fn get(&self, x: i8, y: i8) -> Option<RenderCell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows.get(y as usize)?.get(x as usize).copied()
    }

    /// Out-of-bounds writes are ignored
    pub fn set(&mut self, x: i8, y: i8, cell: RenderCell) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(slot) = self
            .rows
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *slot = cell;
        }
    }

    pub fn rows(&self) -> &[[RenderCell; WIDTH]] {
        &self.rows
    }

    /// The 20 playable rows, skipping the hidden buffer
    pub fn visible_rows(&self) -> &[[RenderCell; WIDTH]] {
        &self.rows[BUFFER_ROWS as usize..]
    }
}

impl Default for RenderedBoard {
    fn default() -> Self {
        Self {
            rows: [[RenderCell::Empty; WIDTH]; HEIGHT],
        }
    }
}

/// Everything a view needs after a dispatch returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: RenderedBoard,
    pub active: Option<Piece>,
    pub hold: Option<PieceKind>,
    pub next_queue: [PieceKind; QUEUE_LOOKAHEAD],
    pub can_hold: bool,
    pub paused: bool,
    pub game_over: bool,
    pub seed: u32,
    pub score: u32,
    pub lines: u32,
    pub revision: u64,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}
