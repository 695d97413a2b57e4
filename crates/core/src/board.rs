//! Board module - manages the game grid
//!
//! The board is a 10x24 grid: 20 visible rows plus 4 hidden buffer rows on
//! top. Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right) and y ranges
//! 0..23 (top to bottom). Rows 0..3 are the buffer.

use crate::pieces::Piece;
use crate::rng::SimpleRng;
use crate::types::{Cell, BOARD_WIDTH, TOTAL_HEIGHT};

/// Total number of cells on the board
const BOARD_SIZE: usize = BOARD_WIDTH as usize * TOTAL_HEIGHT as usize;

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = TOTAL_HEIGHT as usize;

/// The game board - 10 columns x 24 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= TOTAL_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Total height including buffer rows
    pub fn height(&self) -> u8 {
        TOTAL_HEIGHT
    }

    /// Get cell at position (x, y), or None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Cell::Empty))
    }

    /// In bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(c) if c.is_filled())
    }

    /// All of the piece's cells are in bounds and empty
    pub fn fits(&self, piece: &Piece) -> bool {
        piece.cells().iter().all(|&(x, y)| self.is_valid(x, y))
    }

    /// Lowest collision-free position straight below `piece`
    pub fn drop_position(&self, piece: &Piece) -> Piece {
        let mut landed = *piece;
        loop {
            let next = landed.moved(0, 1);
            if !self.fits(&next) {
                return landed;
            }
            landed = next;
        }
    }

    /// Stamp a piece's cells onto the board with its shape tag
    pub fn place(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            self.set(x, y, Cell::Piece(piece.kind));
        }
    }

    /// Cells of row `y`, or `None` below the board
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= HEIGHT {
            return None;
        }
        let start = y * WIDTH;
        self.cells.get(start..start + WIDTH)
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_filled()))
    }

    /// Remove every full row, compact the rest downward and pad empty rows
    /// at the top. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0u32;
        let mut write_y = HEIGHT;

        // Two-pointer scan from the bottom.
        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src = read_y * WIDTH;
                    self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
                }
            }
        }

        for cell in &mut self.cells[..write_y * WIDTH] {
            *cell = Cell::Empty;
        }

        cleared
    }

    /// Drop `lines` rows off the top and append as many garbage rows at the
    /// bottom, each with exactly one empty column drawn from `rng`.
    ///
    /// `lines` is clamped to the board height.
    pub fn inject_garbage(&mut self, lines: usize, rng: &mut SimpleRng) {
        let lines = lines.min(HEIGHT);
        if lines == 0 {
            return;
        }

        self.cells.copy_within(lines * WIDTH.., 0);

        for y in HEIGHT - lines..HEIGHT {
            let hole = rng.next_range(BOARD_WIDTH as u32) as usize;
            let start = y * WIDTH;
            for (x, cell) in self.cells[start..start + WIDTH].iter_mut().enumerate() {
                *cell = if x == hole { Cell::Empty } else { Cell::Garbage };
            }
        }
    }

    /// Number of filled cells on the whole grid
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_filled()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [Cell::Empty; BOARD_SIZE];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn fill_row(board: &mut Board, y: i8) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Cell::Piece(PieceKind::I));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 23), Some(239));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 24), None);
        assert_eq!(Board::index(0, -1), None);
    }

    #[test]
    fn test_clear_full_rows_compacts_and_pads() {
        let mut board = Board::new();
        fill_row(&mut board, 23);
        fill_row(&mut board, 21);
        board.set(4, 22, Cell::Piece(PieceKind::T));
        board.set(7, 20, Cell::Garbage);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.get(4, 23), Some(Cell::Piece(PieceKind::T)));
        assert_eq!(board.get(7, 22), Some(Cell::Garbage));
        assert_eq!(board.filled_count(), 2);
        assert!(board.row(0).unwrap().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_row_out_of_range() {
        let board = Board::new();
        assert_eq!(board.row(HEIGHT - 1).map(<[Cell]>::len), Some(WIDTH));
        assert!(board.row(HEIGHT).is_none());
        assert!(board.row(usize::MAX).is_none());
        assert!(!board.is_row_full(HEIGHT));
    }

    #[test]
    fn test_clear_full_rows_none_full() {
        let mut board = Board::new();
        board.set(0, 23, Cell::Garbage);
        let before = board.clone();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_inject_garbage_shifts_up() {
        let mut board = Board::new();
        board.set(3, 23, Cell::Piece(PieceKind::S));
        let mut rng = SimpleRng::new(9);

        board.inject_garbage(2, &mut rng);

        assert_eq!(board.get(3, 21), Some(Cell::Piece(PieceKind::S)));
        for y in [22usize, 23] {
            let holes = board.row(y).unwrap().iter().filter(|c| c.is_empty()).count();
            assert_eq!(holes, 1);
            assert!(!board.is_row_full(y));
        }
    }

    #[test]
    fn test_inject_garbage_clamps_to_height() {
        let mut board = Board::new();
        let mut rng = SimpleRng::new(1);
        board.inject_garbage(100, &mut rng);
        assert_eq!(board.filled_count(), HEIGHT * (WIDTH - 1));
    }

    #[test]
    fn test_drop_position_lands_on_floor() {
        let board = Board::new();
        let piece = Piece::spawn(PieceKind::O);
        let landed = board.drop_position(&piece);
        assert!(landed.cells().iter().any(|&(_, y)| y == 23));
        assert!(board.fits(&landed));
        assert!(!board.fits(&landed.moved(0, 1)));
    }
}
