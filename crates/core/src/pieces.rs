//! Pieces module - tetromino shapes and SRS rotation
//!
//! Shapes are stored as canonical offsets around a pivot at (0, 0), with
//! y growing downward. Each clockwise quarter turn maps `(x, y)` to `(-y, x)`.
//! Wall kicks follow the Super Rotation System tables.
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, Rotation, SPAWN_X, SPAWN_Y};

/// Offset of a single mino relative to the piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the piece origin
pub type PieceShape = [MinoOffset; 4];

/// Ordered kick offsets tried for one rotation transition
pub type KickList = [(i8, i8); 5];

/// Canonical (North) offsets for a piece kind
pub fn base_shape(kind: PieceKind) -> PieceShape {
    match kind {
        PieceKind::I => [(-1, 0), (0, 0), (1, 0), (2, 0)],
        PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        PieceKind::T => [(0, -1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::S => [(-1, 0), (0, 0), (0, -1), (1, -1)],
        PieceKind::Z => [(-1, -1), (0, -1), (0, 0), (1, 0)],
        PieceKind::J => [(0, -1), (0, 0), (0, 1), (-1, 1)],
        PieceKind::L => [(0, -1), (0, 0), (0, 1), (1, 1)],
    }
}

/// Get the offsets for a piece kind at a rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let mut shape = base_shape(kind);
    for _ in 0..rotation.index() {
        for offset in shape.iter_mut() {
            *offset = (-offset.1, offset.0);
        }
    }
    shape
}

/// JLSTZ kick table (shared by J, L, S, T, Z), indexed by `kick_index`
const JLSTZ_KICKS: [KickList; 8] = [
    // 0->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->0
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I kick table
const I_KICKS: [KickList; 8] = [
    // 0->1
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0->3
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1->0
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

fn kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,
        (Rotation::North, false) => 1,
        (Rotation::East, false) => 2,
        (Rotation::East, true) => 3,
        (Rotation::South, false) => 4,
        (Rotation::South, true) => 5,
        (Rotation::West, false) => 6,
        (Rotation::West, true) => 7,
    }
}

/// Kick offsets for a rotation transition.
///
/// Returns `None` for the O piece, which never rotates.
pub fn kicks(kind: PieceKind, from: Rotation, clockwise: bool) -> Option<&'static KickList> {
    let table = match kind {
        PieceKind::O => return None,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    Some(&table[kick_index(from, clockwise)])
}

/// An immutable piece value: shape, origin and facing.
///
/// Every transform returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// A piece at the spawn origin and orientation
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn moved(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Like [`Piece::moved`], but `None` if the origin or any cell would
    /// overflow `i8`. Use for offsets that come from outside the engine.
    pub fn checked_moved(&self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x.checked_add(dx)?;
        let y = self.y.checked_add(dy)?;
        let in_range = self
            .shape()
            .iter()
            .all(|&(ox, oy)| x.checked_add(ox).is_some() && y.checked_add(oy).is_some());
        in_range.then_some(Self { x, y, ..*self })
    }

    /// Same origin, next facing. Kicks are applied by the caller.
    pub fn rotated(&self, clockwise: bool) -> Self {
        let rotation = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
        Self { rotation, ..*self }
    }

    /// Back to spawn origin and orientation
    pub fn reset(&self) -> Self {
        Self::spawn(self.kind)
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute occupied cells
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Try to rotate a piece with wall kicks.
///
/// The rotation is tried at zero offset first, then at each kick offset in
/// table order. Returns the first placement accepted by `fits`.
pub fn try_rotate(piece: &Piece, clockwise: bool, fits: impl Fn(&Piece) -> bool) -> Option<Piece> {
    let kick_list = kicks(piece.kind, piece.rotation, clockwise)?;
    let rotated = piece.rotated(clockwise);

    if fits(&rotated) {
        return Some(rotated);
    }

    kick_list
        .iter()
        .map(|&(dx, dy)| rotated.moved(dx, dy))
        .find(|candidate| fits(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_is_quarter_turn() {
        // T pointing up, rotated once, points right.
        assert_eq!(
            get_shape(PieceKind::T, Rotation::East),
            [(1, 0), (0, -1), (0, 0), (0, 1)]
        );
    }

    #[test]
    fn test_four_turns_is_identity() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::spawn(kind);
            for _ in 0..4 {
                piece = piece.rotated(true);
            }
            assert_eq!(piece.cells(), Piece::spawn(kind).cells());
        }
    }

    #[test]
    fn test_o_piece_has_no_kicks() {
        assert!(kicks(PieceKind::O, Rotation::North, true).is_none());
        assert!(try_rotate(&Piece::spawn(PieceKind::O), true, |_| true).is_none());
    }

    #[test]
    fn test_kick_index_covers_all_transitions() {
        let mut seen = [false; 8];
        for from in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
            for cw in [true, false] {
                seen[kick_index(from, cw)] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_try_rotate_takes_first_fitting_kick() {
        let piece = Piece::spawn(PieceKind::T);
        let rotated = piece.rotated(true);
        // Reject the unkicked placement and the (0, 0) kick; (-1, 0) is next.
        let result = try_rotate(&piece, true, |p| {
            p.x != rotated.x || p.y != rotated.y
        });
        let placed = result.unwrap();
        assert_eq!((placed.x - piece.x, placed.y - piece.y), (-1, 0));
        assert_eq!(placed.rotation, Rotation::East);
    }

    #[test]
    fn test_checked_moved_rejects_overflow() {
        let piece = Piece::spawn(PieceKind::I);
        assert!(piece.checked_moved(i8::MAX, 0).is_none());
        assert!(piece.checked_moved(0, i8::MAX).is_none());
        assert!(piece.checked_moved(i8::MIN, 0).is_none());
        // Origin fits in i8 but the I's +2 offset would not.
        assert!(piece.checked_moved(i8::MAX - 6, 0).is_none());
        assert_eq!(piece.checked_moved(1, 2), Some(piece.moved(1, 2)));
    }

    #[test]
    fn test_try_rotate_fails_when_nothing_fits() {
        let piece = Piece::spawn(PieceKind::I);
        assert!(try_rotate(&piece, false, |_| false).is_none());
    }
}
