//! Engine tests - whole-game behaviour through the public API

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tetris_versus::core::{GameState, PieceQueue};
use tetris_versus::types::{Action, Cell, PieceKind, BOARD_WIDTH, TOTAL_HEIGHT};

fn random_action(rng: &mut StdRng) -> Action {
    match rng.gen_range(0..7) {
        0 => Action::move_left(),
        1 => Action::move_right(),
        2 => Action::tick(),
        3 => Action::Rotate { clockwise: true },
        4 => Action::Rotate { clockwise: false },
        5 => Action::Hold,
        _ => Action::HardDrop,
    }
}

fn assert_active_fits(state: &GameState) {
    let Some(active) = state.active() else {
        return;
    };
    for (x, y) in active.cells() {
        assert!(
            (0..BOARD_WIDTH as i8).contains(&x) && (0..TOTAL_HEIGHT as i8).contains(&y),
            "active cell ({}, {}) outside the grid",
            x,
            y
        );
        assert!(
            !state.board().is_occupied(x, y),
            "active cell ({}, {}) overlaps the stack",
            x,
            y
        );
    }
}

#[test]
fn test_four_hard_drops_from_seed_42() {
    let mut state = GameState::new(42);
    for _ in 0..4 {
        assert!(state.hard_drop());
    }

    assert_eq!(state.score(), 40);
    assert_eq!(state.lines(), 0);
    assert_eq!(state.board().filled_count(), 16);
    assert!(!state.game_over());
    assert!(state.active().is_some());
}

#[test]
fn test_same_seed_same_actions_same_game() {
    let mut actions = StdRng::seed_from_u64(99);
    let script: Vec<Action> = (0..400).map(|_| random_action(&mut actions)).collect();

    let mut a = GameState::new(1234);
    let mut b = GameState::new(1234);
    for &action in &script {
        assert_eq!(a.apply(action), b.apply(action));
    }

    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.board(), b.board());
}

#[test]
fn test_different_seeds_diverge() {
    let a = GameState::new(1);
    let b = GameState::new(2);
    let differs = a.next_queue() != b.next_queue()
        || a.active().map(|p| p.kind) != b.active().map(|p| p.kind);
    assert!(differs);
}

#[test]
fn test_every_seven_draws_is_a_full_bag() {
    for seed in [0u32, 1, 42, 0xDEAD_BEEF] {
        let mut queue = PieceQueue::new(seed);
        for _ in 0..10 {
            let mut bag: Vec<PieceKind> = (0..7).map(|_| queue.next_piece()).collect();
            bag.sort_by_key(|k| *k as u8);
            let mut all = PieceKind::ALL.to_vec();
            all.sort_by_key(|k| *k as u8);
            assert_eq!(bag, all, "seed {} produced a bad bag", seed);
        }
    }
}

#[test]
fn test_active_piece_never_collides() {
    let mut actions = StdRng::seed_from_u64(7);
    let mut state = GameState::new(77);

    for _ in 0..2000 {
        if state.game_over() {
            state = state.restarted();
        }
        state.apply(random_action(&mut actions));
        assert_active_fits(&state);
    }
}

#[test]
fn test_stacking_in_the_middle_tops_out() {
    let mut state = GameState::new(5);
    let mut drops = 0;
    while !state.game_over() {
        assert!(state.hard_drop());
        drops += 1;
        assert!(drops < 200, "never topped out");
    }

    assert!(state.active().is_none());
    assert!(!state.hard_drop());
    assert!(!state.move_piece(1, 0));
    assert!(!state.pause());
    assert!(!state.receive_garbage(1));

    let fresh = state.restarted();
    assert_eq!(fresh.seed(), 6);
    assert_eq!(fresh.score(), 0);
    assert!(fresh.playable());
}

#[test]
fn test_line_clear_shifts_stack_down() {
    let mut state = GameState::new(3);
    let bottom = TOTAL_HEIGHT as i8 - 1;

    // Garbage fills nine columns of the bottom row; plug the tenth by hand
    // and leave a marker cell above it.
    state.receive_garbage(1);
    let hole = (0..BOARD_WIDTH as i8)
        .find(|&x| !state.board().is_occupied(x, bottom))
        .unwrap();
    assert_eq!(state.board().filled_count(), 9);

    let mut filled = state.board().clone();
    filled.set(hole, bottom, Cell::Piece(PieceKind::I));
    filled.set(0, bottom - 1, Cell::Piece(PieceKind::T));
    assert_eq!(filled.clear_full_rows(), 1);
    assert_eq!(filled.get(0, bottom), Some(Cell::Piece(PieceKind::T)));
    assert_eq!(filled.filled_count(), 1);
}

#[test]
fn test_garbage_pushes_stack_up() {
    let mut state = GameState::new(11);
    assert!(state.hard_drop());
    let before = state.board().filled_count();
    let top_before = (0..TOTAL_HEIGHT as i8)
        .find(|&y| (0..BOARD_WIDTH as i8).any(|x| state.board().is_occupied(x, y)))
        .unwrap();

    assert!(state.receive_garbage(3));
    assert_eq!(state.board().filled_count(), before + 27);

    let top_after = (0..TOTAL_HEIGHT as i8)
        .find(|&y| (0..BOARD_WIDTH as i8).any(|x| state.board().is_occupied(x, y)))
        .unwrap();
    assert_eq!(top_after, top_before - 3);

    for y in TOTAL_HEIGHT as usize - 3..TOTAL_HEIGHT as usize {
        let row = state.board().row(y).unwrap();
        assert_eq!(row.iter().filter(|c| c.is_empty()).count(), 1);
        assert!(row
            .iter()
            .all(|c| matches!(c, Cell::Empty | Cell::Garbage)));
    }
}

#[test]
fn test_garbage_larger_than_board_is_clamped() {
    let mut state = GameState::new(11);
    assert!(state.receive_garbage(100));
    assert_eq!(
        state.board().filled_count(),
        (BOARD_WIDTH as usize - 1) * TOTAL_HEIGHT as usize
    );
    assert!(!state.receive_garbage(0));
}

#[test]
fn test_hold_once_per_lock() {
    let mut state = GameState::new(21);
    let first = state.active().unwrap().kind;
    let next = state.next_queue()[0];

    assert!(state.hold());
    assert_eq!(state.hold_piece(), Some(first));
    assert_eq!(state.active().unwrap().kind, next);
    assert!(!state.hold());

    assert!(state.hard_drop());
    assert!(state.can_hold());
    let current = state.active().unwrap().kind;
    assert!(state.hold());
    assert_eq!(state.active().unwrap().kind, first);
    assert_eq!(state.hold_piece(), Some(current));
}

#[test]
fn test_pause_freezes_play_but_not_garbage() {
    let mut state = GameState::new(8);
    assert!(state.pause());
    assert!(!state.playable());
    assert!(!state.tick());
    assert!(!state.hard_drop());
    assert!(state.receive_garbage(2));
    assert!(state.pause());
    assert!(state.playable());
}

#[test]
fn test_lock_event_reports_points() {
    let mut state = GameState::new(42);
    assert!(state.take_last_event().is_none());
    state.hard_drop();
    let event = state.take_last_event().unwrap();
    assert_eq!(event.lines_cleared, 0);
    assert_eq!(event.points, 10);
    assert!(!event.topped_out);
    assert!(state.take_last_event().is_none());
}
