use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_versus::core::{Board, GameState, SimpleRng};
use tetris_versus::types::{Action, Cell, PieceKind};

fn bench_hard_drop(c: &mut Criterion) {
    c.bench_function("hard_drop_until_topped_out", |b| {
        b.iter(|| {
            let mut state = GameState::new(black_box(12345));
            while state.hard_drop() {}
            state.score()
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 20..24 {
                for x in 0..10 {
                    board.set(x, y, Cell::Piece(PieceKind::I));
                }
            }
            board.clear_full_rows()
        })
    });
}

fn bench_garbage(c: &mut Criterion) {
    let mut rng = SimpleRng::new(7);

    c.bench_function("inject_4_garbage_rows", |b| {
        b.iter(|| {
            let mut board = Board::new();
            board.inject_garbage(black_box(4), &mut rng);
            board
        })
    });
}

fn bench_apply(c: &mut Criterion) {
    let script = [
        Action::move_left(),
        Action::Rotate { clockwise: true },
        Action::move_right(),
        Action::tick(),
        Action::Rotate { clockwise: false },
    ];
    let mut state = GameState::new(12345);

    c.bench_function("apply_move_and_rotate", |b| {
        b.iter(|| {
            for action in script {
                state.apply(black_box(action));
            }
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.apply(Action::HardDrop);
    state.apply(Action::HardDrop);

    c.bench_function("render_snapshot", |b| b.iter(|| state.snapshot()));
}

criterion_group!(
    benches,
    bench_hard_drop,
    bench_line_clear,
    bench_garbage,
    bench_apply,
    bench_render
);
criterion_main!(benches);
