use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stacker_core::{BoardMask, PieceKind};
use stacker_engine::perft::perft;
use stacker_engine::{count_landings, BoardState};

fn bench_landings(c: &mut Criterion) {
    let empty = BoardMask::EMPTY;
    let ragged = BoardMask::from_rows(&[0x3EF, 0x3C7, 0x00F, 0x201, 0x001]);

    for kind in PieceKind::ALL {
        c.bench_function(&format!("landings_empty_{}", kind.to_char()), |b| {
            b.iter(|| count_landings(black_box(&empty), 0, black_box(kind)))
        });
        c.bench_function(&format!("landings_ragged_{}", kind.to_char()), |b| {
            b.iter(|| count_landings(black_box(&ragged), 5, black_box(kind)))
        });
    }
}

fn bench_perft(c: &mut Criterion) {
    let queue = [
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
    ];
    let state = BoardState::from_parts(BoardMask::EMPTY, Some(PieceKind::I), None, &queue);

    c.bench_function("perft_depth_1", |b| b.iter(|| perft(black_box(&state), 1)));
    c.bench_function("perft_depth_2", |b| b.iter(|| perft(black_box(&state), 2)));
}

criterion_group!(benches, bench_landings, bench_perft);
criterion_main!(benches);
