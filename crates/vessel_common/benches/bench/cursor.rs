use criterion::{criterion_group, Criterion, black_box};

use vessel_common::iter::*;

fn cursor_distance(c: &mut Criterion) {
    let data: Vec<u64> = (0..4096).collect();

    c.bench_function("distance(random access, 4096)", |b| b.iter(|| {
        distance(SliceCursor::begin(black_box(&data)), SliceCursor::end(&data))
    }));
    c.bench_function("distance(input, 4096)", |b| b.iter(|| {
        let (first, last) = StreamCursor::range(black_box(&data).iter());
        distance(first, last)
    }));
}

fn cursor_advance(c: &mut Criterion) {
    let data: Vec<u64> = (0..4096).collect();

    c.bench_function("advance(random access, 4000)", |b| b.iter(|| {
        let mut it = SliceCursor::begin(&data);
        advance(&mut it, black_box(4000));
        it
    }));
    c.bench_function("advance(reverse random access, 4000)", |b| b.iter(|| {
        let mut it = ReverseCursor::new(SliceCursor::end(&data));
        advance(&mut it, black_box(4000));
        it
    }));
}

criterion_group!(cursor,
    cursor_distance,
    cursor_advance
);
