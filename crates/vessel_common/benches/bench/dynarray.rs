use criterion::{criterion_group, Criterion, black_box};

use vessel_common::{
    collections::*,
    iter::{SliceCursor, StreamCursor},
};

fn dynarray_new(c: &mut Criterion) {
    c.bench_function("DynArray::new", |b| b.iter(|| {
        DynArray::<u32>::new()
    }));
    c.bench_function("Vec::new", |b| b.iter(|| {
        Vec::<u32>::new()
    }));
    c.bench_function("DynArray::with_capacity(64)", |b| b.iter(|| {
        DynArray::<u32>::with_capacity(64)
    }));
    c.bench_function("Vec::with_capacity(64)", |b| b.iter(|| {
        Vec::<u32>::with_capacity(64)
    }));
}

fn dynarray_push(c: &mut Criterion) {
    c.bench_function("DynArray::push_back(100) no reserve", |b| b.iter(|| {
        let mut arr = DynArray::<u32>::new();
        for i in 0..100 {
            arr.push_back(i);
        }
        arr
    }));
    c.bench_function("DynArray::push_back(100) reserve", |b| b.iter(|| {
        let mut arr = DynArray::<u32>::new();
        arr.reserve(100);
        for i in 0..100 {
            arr.push_back(i);
        }
        arr
    }));
    c.bench_function("DynArray<Pow2Growth>::push_back(100) no reserve", |b| b.iter(|| {
        let mut arr = DynArray::<u32, vessel_common::alloc::primitives::Mallocator, Pow2Growth>::new();
        for i in 0..100 {
            arr.push_back(i);
        }
        arr
    }));
    c.bench_function("Vec::push(100) no reserve", |b| b.iter(|| {
        let mut arr = Vec::<u32>::new();
        for i in 0..100 {
            arr.push(i);
        }
        arr
    }));
}

fn dynarray_insert(c: &mut Criterion) {
    let base = DynArray::<u32>::from_elem(256, 7);

    c.bench_function("DynArray::insert(front, 16)", |b| b.iter(|| {
        let mut arr = base.clone();
        for i in 0..16 {
            arr.insert(0, i);
        }
        arr
    }));
    c.bench_function("DynArray::insert_n(middle, 64)", |b| b.iter(|| {
        let mut arr = base.clone();
        arr.insert_n(128, 64, black_box(3));
        arr
    }));
    c.bench_function("Vec::splice(middle, 64)", |b| b.iter(|| {
        let mut arr = vec![7u32; 256];
        arr.splice(128..128, std::iter::repeat(black_box(3)).take(64));
        arr
    }));
}

fn dynarray_range(c: &mut Criterion) {
    let src: Vec<u32> = (0..1024).collect();

    c.bench_function("DynArray::from_range(random access, 1024)", |b| b.iter(|| {
        DynArray::<u32>::from_range(SliceCursor::begin(&src), SliceCursor::end(&src))
    }));
    c.bench_function("DynArray::from_range(input, 1024)", |b| b.iter(|| {
        let (first, last) = StreamCursor::range(src.iter().copied());
        DynArray::<u32>::from_range(first, last)
    }));
    c.bench_function("DynArray::insert_range(random access, 1024)", |b| b.iter(|| {
        let mut arr = DynArray::<u32>::from_elem(16, 0);
        arr.insert_range(8, SliceCursor::begin(&src), SliceCursor::end(&src));
        arr
    }));
    c.bench_function("DynArray::insert_range(input, 1024)", |b| b.iter(|| {
        let mut arr = DynArray::<u32>::from_elem(16, 0);
        let (first, last) = StreamCursor::range(src.iter().copied());
        arr.insert_range(8, first, last);
        arr
    }));
}

fn dynarray_index(c: &mut Criterion) {
    let arr = DynArray::<u32>::from_elem(100, 5);
    c.bench_function("DynArray::index(100)", |b| b.iter(|| {
        for i in 0..100 {
            black_box(arr[i]);
        }
    }));

    let vbuf = vec![5u32; 100];
    c.bench_function("Vec::index(100)", |b| b.iter(|| {
        for i in 0..100 {
            black_box(vbuf[i]);
        }
    }));
}

criterion_group!(dynarray,
    dynarray_new,
    dynarray_push,
    dynarray_insert,
    dynarray_range,
    dynarray_index
);
