use criterion::criterion_main;

mod dynarray;
mod cursor;

criterion_main!(dynarray::dynarray, cursor::cursor);
