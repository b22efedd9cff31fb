use core::fmt::{Display, Write};

use vessel_common::{
    prelude::*,
    alloc::memory_stats,
    iter::SliceCursor,
};
use vessel_logging::{log_info, LogCategory, Logger, set_logger};

pub const LOG_CAT : LogCategory = LogCategory::new("Main");

static LOGGER : Logger = Logger::new();

fn print<T: Display>(arr: &DynArray<T>) {
    let mut contents = String::new();
    for x in arr {
        _ = write!(contents, "{x} ");
    }
    log_info!(LOG_CAT, "size: {}\tcapacity: {}\t{}", arr.len(), arr.capacity(), contents);
}

fn main() {
    set_logger(&LOGGER);

    actual_main();

    let stats = memory_stats();
    log_info!(LOG_CAT, "allocations: {}, deallocations: {}, live: {} bytes, peak: {} bytes",
        stats.allocations, stats.deallocations, stats.live_bytes, stats.peak_bytes);
    LOGGER.flush();
}

fn actual_main() {
    let mut a = DynArray::<i32>::new();
    for i in 0..10 {
        a.push_back(i);
        print(&a);
    }
    for _ in 0..10 {
        a.pop_back();
        print(&a);
    }

    let b = DynArray::<i32>::with_len(10);
    print(&b);

    let mut c = DynArray::from_elem(10, 1);
    print(&c);

    let mut d = c.clone();
    c[0] = 0;
    print(&c);
    print(&d);
    d[9] = 9;
    print(&c);
    print(&d);

    let mut e = DynArray::from_range(d.begin(), d.end());
    d[0] = 10;
    print(&d);
    print(&e);

    a.clone_from(&d);
    d[1] = 11;
    print(&a);
    print(&d);

    log_info!(LOG_CAT, "{} {}", d.front(), d.back());

    print(&d);
    d.push_back(2);
    print(&d);
    d.shrink_to_fit();
    print(&d);
    d.push_back(3);
    print(&d);

    e.clear();
    print(&e);

    print(&d);
    d.insert(2, 12);
    print(&d);
    d.insert_n(2, 3, 13);
    print(&d);
    d.insert_range(2, SliceCursor::begin(&c), SliceCursor::new(&c, 2));
    print(&d);

    d.erase(0);
    print(&d);
    let len = d.len();
    d.erase_range(5, len);
    print(&d);

    d.resize(7, 0);
    print(&d);
    d.resize(4, 0);
    print(&d);

    print(&c);
    d.swap(&mut c);
    print(&d);
    print(&c);
}
