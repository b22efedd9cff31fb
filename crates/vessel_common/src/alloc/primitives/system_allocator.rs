use std::{
    alloc::{GlobalAlloc, Layout, System},
    ptr::NonNull,
};

use crate::alloc::RawAllocator;

/// Allocator using the operating system's allocator, the same one Rust's `std::alloc::System` uses.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct SystemAllocator;

impl RawAllocator for SystemAllocator {
    unsafe fn alloc(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        NonNull::new(System.alloc(layout))
    }

    unsafe fn dealloc(&mut self, ptr: NonNull<u8>, layout: Layout) {
        System.dealloc(ptr.as_ptr(), layout);
    }
}
