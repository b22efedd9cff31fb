use std::{
    alloc::{Layout, GlobalAlloc},
    ptr::NonNull,
};

use crate::alloc::RawAllocator;

/// Allocator calling directly into mimalloc.
///
/// This is the default allocation policy of the containers in this crate.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Mallocator;

static MI_MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

impl RawAllocator for Mallocator {
    unsafe fn alloc(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        NonNull::new(MI_MALLOC.alloc(layout))
    }

    unsafe fn dealloc(&mut self, ptr: NonNull<u8>, layout: Layout) {
        MI_MALLOC.dealloc(ptr.as_ptr(), layout);
    }
}
