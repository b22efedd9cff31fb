use core::{
    fmt,
    mem::size_of,
    ptr::{self, NonNull},
};
use std::alloc::Layout;

use vessel_logging::{log_error, LogCategory};

use super::tracking;

const LOG_CAT : LogCategory = LogCategory::new("Alloc");

//------------------------------------------------------------------------------------------------------------------------------

/// Error returned when memory for a number of elements could not be acquired.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AllocError {
    /// The requested element count exceeds [`max_size`](Allocator::max_size), or its size in bytes can't be described by a [`Layout`].
    CapacityOverflow,
    /// The memory system could not satisfy a request for the given layout.
    OutOfMemory(Layout),
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::CapacityOverflow => f.write_str("requested capacity exceeds the maximum number of elements"),
            AllocError::OutOfMemory(layout) => write!(f, "memory allocation of {} bytes (align {}) failed", layout.size(), layout.align()),
        }
    }
}

impl std::error::Error for AllocError {}

/// Report an allocation error from an infallible API.
///
/// Capacity overflows are a logic error and panic, running out of memory goes to [`std::alloc::handle_alloc_error`].
#[cold]
#[track_caller]
pub fn handle_error(err: AllocError) -> ! {
    match err {
        AllocError::CapacityOverflow => panic!("capacity overflow"),
        AllocError::OutOfMemory(layout) => std::alloc::handle_alloc_error(layout),
    }
}

/// The largest number of `T`s an allocation can be asked for.
pub const fn max_size_of<T>() -> usize {
    if size_of::<T>() == 0 {
        usize::MAX
    } else {
        usize::MAX / size_of::<T>()
    }
}

/// Get the layout of an array of `n` `T`s, rejecting counts that exceed [`max_size_of`] or `isize::MAX` bytes.
pub fn array_layout<T>(n: usize) -> Result<Layout, AllocError> {
    if n > max_size_of::<T>() {
        return Err(AllocError::CapacityOverflow);
    }
    Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow)
}

//------------------------------------------------------------------------------------------------------------------------------

/// Source of raw, untyped memory.
pub trait RawAllocator {
    /// Allocate memory for `layout`.
    ///
    /// # Return
    ///
    /// If no memory could be allocated, `None` should be returned.
    ///
    /// # Safety
    ///
    /// `layout` must have a non-zero size.
    unsafe fn alloc(&mut self, layout: Layout) -> Option<NonNull<u8>>;

    /// Deallocate an allocation
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `alloc` on an equal allocator with the same `layout`.
    unsafe fn dealloc(&mut self, ptr: NonNull<u8>, layout: Layout);
}

/// Allocation policy used by containers, parameterized by the element type.
///
/// An allocator hands out storage for `n` elements and places and destroys single elements in it.
/// Policies are stateless: any two instances of the same allocator type compare equal and may free each other's memory.
///
/// Every [`allocate`](Allocator::allocate) has to be paired with a [`deallocate`](Allocator::deallocate) of the same count,
/// and every [`construct`](Allocator::construct) with a [`destroy`](Allocator::destroy) (or a move out of the slot).
pub trait Allocator<T>: Clone + Default + PartialEq {
    /// The largest element count [`allocate`](Allocator::allocate) can succeed for.
    fn max_size(&self) -> usize {
        max_size_of::<T>()
    }

    /// Acquire uninitialized storage for `n` elements.
    ///
    /// Zero-sized requests (`n == 0` or a zero-sized `T`) never touch the memory system and return a dangling pointer.
    ///
    /// # Errors
    ///
    /// [`AllocError::CapacityOverflow`] if `n > self.max_size()`, or [`AllocError::OutOfMemory`] if the memory system can't satisfy the request.
    fn allocate(&mut self, n: usize) -> Result<NonNull<T>, AllocError>;

    /// Release storage for `n` elements.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate(n)` on an equal allocator, and may not be used afterwards.
    /// Any elements still in the storage are not dropped.
    unsafe fn deallocate(&mut self, ptr: NonNull<T>, n: usize);

    /// Place `value` into the slot at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to allocated, uninitialized storage for a `T`.
    #[inline]
    unsafe fn construct(&mut self, ptr: NonNull<T>, value: T) {
        ptr.as_ptr().write(value)
    }

    /// Run the destructor of the element at `ptr`, leaving the slot uninitialized.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live `T`, which may not be used afterwards.
    #[inline]
    unsafe fn destroy(&mut self, ptr: NonNull<T>) {
        ptr::drop_in_place(ptr.as_ptr())
    }
}

impl<T, R: RawAllocator + Clone + Default + PartialEq> Allocator<T> for R {
    fn allocate(&mut self, n: usize) -> Result<NonNull<T>, AllocError> {
        let layout = array_layout::<T>(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: The layout is not zero-sized
        match unsafe { self.alloc(layout) } {
            Some(ptr) => {
                tracking::record_alloc(layout.size());
                Ok(ptr.cast())
            },
            None => {
                log_error!(LOG_CAT, <R as Allocator<T>>::allocate, "Failed to allocate {} bytes for {} elements", layout.size(), n);
                Err(AllocError::OutOfMemory(layout))
            },
        }
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, n: usize) {
        // The layout was already validated when the memory was allocated
        let layout = Layout::from_size_align_unchecked(size_of::<T>() * n, core::mem::align_of::<T>());
        if layout.size() != 0 {
            tracking::record_dealloc(layout.size());
            self.dealloc(ptr.cast(), layout);
        }
    }
}

#[cfg(test)]
mod test {
    use std::{io::{self, Write}, sync::Arc};

    use parking_lot::Mutex;
    use vessel_logging::{set_logger, Logger};

    use super::*;
    use crate::alloc::primitives::{Mallocator, SystemAllocator};

    #[test]
    fn max_size() {
        assert_eq!(<Mallocator as Allocator<u8>>::max_size(&Mallocator), usize::MAX);
        assert_eq!(<Mallocator as Allocator<u32>>::max_size(&Mallocator), usize::MAX / 4);
        assert_eq!(<Mallocator as Allocator<()>>::max_size(&Mallocator), usize::MAX);
    }

    #[test]
    fn allocate_construct_destroy() {
        let mut alloc = SystemAllocator;
        let ptr: NonNull<String> = alloc.allocate(3).unwrap();
        unsafe {
            for i in 0..3 {
                alloc.construct(NonNull::new_unchecked(ptr.as_ptr().add(i)), i.to_string());
            }
            assert_eq!(*ptr.as_ptr().add(2), "2");
            for i in 0..3 {
                alloc.destroy(NonNull::new_unchecked(ptr.as_ptr().add(i)));
            }
            alloc.deallocate(ptr, 3);
        }
    }

    #[test]
    fn allocate_too_many() {
        let mut alloc = Mallocator;
        let max = <Mallocator as Allocator<u64>>::max_size(&alloc);
        assert_eq!(Allocator::<u64>::allocate(&mut alloc, max + 1), Err(AllocError::CapacityOverflow));
        // Within `max_size`, but larger than `isize::MAX` bytes
        assert_eq!(Allocator::<u64>::allocate(&mut alloc, max), Err(AllocError::CapacityOverflow));
    }

    #[test]
    fn zero_sized_requests_do_not_allocate() {
        let mut alloc = Mallocator;
        let ptr = Allocator::<u32>::allocate(&mut alloc, 0).unwrap();
        assert_eq!(ptr, NonNull::dangling());
        unsafe { Allocator::<u32>::deallocate(&mut alloc, ptr, 0) };

        let ptr = Allocator::<()>::allocate(&mut alloc, 100).unwrap();
        assert_eq!(ptr, NonNull::dangling());
        unsafe { Allocator::<()>::deallocate(&mut alloc, ptr, 100) };
    }

    #[test]
    fn stateless_equality() {
        assert!(Mallocator == Mallocator::default());
        assert!(SystemAllocator == SystemAllocator);
    }

    /// Raw allocator whose memory system is always exhausted.
    #[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
    struct Exhausted;

    impl RawAllocator for Exhausted {
        unsafe fn alloc(&mut self, _layout: Layout) -> Option<NonNull<u8>> {
            None
        }

        unsafe fn dealloc(&mut self, _ptr: NonNull<u8>, _layout: Layout) {
            unreachable!("nothing was ever allocated");
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn out_of_memory() {
        let mut alloc = Exhausted;
        let layout = Layout::array::<u32>(4).unwrap();
        assert_eq!(Allocator::<u32>::allocate(&mut alloc, 4), Err(AllocError::OutOfMemory(layout)));
        assert_eq!(
            AllocError::OutOfMemory(layout).to_string(),
            "memory allocation of 16 bytes (align 4) failed"
        );

        // Zero-sized requests never reach the memory system
        assert_eq!(Allocator::<u32>::allocate(&mut alloc, 0), Ok(NonNull::dangling()));
        assert_eq!(Allocator::<()>::allocate(&mut alloc, 8), Ok(NonNull::dangling()));
    }

    #[test]
    fn out_of_memory_is_logged() {
        static LOGGER : Logger = Logger::new();

        let buffer = SharedBuffer::default();
        LOGGER.set_log_to_console(false);
        LOGGER.set_always_flush(true);
        assert!(LOGGER.add_writer(Box::new(buffer.clone())).is_ok());
        set_logger(&LOGGER);

        let mut alloc = Exhausted;
        assert!(Allocator::<u64>::allocate(&mut alloc, 3).is_err());

        let contents = String::from_utf8_lossy(&buffer.0.lock()).into_owned();
        assert!(contents.contains("[Alloc]"));
        assert!(contents.contains("Failed to allocate 24 bytes for 3 elements"));
    }
}
