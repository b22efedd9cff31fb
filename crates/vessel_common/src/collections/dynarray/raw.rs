use core::{
    marker::PhantomData,
    mem::size_of,
    ptr::{self, NonNull},
};

use crate::alloc::{AllocError, Allocator};

/// Low level utility for allocating, reallocating and deallocating a buffer of `T`s through an [`Allocator`].
///
/// - Produces a dangling pointer for zero-sized types and zero-length buffers, and never frees it.
/// - Catches all overflows in capacity computations (promotes them to capacity overflow errors).
///
/// This type does not inspect the memory it manages. When dropped it *will* free its memory, but it *won't* drop its contents.
///
/// Zero-sized types never allocate, so `capacity()` always returns `usize::MAX` for them.
pub(crate) struct RawBuffer<T, A: Allocator<T>> {
    ptr:      NonNull<T>,
    cap:      usize,
    alloc:    A,
    _phantom: PhantomData<T>,
}

unsafe impl<T: Send, A: Allocator<T> + Send> Send for RawBuffer<T, A> {}
unsafe impl<T: Sync, A: Allocator<T> + Sync> Sync for RawBuffer<T, A> {}

impl<T, A: Allocator<T>> RawBuffer<T, A> {
    /// Creates the biggest possible `RawBuffer` without allocating.
    pub const fn new_in(alloc: A) -> Self {
        Self { ptr: NonNull::dangling(), cap: 0, alloc, _phantom: PhantomData }
    }

    /// Creates a `RawBuffer` with exactly `capacity` slots.
    pub fn try_with_capacity_in(capacity: usize, mut alloc: A) -> Result<Self, AllocError> {
        if size_of::<T>() == 0 || capacity == 0 {
            return Ok(Self::new_in(alloc));
        }
        if capacity > alloc.max_size() {
            return Err(AllocError::CapacityOverflow);
        }
        let ptr = alloc.allocate(capacity)?;
        Ok(Self { ptr, cap: capacity, alloc, _phantom: PhantomData })
    }

    /// Get the capacity of the allocation.
    ///
    /// This will always be `usize::MAX` if `T` is zero-sized.
    #[inline]
    pub fn capacity(&self) -> usize {
        if size_of::<T>() == 0 {
            usize::MAX
        } else {
            self.cap
        }
    }

    #[inline]
    pub fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.alloc
    }

    /// Move the first `len` elements into a new allocation of exactly `new_cap` slots.
    ///
    /// A `new_cap` of 0 releases the buffer. On failure the buffer is left untouched.
    ///
    /// # Safety
    ///
    /// `len` must not exceed the capacity or `new_cap`, and the first `len` slots must be initialized.
    pub unsafe fn try_reallocate(&mut self, len: usize, new_cap: usize) -> Result<(), AllocError> {
        if size_of::<T>() == 0 {
            return Ok(());
        }
        debug_assert!(len <= new_cap && len <= self.cap);

        let mut new_buf = Self::try_with_capacity_in(new_cap, self.alloc.clone())?;
        ptr::copy_nonoverlapping(self.ptr(), new_buf.ptr(), len);
        self.swap_buffer(&mut new_buf);
        Ok(())
    }

    /// Exchange the allocations of `self` and `other`, leaving the allocators in place.
    ///
    /// Allocators of the same type are interchangeable, so either one can free the other's memory.
    pub fn swap_buffer(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.ptr, &mut other.ptr);
        core::mem::swap(&mut self.cap, &mut other.cap);
    }
}

impl<T, A: Allocator<T>> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        if size_of::<T>() != 0 && self.cap != 0 {
            // SAFETY: `ptr` was allocated with `cap` slots by an equal allocator
            unsafe { self.alloc.deallocate(self.ptr, self.cap) };
        }
    }
}
