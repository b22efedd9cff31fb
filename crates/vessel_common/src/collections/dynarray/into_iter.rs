use core::{
    fmt,
    iter::FusedIterator,
    ptr::{self, NonNull},
    slice,
};

use crate::alloc::Allocator;

use super::raw::RawBuffer;

/// An iterator that moves out of a dynamic array.
///
/// This `struct` is created by the `into_iter` method on [`DynArray`](super::DynArray) (provided by the [`IntoIterator`] trait).
pub struct IntoIter<T, A: Allocator<T>> {
    pub(super) buf:   RawBuffer<T, A>,
    pub(super) start: usize,
    pub(super) end:   usize,
}

impl<T: fmt::Debug, A: Allocator<T>> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator<T>> IntoIter<T, A> {
    /// Returns the remaining items of this iterator as a slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let arr = dynarray!['a', 'b', 'c'];
    /// let mut into_iter = arr.into_iter();
    /// assert_eq!(into_iter.as_slice(), &['a', 'b', 'c']);
    /// let _ = into_iter.next().unwrap();
    /// assert_eq!(into_iter.as_slice(), &['b', 'c']);
    /// ```
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr().add(self.start), self.end - self.start) }
    }

    /// Returns the remaining items of this iterator as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr().add(self.start), self.end - self.start) }
    }

    /// Returns a reference to the underlying allocator.
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }
}

impl<T, A: Allocator<T>> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            None
        } else {
            let idx = self.start;
            self.start += 1;
            // SAFETY: `idx` is in the live range, which is shrunk before the element is moved out
            Some(unsafe { ptr::read(self.buf.ptr().add(idx)) })
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }

    #[inline]
    fn count(self) -> usize {
        self.len()
    }
}

impl<T, A: Allocator<T>> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            None
        } else {
            self.end -= 1;
            Some(unsafe { ptr::read(self.buf.ptr().add(self.end)) })
        }
    }
}

impl<T, A: Allocator<T>> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator<T>> FusedIterator for IntoIter<T, A> {}

impl<T: Clone, A: Allocator<T>> Clone for IntoIter<T, A> {
    fn clone(&self) -> Self {
        let remaining: super::DynArray<T, A> = super::DynArray::from_slice_in(self.as_slice(), self.buf.allocator().clone());
        remaining.into_iter()
    }
}

impl<T, A: Allocator<T>> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let (start, end) = (self.start, self.end);
        self.start = end;

        let ptr = self.buf.ptr();
        let alloc = self.buf.allocator_mut();
        for i in start..end {
            // SAFETY: Every slot in `[start, end)` still holds a live element, the raw buffer frees the memory afterwards
            unsafe { alloc.destroy(NonNull::new_unchecked(ptr.add(i))) };
        }
    }
}
