use core::{cmp::Ordering, fmt, ptr};

use super::{category::*, cursor::*};

/// Random access cursor into a slice.
///
/// This is the cursor handed out by [`DynArray::begin`](crate::collections::DynArray::begin) and [`DynArray::end`](crate::collections::DynArray::end).
/// Cursors into the same slice compare by position, cursors into different slices are unordered and never equal.
pub struct SliceCursor<'a, T> {
    slice: &'a [T],
    pos:   usize,
}

impl<'a, T> SliceCursor<'a, T> {
    /// Create a cursor at position `pos` of `slice`.
    ///
    /// `pos` may be anywhere, but only positions in `[0, slice.len())` can be read.
    pub const fn new(slice: &'a [T], pos: usize) -> Self {
        Self { slice, pos }
    }

    /// Cursor to the first element of `slice`.
    pub const fn begin(slice: &'a [T]) -> Self {
        Self::new(slice, 0)
    }

    /// Cursor one past the last element of `slice`.
    pub const fn end(slice: &'a [T]) -> Self {
        Self::new(slice, slice.len())
    }

    /// Position of the cursor in the slice.
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Borrow the element under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not on an element.
    #[track_caller]
    pub fn get(&self) -> &'a T {
        &self.slice[self.pos]
    }
}

impl<'a, T> Clone for SliceCursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for SliceCursor<'a, T> {}

impl<'a, T> PartialEq for SliceCursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.slice.as_ptr(), other.slice.as_ptr()) && self.pos == other.pos
    }
}

impl<'a, T> Eq for SliceCursor<'a, T> {}

impl<'a, T> PartialOrd for SliceCursor<'a, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if ptr::eq(self.slice.as_ptr(), other.slice.as_ptr()) {
            Some(self.pos.cmp(&other.pos))
        } else {
            None
        }
    }
}

impl<'a, T> fmt::Debug for SliceCursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceCursor")
            .field("pos", &self.pos)
            .field("len", &self.slice.len())
            .finish()
    }
}

impl<'a, T> IteratorTraits for SliceCursor<'a, T> {
    type Category = RandomAccessTag;
    type Value = T;
}

impl<'a, T: Clone> Cursor for SliceCursor<'a, T> {
    #[inline]
    fn read(&self) -> T {
        self.get().clone()
    }

    #[inline]
    fn step(&mut self) {
        self.pos = self.pos.wrapping_add(1);
    }
}

impl<'a, T: Clone> ForwardCursor for SliceCursor<'a, T> {}

impl<'a, T: Clone> BidirectionalCursor for SliceCursor<'a, T> {
    #[inline]
    fn step_back(&mut self) {
        self.pos = self.pos.wrapping_sub(1);
    }
}

impl<'a, T: Clone> RandomAccessCursor for SliceCursor<'a, T> {
    #[inline]
    fn jump(&mut self, n: Difference) {
        self.pos = self.pos.wrapping_add_signed(n);
    }

    #[inline]
    fn offset_from(&self, origin: &Self) -> Difference {
        self.pos.wrapping_sub(origin.pos) as Difference
    }
}

//------------------------------------------------------------------------------------------------------------------------------

/// Single pass cursor over any [`Iterator`].
///
/// The end of the stream is represented by [`StreamCursor::end`].
/// Two stream cursors only compare equal when both are exhausted, so a range is always `[StreamCursor::new(iter), StreamCursor::end())`.
pub struct StreamCursor<I: Iterator> {
    iter:    Option<I>,
    current: Option<I::Item>,
}

impl<I: Iterator> StreamCursor<I> {
    /// Create a cursor at the first element of `iter`.
    pub fn new<II: IntoIterator<IntoIter = I>>(iter: II) -> Self {
        let mut iter = iter.into_iter();
        let current = iter.next();
        Self { iter: Some(iter), current }
    }

    /// Create the end-of-stream cursor.
    pub fn end() -> Self {
        Self { iter: None, current: None }
    }

    /// Create the `[first, last)` pair covering all of `iter`.
    pub fn range<II: IntoIterator<IntoIter = I>>(iter: II) -> (Self, Self) {
        (Self::new(iter), Self::end())
    }

    /// Check if the stream is exhausted.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }
}

impl<I: Iterator> PartialEq for StreamCursor<I> {
    fn eq(&self, other: &Self) -> bool {
        self.is_end() && other.is_end()
    }
}

impl<I: Iterator> fmt::Debug for StreamCursor<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamCursor")
            .field("is_end", &self.is_end())
            .finish()
    }
}

impl<I: Iterator> IteratorTraits for StreamCursor<I> {
    type Category = InputTag;
    type Value = I::Item;
}

impl<I: Iterator> Cursor for StreamCursor<I> where
    I::Item: Clone
{
    #[track_caller]
    fn read(&self) -> I::Item {
        #[cold]
        #[track_caller]
        fn read_past_end() -> ! {
            panic!("read from an exhausted stream cursor");
        }

        match &self.current {
            Some(value) => value.clone(),
            None => read_past_end(),
        }
    }

    fn step(&mut self) {
        self.current = self.iter.as_mut().and_then(Iterator::next);
    }
}
