use core::cmp::Ordering;

use super::cursor::*;

/// Cursor adapter walking a bidirectional sequence back to front.
///
/// A reverse cursor reads the element *before* its base, so `ReverseCursor::new(end)` reads the last element
/// and `ReverseCursor::new(begin)` is the end of the reversed range.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReverseCursor<C> {
    base: C,
}

impl<C> ReverseCursor<C> {
    /// Wrap `base`.
    pub const fn new(base: C) -> Self {
        Self { base }
    }

    /// Get the wrapped cursor.
    pub fn base(&self) -> &C {
        &self.base
    }

    /// Unwrap the reverse cursor.
    pub fn into_base(self) -> C {
        self.base
    }
}

impl<C: PartialOrd> PartialOrd for ReverseCursor<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        other.base.partial_cmp(&self.base)
    }
}

impl<C: IteratorTraits> IteratorTraits for ReverseCursor<C> {
    type Category = C::Category;
    type Value = C::Value;
}

impl<C: BidirectionalCursor> Cursor for ReverseCursor<C> {
    fn read(&self) -> Self::Value {
        let mut prev = self.base.clone();
        prev.step_back();
        prev.read()
    }

    fn step(&mut self) {
        self.base.step_back();
    }
}

impl<C: BidirectionalCursor> ForwardCursor for ReverseCursor<C> {}

impl<C: BidirectionalCursor> BidirectionalCursor for ReverseCursor<C> {
    fn step_back(&mut self) {
        self.base.step();
    }
}

impl<C: RandomAccessCursor> RandomAccessCursor for ReverseCursor<C> {
    fn jump(&mut self, n: Difference) {
        self.base.jump(-n);
    }

    fn offset_from(&self, origin: &Self) -> Difference {
        origin.base.offset_from(&self.base)
    }
}
