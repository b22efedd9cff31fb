use super::category::*;

/// Signed offset between two cursors.
pub type Difference = isize;

/// Describes what a cursor-like type is: its capability tag and the element type it yields or accepts.
///
/// The difference type of every cursor is [`Difference`], and the value returned by [`Cursor::read`] doubles as its reference type.
pub trait IteratorTraits {
    /// Capability tag of the cursor
    type Category: Category;
    /// Element type of the cursor
    type Value;
}

/// A position in a sequence that can be read and stepped forward.
///
/// Ranges are half-open pairs `[first, last)`: a cursor is stepped until it compares equal to `last`.
/// Reading or stepping a cursor that is equal to the end of its sequence is a precondition violation.
pub trait Cursor: IteratorTraits + PartialEq {
    /// Read the element at the current position.
    fn read(&self) -> Self::Value;

    /// Move to the next position.
    fn step(&mut self);
}

/// A cursor that can be copied, where each copy traverses the same sequence independently.
pub trait ForwardCursor: Cursor + Clone {}

/// A cursor that can also move backwards.
pub trait BidirectionalCursor: ForwardCursor {
    /// Move to the previous position.
    fn step_back(&mut self);
}

/// A cursor that can move by any offset in constant time.
pub trait RandomAccessCursor: BidirectionalCursor {
    /// Move by `n` positions, backwards when `n` is negative.
    fn jump(&mut self, n: Difference);

    /// Number of positions from `origin` to `self`, i.e. `self - origin`.
    fn offset_from(&self, origin: &Self) -> Difference;
}

/// A cursor that values can be written through.
pub trait OutputCursor: IteratorTraits<Category = OutputTag> {
    /// Write `value` at the current position and move past it.
    fn put(&mut self, value: Self::Value);
}

//------------------------------------------------------------------------------------------------------------------------------

/// Per-tag implementation of [`distance`] and [`advance`].
///
/// Implemented on the tag types, so the implementation is selected by the declared category of the cursor at compile time.
pub trait DistanceDispatch<C>: Category {
    /// Number of steps from `first` to `last`.
    fn distance(first: C, last: C) -> Difference;

    /// Move `it` by `n` steps.
    fn advance(it: &mut C, n: Difference);
}

fn count_steps<C: Cursor>(mut first: C, last: C) -> Difference {
    let mut n = 0;
    while first != last {
        first.step();
        n += 1;
    }
    n
}

fn step_forward<C: Cursor>(it: &mut C, mut n: Difference) {
    while n > 0 {
        it.step();
        n -= 1;
    }
}

impl<C: Cursor> DistanceDispatch<C> for InputTag {
    fn distance(first: C, last: C) -> Difference {
        count_steps(first, last)
    }

    /// Negative `n` can't be honored by a single-pass cursor and leaves `it` untouched.
    fn advance(it: &mut C, n: Difference) {
        step_forward(it, n)
    }
}

impl<C: ForwardCursor> DistanceDispatch<C> for ForwardTag {
    fn distance(first: C, last: C) -> Difference {
        count_steps(first, last)
    }

    fn advance(it: &mut C, n: Difference) {
        step_forward(it, n)
    }
}

impl<C: BidirectionalCursor> DistanceDispatch<C> for BidirectionalTag {
    fn distance(first: C, last: C) -> Difference {
        count_steps(first, last)
    }

    fn advance(it: &mut C, mut n: Difference) {
        if n >= 0 {
            step_forward(it, n)
        } else {
            while n != 0 {
                it.step_back();
                n += 1;
            }
        }
    }
}

impl<C: RandomAccessCursor> DistanceDispatch<C> for RandomAccessTag {
    fn distance(first: C, last: C) -> Difference {
        last.offset_from(&first)
    }

    fn advance(it: &mut C, n: Difference) {
        it.jump(n)
    }
}

/// Number of steps needed to get from `first` to `last`.
///
/// *O*(1) for random access cursors, *O*(*n*) otherwise.
/// For input cursors, `last` has to be reachable from `first`.
#[inline]
pub fn distance<C>(first: C, last: C) -> Difference where
    C: Cursor,
    C::Category: DistanceDispatch<C>
{
    <C::Category as DistanceDispatch<C>>::distance(first, last)
}

/// Move `it` by `n` steps.
///
/// Negative `n` is only supported for bidirectional and random access cursors.
/// *O*(1) for random access cursors, *O*(|*n*|) otherwise.
#[inline]
pub fn advance<C>(it: &mut C, n: Difference) where
    C: Cursor,
    C::Category: DistanceDispatch<C>
{
    <C::Category as DistanceDispatch<C>>::advance(it, n)
}

/// Copy the range `[first, last)` into `out`, returning the output cursor positioned after the last write.
pub fn copy<C, O>(mut first: C, last: C, mut out: O) -> O where
    C: Cursor,
    O: OutputCursor<Value = C::Value>
{
    while first != last {
        out.put(first.read());
        first.step();
    }
    out
}
