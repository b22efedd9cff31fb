use crate::{
    alloc::Allocator,
    collections::GrowthStrategy,
    iter::*,
};

use super::DynArray;

/// Per-tag implementation of the range operations of [`DynArray`].
///
/// Single-pass cursors are consumed one element at a time, with the container growing as needed.
/// Multi-pass cursors are measured with [`distance`] first, so the container grows at most once.
pub trait RangeDispatch<C: Cursor>: Category {
    /// Build a dynamic array from `[first, last)`.
    fn from_range<A, G>(first: C, last: C, alloc: A) -> DynArray<C::Value, A, G> where
        A: Allocator<C::Value>,
        G: GrowthStrategy;

    /// Replace the contents of `arr` with `[first, last)`.
    fn assign_range<A, G>(arr: &mut DynArray<C::Value, A, G>, first: C, last: C) where
        A: Allocator<C::Value>,
        G: GrowthStrategy;

    /// Insert `[first, last)` before `index`.
    fn insert_range<A, G>(arr: &mut DynArray<C::Value, A, G>, index: usize, first: C, last: C) where
        A: Allocator<C::Value>,
        G: GrowthStrategy;
}

impl<C: Cursor> RangeDispatch<C> for InputTag {
    fn from_range<A, G>(mut first: C, last: C, alloc: A) -> DynArray<C::Value, A, G> where
        A: Allocator<C::Value>,
        G: GrowthStrategy
    {
        let mut arr = DynArray::new_in(alloc);
        while first != last {
            arr.push_back(first.read());
            first.step();
        }
        arr
    }

    fn assign_range<A, G>(arr: &mut DynArray<C::Value, A, G>, mut first: C, last: C) where
        A: Allocator<C::Value>,
        G: GrowthStrategy
    {
        let mut i = 0;
        while i < arr.len() && first != last {
            arr[i] = first.read();
            first.step();
            i += 1;
        }

        if first == last {
            arr.truncate(i);
        } else {
            while first != last {
                arr.push_back(first.read());
                first.step();
            }
        }
    }

    fn insert_range<A, G>(arr: &mut DynArray<C::Value, A, G>, mut index: usize, mut first: C, last: C) where
        A: Allocator<C::Value>,
        G: GrowthStrategy
    {
        while first != last {
            arr.insert(index, first.read());
            index += 1;
            first.step();
        }
    }
}

fn checked_distance<C, D>(first: &C, last: &C) -> usize where
    C: ForwardCursor,
    D: DistanceDispatch<C>
{
    #[cold]
    #[track_caller]
    fn assert_failed(n: Difference) -> ! {
        panic!("range end is before its start (distance is {n})");
    }

    let n = D::distance(first.clone(), last.clone());
    if n < 0 {
        assert_failed(n);
    }
    n as usize
}

/// Produce the elements of a multi-pass range one at a time.
fn reader<C: Cursor>(mut it: C) -> impl FnMut() -> C::Value {
    move || {
        let value = it.read();
        it.step();
        value
    }
}

macro_rules! impl_forward_range {
    ($tag:ty, $cursor:ident) => {
        impl<C: $cursor> RangeDispatch<C> for $tag {
            fn from_range<A, G>(first: C, last: C, alloc: A) -> DynArray<C::Value, A, G> where
                A: Allocator<C::Value>,
                G: GrowthStrategy
            {
                let n = checked_distance::<C, $tag>(&first, &last);
                let mut arr = DynArray::with_capacity_in(n, alloc);
                // SAFETY: The array was just created with exactly `n` slots
                unsafe { arr.append_within_capacity(n, reader(first)) };
                arr
            }

            fn assign_range<A, G>(arr: &mut DynArray<C::Value, A, G>, first: C, last: C) where
                A: Allocator<C::Value>,
                G: GrowthStrategy
            {
                let n = checked_distance::<C, $tag>(&first, &last);
                let len = arr.len();

                if n > arr.capacity() {
                    *arr = <$tag as RangeDispatch<C>>::from_range(first, last, arr.allocator().clone());
                } else if n > len {
                    let mut mid = first.clone();
                    <$tag as DistanceDispatch<C>>::advance(&mut mid, len as Difference);

                    let mut src = reader(first);
                    for elem in arr.iter_mut() {
                        *elem = src();
                    }
                    // SAFETY: `n <= capacity`
                    unsafe { arr.append_within_capacity(n - len, reader(mid)) };
                } else {
                    let mut src = reader(first);
                    for elem in &mut arr[..n] {
                        *elem = src();
                    }
                    arr.truncate(n);
                }
            }

            fn insert_range<A, G>(arr: &mut DynArray<C::Value, A, G>, index: usize, first: C, last: C) where
                A: Allocator<C::Value>,
                G: GrowthStrategy
            {
                let n = checked_distance::<C, $tag>(&first, &last);
                arr.insert_fill(index, n, reader(first));
            }
        }
    };
}

impl_forward_range!(ForwardTag, ForwardCursor);
impl_forward_range!(BidirectionalTag, BidirectionalCursor);
impl_forward_range!(RandomAccessTag, RandomAccessCursor);
