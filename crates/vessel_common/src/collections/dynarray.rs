use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ops::{Bound, Deref, DerefMut, Index, IndexMut, Range, RangeBounds},
    ptr::{self, NonNull},
    slice::{self, SliceIndex},
};

use scopeguard::{guard, ScopeGuard};
use vessel_logging::{log_warning, LogCategory};

use crate::{
    alloc::{handle_error, primitives::Mallocator, AllocError, Allocator},
    iter::{Cursor, InsertAt, PushBack, ReverseCursor, SliceCursor},
};
use self::raw::RawBuffer;

use super::{impl_slice_partial_eq_generic, DoubleOrExactGrowth, GrowthStrategy, OutOfRange};

mod raw;
mod range;
mod into_iter;

pub use range::RangeDispatch;
pub use into_iter::IntoIter;

const LOG_CAT : LogCategory = LogCategory::new_with_sub("Collections", "DynArray");

/// A contiguous growable array type, also known as a dynamic array, or DynArray.
///
/// Dynamic arrays have *O*(1) indexing, amortized *O*(1) push (to the end), and *O*(1) pop (from the back).
///
/// Storage comes from the allocation policy `A`, which also places and destroys the elements,
/// and grows as decided by the growth strategy `G`.
///
/// # Examples
///
/// ```
/// # use vessel_common::prelude::*;
/// let mut arr = DynArray::<i32>::new();
/// arr.push_back(1);
/// arr.push_back(2);
///
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr[0], 1);
///
/// arr[0] = 7;
/// assert_eq!(arr[0], 7);
///
/// arr.extend([1, 2, 3]);
/// assert_eq!(arr, [7, 2, 1, 2, 3]);
/// ```
///
/// The [`dynarray!`](crate::dynarray) macro is provided for convenient initialization:
///
/// ```
/// # use vessel_common::prelude::*;
/// let mut arr1 = dynarray![1, 2, 3];
/// arr1.push_back(4);
/// let arr2 = dynarray![1, 2, 3, 4];
/// assert_eq!(arr1, arr2);
///
/// let zeros = dynarray![0; 5];
/// assert_eq!(zeros, [0, 0, 0, 0, 0]);
/// ```
///
/// # Indexing
///
/// The `DynArray` type allows access to values by index, because it implements the [`Index`] trait.
/// Indexing out of bounds panics, use [`at`](DynArray::at) to get an error instead.
///
/// # Cursors
///
/// Besides slice iteration, a `DynArray` hands out [`SliceCursor`]s with [`begin`](DynArray::begin) and [`end`](DynArray::end).
/// The range operations ([`from_range`](DynArray::from_range), [`assign_range`](DynArray::assign_range), [`insert_range`](DynArray::insert_range))
/// accept any cursor pair and pick their algorithm from the cursor's capability tag:
/// a single-pass range is consumed element by element, a multi-pass range is measured first so the array grows at most once.
///
/// # Capacity and reallocation
///
/// The capacity of a dynamic array is the amount of space allocated for any future elements that will be added onto the array.
/// This is not to be confused with the *length*, which specifies the number of actual elements within the dynamic array.
/// If the length would exceed the capacity, a new buffer is allocated and the elements are moved into it.
///
/// With the default [`DoubleOrExactGrowth`], adding a few elements doubles the capacity,
/// while adding more elements than the array holds grows it to exactly the required size.
/// [`reserve`](DynArray::reserve) and [`with_capacity`](DynArray::with_capacity) allocate exactly what is asked for.
///
/// # Guarantees
///
/// Operations that reallocate build the new buffer completely before the old one is released, so a panic while producing
/// new elements leaves the array as it was. Operations that shift elements in place restore the shifted elements when a panic occurs.
/// In both cases, every element that was constructed is destroyed exactly once.
pub struct DynArray<T, A: Allocator<T> = Mallocator, G: GrowthStrategy = DoubleOrExactGrowth> {
    buf:      RawBuffer<T, A>,
    len:      usize,
    _phantom: PhantomData<G>,
}

static_assertions::assert_eq_size!(DynArray<u8>, [usize; 3]);

#[cold]
#[track_caller]
fn empty_failed(op: &str) -> ! {
    panic!("`{op}` called on an empty dynamic array");
}

/// Destroy `n` consecutive elements starting at `ptr`.
///
/// # Safety
///
/// The elements must be live and are uninitialized afterwards.
unsafe fn destroy_each<T, A: Allocator<T>>(alloc: &mut A, ptr: *mut T, n: usize) {
    for i in 0..n {
        alloc.destroy(NonNull::new_unchecked(ptr.add(i)));
    }
}

/// Resolve `range` against a sequence of length `len`.
#[track_caller]
fn resolve_range<R: RangeBounds<usize>>(range: R, len: usize) -> Range<usize> {
    #[cold]
    #[track_caller]
    fn assert_failed(start: usize, end: usize, len: usize) -> ! {
        panic!("range {start}..{end} is out of bounds for length {len}");
    }

    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    if start > end || end > len {
        assert_failed(start, end, len);
    }
    start..end
}

impl<T, A: Allocator<T>, G: GrowthStrategy> DynArray<T, A, G> {
    /// Constructs a new, empty `DynArray` using the given allocator.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self { buf: RawBuffer::new_in(alloc), len: 0, _phantom: PhantomData }
    }

    /// Constructs a new, empty `DynArray`.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::new_in(A::default())
    }

    /// Constructs a new, empty `DynArray` with exactly `capacity` slots, using the given allocator.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`max_size`](DynArray::max_size).
    #[must_use]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(arr) => arr,
            Err(err) => handle_error(err),
        }
    }

    /// Constructs a new, empty `DynArray` with exactly `capacity` slots.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let mut arr = DynArray::<i32>::with_capacity(10);
    /// assert_eq!(arr.len(), 0);
    /// assert_eq!(arr.capacity(), 10);
    ///
    /// for i in 0..10 {
    ///     arr.push_back(i);
    /// }
    /// assert_eq!(arr.capacity(), 10);
    ///
    /// arr.push_back(11);
    /// assert_eq!(arr.capacity(), 20);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, A::default())
    }

    /// Tries to construct a new, empty `DynArray` with exactly `capacity` slots, using the given allocator.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        Ok(Self { buf: RawBuffer::try_with_capacity_in(capacity, alloc)?, len: 0, _phantom: PhantomData })
    }

    /// Tries to construct a new, empty `DynArray` with exactly `capacity` slots.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Self::try_with_capacity_in(capacity, A::default())
    }

    /// Build a dynamic array from the cursor range `[first, last)`, using the given allocator.
    ///
    /// Single-pass ranges are pushed one by one, multi-pass ranges allocate exactly [`distance`](crate::iter::distance)`(first, last)` slots.
    pub fn from_range_in<C>(first: C, last: C, alloc: A) -> Self where
        C: Cursor<Value = T>,
        C::Category: RangeDispatch<C>
    {
        <C::Category as RangeDispatch<C>>::from_range(first, last, alloc)
    }

    /// Build a dynamic array from the cursor range `[first, last)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// # use vessel_common::iter::{SliceCursor, StreamCursor};
    /// let src = [1, 2, 3, 4];
    /// let arr: DynArray<i32> = DynArray::from_range(SliceCursor::begin(&src), SliceCursor::end(&src));
    /// assert_eq!(arr, src);
    /// assert_eq!(arr.capacity(), 4);
    ///
    /// let (first, last) = StreamCursor::range(src);
    /// let arr: DynArray<i32> = DynArray::from_range(first, last);
    /// assert_eq!(arr, src);
    /// ```
    pub fn from_range<C>(first: C, last: C) -> Self where
        C: Cursor<Value = T>,
        C::Category: RangeDispatch<C>
    {
        Self::from_range_in(first, last, A::default())
    }

    /// Returns the total number of elements the dynamic array can hold without reallocating.
    ///
    /// This is always `usize::MAX` for zero-sized types.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the largest number of elements the dynamic array could ever hold.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.buf.allocator().max_size()
    }

    /// Returns the number of elements in the dynamic array, also referred to as the 'length'.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the dynamic array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the underlying allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Makes sure the dynamic array can hold at least `capacity` elements.
    ///
    /// If `capacity` is larger than the current capacity, the elements are moved into a new buffer of exactly `capacity` slots.
    /// Otherwise this does nothing, the capacity never shrinks.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`max_size`](DynArray::max_size).
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let mut arr = dynarray![1];
    /// arr.reserve(10);
    /// assert_eq!(arr.capacity(), 10);
    /// arr.reserve(5);
    /// assert_eq!(arr.capacity(), 10);
    /// ```
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(err) = self.try_reserve(capacity) {
            handle_error(err);
        }
    }

    /// Tries to make sure the dynamic array can hold at least `capacity` elements.
    ///
    /// # Errors
    ///
    /// If the capacity overflows, or the allocator reports a failure, an error is returned and the dynamic array is left untouched.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), AllocError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        // SAFETY: `len < capacity` and the first `len` elements are live
        unsafe { self.buf.try_reallocate(self.len, capacity) }
    }

    /// Make sure there is room for `additional` more elements, growing as the growth strategy decides.
    fn try_grow_for(&mut self, additional: usize) -> Result<(), AllocError> {
        if self.capacity() - self.len >= additional {
            return Ok(());
        }
        let new_cap = G::calculate(self.len, additional)?;
        // SAFETY: `len < new_cap` and the first `len` elements are live
        unsafe { self.buf.try_reallocate(self.len, new_cap) }
    }

    fn grow_for(&mut self, additional: usize) {
        if let Err(err) = self.try_grow_for(additional) {
            handle_error(err);
        }
    }

    /// Shrinks the capacity of the dynamic array to exactly its length.
    ///
    /// An empty dynamic array releases its buffer entirely.
    /// If the smaller buffer can't be allocated, the dynamic array is left as it is.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let mut arr = DynArray::<i32>::with_capacity(10);
    /// arr.extend([1, 2, 3]);
    /// assert_eq!(arr.capacity(), 10);
    /// arr.shrink_to_fit();
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        if let Err(err) = self.try_shrink_to_fit() {
            log_warning!(LOG_CAT, "Failed to shrink a dynamic array of {} elements: {}", self.len, err);
        }
    }

    /// Tries to shrink the capacity of the dynamic array to exactly its length.
    ///
    /// # Errors
    ///
    /// If the allocator reports a failure, an error is returned and the dynamic array is left untouched.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), AllocError> {
        if self.capacity() <= self.len {
            return Ok(());
        }
        // SAFETY: `len < capacity` and the first `len` elements are live
        unsafe { self.buf.try_reallocate(self.len, self.len) }
    }

    /// Shortens the dynamic array, keeping the first `len` elements and destroying the rest.
    ///
    /// If `len` is greater or equal to the dynamic array's current length, this has no effect.
    /// This has no effect on the capacity.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let remaining = self.len - len;
        // Set the length before destroying, a panicking destructor then leaks the rest instead of destroying some twice.
        self.len = len;
        unsafe {
            let tail = self.buf.ptr().add(len);
            destroy_each(self.buf.allocator_mut(), tail, remaining);
        }
    }

    /// Extracts a slice containing the entire dynamic array.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// Extracts a mutable slice of the entire dynamic array.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Returns a raw pointer to the dynamic array's buffer, or a dangling pointer if no buffer is allocated.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// Returns an unsafe mutable pointer to the dynamic array's buffer, or a dangling pointer if no buffer is allocated.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let arr = dynarray![10, 40, 30];
    /// assert_eq!(arr.at(1), Ok(&40));
    /// assert_eq!(arr.at(3), Err(OutOfRange { index: 3, len: 3 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        let len = self.len;
        self.as_slice().get(index).ok_or(OutOfRange { index, len })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        let len = self.len;
        self.as_mut_slice().get_mut(index).ok_or(OutOfRange { index, len })
    }

    /// Returns a reference to the first element.
    ///
    /// # Panics
    ///
    /// Panics if the dynamic array is empty.
    #[track_caller]
    pub fn front(&self) -> &T {
        match self.as_slice().first() {
            Some(elem) => elem,
            None => empty_failed("front"),
        }
    }

    /// Returns a mutable reference to the first element.
    ///
    /// # Panics
    ///
    /// Panics if the dynamic array is empty.
    #[track_caller]
    pub fn front_mut(&mut self) -> &mut T {
        match self.as_mut_slice().first_mut() {
            Some(elem) => elem,
            None => empty_failed("front_mut"),
        }
    }

    /// Returns a reference to the last element.
    ///
    /// # Panics
    ///
    /// Panics if the dynamic array is empty.
    #[track_caller]
    pub fn back(&self) -> &T {
        match self.as_slice().last() {
            Some(elem) => elem,
            None => empty_failed("back"),
        }
    }

    /// Returns a mutable reference to the last element.
    ///
    /// # Panics
    ///
    /// Panics if the dynamic array is empty.
    #[track_caller]
    pub fn back_mut(&mut self) -> &mut T {
        match self.as_mut_slice().last_mut() {
            Some(elem) => elem,
            None => empty_failed("back_mut"),
        }
    }

    /// Cursor to the first element.
    #[inline]
    pub fn begin(&self) -> SliceCursor<'_, T> {
        SliceCursor::begin(self.as_slice())
    }

    /// Cursor one past the last element.
    #[inline]
    pub fn end(&self) -> SliceCursor<'_, T> {
        SliceCursor::end(self.as_slice())
    }

    /// Reverse cursor to the last element.
    #[inline]
    pub fn rbegin(&self) -> ReverseCursor<SliceCursor<'_, T>> {
        ReverseCursor::new(self.end())
    }

    /// Reverse cursor one before the first element.
    #[inline]
    pub fn rend(&self) -> ReverseCursor<SliceCursor<'_, T>> {
        ReverseCursor::new(self.begin())
    }

    /// Appends an element to the back of the dynamic array.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds [`max_size`](DynArray::max_size).
    ///
    /// # Time complexity
    ///
    /// Takes amortized *O*(1) time.
    /// If the dynamic array's length would exceed its capacity after the push, *O*(*capacity*) time is taken to move the elements to a larger buffer.
    #[inline]
    pub fn push_back(&mut self, value: T) {
        let len = self.len;
        if len == self.capacity() {
            self.grow_for(1);
        }
        unsafe {
            self.construct_at(len, value);
        }
        self.len = len + 1;
    }

    /// Removes the last element from a dynamic array and returns it, or [`None`] if it is empty.
    ///
    /// # Time complexity
    ///
    /// Takes *O*(1) time.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            unsafe { Some(ptr::read(self.buf.ptr().add(self.len))) }
        }
    }

    /// Inserts an element at position `index` within the dynamic array, shifting all elements after it to the right.
    ///
    /// Returns the index of the inserted element.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let mut arr = dynarray![1, 2, 3];
    /// arr.insert(1, 4);
    /// assert_eq!(arr, [1, 4, 2, 3]);
    /// arr.insert(4, 5);
    /// assert_eq!(arr, [1, 4, 2, 3, 5]);
    /// ```
    ///
    /// # Time complexity
    ///
    /// Takes *O*([`DynArray::len`]) time.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        let len = self.len;
        if index > len {
            assert_failed(index, len);
        }

        if len < self.capacity() {
            unsafe {
                let p = self.buf.ptr().add(index);
                if index < len {
                    // Shift everything over to make space.
                    ptr::copy(p, p.add(1), len - index);
                }
                self.construct_at(index, value);
            }
            self.len = len + 1;
        } else {
            self.insert_realloc(index, value);
        }
        index
    }

    /// Insert into a new, larger buffer, placing the new element before moving the existing ones around it.
    #[cold]
    fn insert_realloc(&mut self, index: usize, value: T) {
        let len = self.len;
        let mut new_buf = match G::calculate(len, 1)
            .and_then(|cap| RawBuffer::try_with_capacity_in(cap, self.buf.allocator().clone()))
        {
            Ok(buf) => buf,
            Err(err) => handle_error(err),
        };

        unsafe {
            let dst = new_buf.ptr();
            new_buf.allocator_mut().construct(NonNull::new_unchecked(dst.add(index)), value);

            let src = self.buf.ptr();
            ptr::copy_nonoverlapping(src, dst, index);
            ptr::copy_nonoverlapping(src.add(index), dst.add(index + 1), len - index);
        }

        // The old buffer now only holds moved-from slots and is released when `new_buf` goes out of scope.
        self.buf.swap_buffer(&mut new_buf);
        self.len = len + 1;
    }

    /// Insert `n` elements produced by `produce` before `index`.
    ///
    /// If there is enough spare capacity, the tail is moved aside and the hole is filled in place.
    /// Otherwise the new elements are produced into a new buffer first, before the existing elements are moved over.
    /// If `produce` panics, all produced elements are destroyed and the dynamic array is left as it was.
    #[track_caller]
    pub(crate) fn insert_fill<F>(&mut self, index: usize, n: usize, mut produce: F) where
        F: FnMut() -> T
    {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        let len = self.len;
        if index > len {
            assert_failed(index, len);
        }
        if n == 0 {
            return;
        }

        if self.capacity() - len >= n {
            let base = self.buf.ptr();
            let tail = len - index;
            unsafe {
                ptr::copy(base.add(index), base.add(index + n), tail);
            }
            // The moved tail is owned by the guard until the hole is filled.
            self.len = index;
            let len_ptr: *mut usize = &mut self.len;

            let mut hole = guard((self.buf.allocator().clone(), 0usize), |(mut alloc, filled)| unsafe {
                destroy_each(&mut alloc, base.add(index), filled);
                ptr::copy(base.add(index + n), base.add(index), tail);
                *len_ptr = index + tail;
            });
            while hole.1 < n {
                let value = produce();
                let (alloc, filled) = &mut *hole;
                unsafe { alloc.construct(NonNull::new_unchecked(base.add(index + *filled)), value) };
                *filled += 1;
            }
            let _ = ScopeGuard::into_inner(hole);

            self.len = len + n;
        } else {
            let mut new_buf = match G::calculate(len, n)
                .and_then(|cap| RawBuffer::try_with_capacity_in(cap, self.buf.allocator().clone()))
            {
                Ok(buf) => buf,
                Err(err) => handle_error(err),
            };

            let dst = new_buf.ptr();
            let mut fill = guard((new_buf.allocator().clone(), 0usize), |(mut alloc, filled)| unsafe {
                destroy_each(&mut alloc, dst.add(index), filled);
            });
            while fill.1 < n {
                let value = produce();
                let (alloc, filled) = &mut *fill;
                unsafe { alloc.construct(NonNull::new_unchecked(dst.add(index + *filled)), value) };
                *filled += 1;
            }
            let _ = ScopeGuard::into_inner(fill);

            unsafe {
                let src = self.buf.ptr();
                ptr::copy_nonoverlapping(src, dst, index);
                ptr::copy_nonoverlapping(src.add(index), dst.add(index + n), len - index);
            }
            self.buf.swap_buffer(&mut new_buf);
            self.len = len + n;
        }
    }

    /// Inserts the cursor range `[first, last)` before `index`, returning `index`.
    ///
    /// A multi-pass range is measured first and inserted with a single shift or reallocation,
    /// a single-pass range is inserted one element at a time.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let src = dynarray![7, 8];
    /// let mut arr = dynarray![1, 2, 3];
    /// arr.insert_range(1, src.begin(), src.end());
    /// assert_eq!(arr, [1, 7, 8, 2, 3]);
    /// ```
    #[track_caller]
    pub fn insert_range<C>(&mut self, index: usize, first: C, last: C) -> usize where
        C: Cursor<Value = T>,
        C::Category: RangeDispatch<C>
    {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        if index > self.len {
            assert_failed(index, self.len);
        }
        <C::Category as RangeDispatch<C>>::insert_range(self, index, first, last);
        index
    }

    /// Replaces the contents of the dynamic array with the cursor range `[first, last)`.
    ///
    /// Existing elements are assigned to where possible, the buffer is only replaced when the range doesn't fit.
    pub fn assign_range<C>(&mut self, first: C, last: C) where
        C: Cursor<Value = T>,
        C::Category: RangeDispatch<C>
    {
        <C::Category as RangeDispatch<C>>::assign_range(self, first, last)
    }

    /// Removes the element at `index`, shifting all elements after it to the left.
    ///
    /// Returns `index`, which now refers to the element that followed the removed one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("erase index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }
        unsafe {
            let p = self.buf.ptr().add(index);
            let mut value = ManuallyDrop::new(ptr::read(p));
            ptr::copy(p.add(1), p, len - index - 1);
            self.len = len - 1;
            // The array is consistent again, so the destructor is free to panic
            self.buf.allocator_mut().destroy(NonNull::from(&mut *value));
        }
        index
    }

    /// Removes the elements in `[first, last)`, shifting all elements after them to the left.
    ///
    /// Returns `first`, which now refers to the element that followed the removed range.
    ///
    /// # Panics
    ///
    /// Panics if `first > last` or `last > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let mut arr = dynarray![0, 1, 2, 3, 4, 5, 6, 7];
    /// assert_eq!(arr.erase_range(5, arr.len()), 5);
    /// assert_eq!(arr, [0, 1, 2, 3, 4]);
    /// arr.erase_range(1, 3);
    /// assert_eq!(arr, [0, 3, 4]);
    /// ```
    #[track_caller]
    pub fn erase_range(&mut self, first: usize, last: usize) -> usize {
        let Range { start, end } = resolve_range(first..last, self.len);
        if start == end {
            return first;
        }

        let tail = self.len - end;
        let base = self.buf.ptr();
        self.len = start;
        let len_ptr: *mut usize = &mut self.len;
        // Close the gap even when a destructor panics
        defer! {
            unsafe {
                ptr::copy(base.add(end), base.add(start), tail);
                *len_ptr = start + tail;
            }
        }
        unsafe { destroy_each(self.buf.allocator_mut(), base.add(start), end - start) };
        first
    }

    /// Removes and returns the element at position `index`, shifting all elements after it to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }
        unsafe {
            let p = self.buf.ptr().add(index);
            let ret = ptr::read(p);
            ptr::copy(p.add(1), p, len - index - 1);
            self.len = len - 1;
            ret
        }
    }

    /// Clears the dynamic array, removing all values.
    ///
    /// Note that this has no effect on the allocated capacity of the dynamic array.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the dynamic array in-place so that `len` is equal to `new_len`, filling new slots with `T::default()`.
    pub fn resize_default(&mut self, new_len: usize) where
        T: Default
    {
        if new_len < self.len {
            self.truncate(new_len);
        } else {
            let len = self.len;
            self.insert_fill(len, new_len - len, T::default);
        }
    }

    /// Swaps the contents, including buffer and allocator, with `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Append `n` produced elements into the spare capacity.
    ///
    /// The length is updated after every element, so a panicking `produce` keeps everything written so far.
    ///
    /// # Safety
    ///
    /// At least `n` slots of spare capacity must be available.
    pub(crate) unsafe fn append_within_capacity<F>(&mut self, n: usize, mut produce: F) where
        F: FnMut() -> T
    {
        debug_assert!(self.capacity() - self.len >= n);
        for _ in 0..n {
            let value = produce();
            self.construct_at(self.len, value);
            self.len += 1;
        }
    }

    /// Place `value` in the slot at `index` through the allocator.
    ///
    /// # Safety
    ///
    /// `index` must be below the capacity and the slot uninitialized.
    #[inline]
    unsafe fn construct_at(&mut self, index: usize, value: T) {
        let p = NonNull::new_unchecked(self.buf.ptr().add(index));
        self.buf.allocator_mut().construct(p, value);
    }
}

impl<T: Default, A: Allocator<T>, G: GrowthStrategy> DynArray<T, A, G> {
    /// Constructs a dynamic array of exactly `len` default values, using the given allocator.
    pub fn with_len_in(len: usize, alloc: A) -> Self {
        let mut arr = Self::with_capacity_in(len, alloc);
        // SAFETY: The array was just created with exactly `len` slots
        unsafe { arr.append_within_capacity(len, T::default) };
        arr
    }

    /// Constructs a dynamic array of exactly `len` default values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let arr = DynArray::<u32>::with_len(3);
    /// assert_eq!(arr, [0, 0, 0]);
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    pub fn with_len(len: usize) -> Self {
        Self::with_len_in(len, A::default())
    }
}

impl<T: Clone, A: Allocator<T>, G: GrowthStrategy> DynArray<T, A, G> {
    /// Constructs a dynamic array of exactly `n` clones of `value`, using the given allocator.
    pub fn from_elem_in(n: usize, value: T, alloc: A) -> Self {
        let mut arr = Self::with_capacity_in(n, alloc);
        // SAFETY: The array was just created with exactly `n` slots
        unsafe { arr.append_within_capacity(n, || value.clone()) };
        arr
    }

    /// Constructs a dynamic array of exactly `n` clones of `value`.
    pub fn from_elem(n: usize, value: T) -> Self {
        Self::from_elem_in(n, value, A::default())
    }

    /// Constructs a dynamic array with clones of the elements in `slice`, using exactly `slice.len()` slots.
    pub fn from_slice_in(slice: &[T], alloc: A) -> Self {
        let mut arr = Self::with_capacity_in(slice.len(), alloc);
        arr.extend_from_slice(slice);
        arr
    }

    /// Clones and appends all elements in a slice to the dynamic array.
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.grow_for(other.len());
        let mut i = 0;
        // SAFETY: The call above made room for `other.len()` elements
        unsafe { self.append_within_capacity(other.len(), || {
            let value = other[i].clone();
            i += 1;
            value
        }) };
    }

    /// Replaces the contents of the dynamic array with `n` clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let mut arr = dynarray![1, 2, 3, 4];
    /// arr.assign_n(2, 9);
    /// assert_eq!(arr, [9, 9]);
    /// assert_eq!(arr.capacity(), 4);
    /// ```
    pub fn assign_n(&mut self, n: usize, value: T) {
        if n > self.capacity() {
            *self = Self::from_elem_in(n, value, self.allocator().clone());
        } else if n > self.len {
            for elem in self.iter_mut() {
                elem.clone_from(&value);
            }
            let remaining = n - self.len;
            // SAFETY: `n <= capacity`
            unsafe { self.append_within_capacity(remaining, || value.clone()) };
        } else {
            for elem in &mut self[..n] {
                elem.clone_from(&value);
            }
            self.truncate(n);
        }
    }

    /// Inserts `n` clones of `value` before `index`, returning `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let mut arr = dynarray![1, 2];
    /// arr.insert_n(1, 3, 0);
    /// assert_eq!(arr, [1, 0, 0, 0, 2]);
    /// ```
    #[track_caller]
    pub fn insert_n(&mut self, index: usize, n: usize, value: T) -> usize {
        self.insert_fill(index, n, || value.clone());
        index
    }

    /// Inserts clones of the elements in `src` before `index`, returning `index`.
    ///
    /// The sources are cloned before the dynamic array is modified, so `src` may overlap `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or `src` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vessel_common::prelude::*;
    /// let mut arr = dynarray![1, 2, 3];
    /// arr.insert_from_within(1, ..);
    /// assert_eq!(arr, [1, 1, 2, 3, 2, 3]);
    /// ```
    #[track_caller]
    pub fn insert_from_within<R: RangeBounds<usize>>(&mut self, index: usize, src: R) -> usize {
        let src = resolve_range(src, self.len);
        let mut clones = Self::from_slice_in(&self[src], self.allocator().clone());

        let n = clones.len();
        let src_ptr = clones.as_ptr();
        let mut moved = 0;
        self.insert_fill(index, n, || {
            // SAFETY: `insert_fill` calls `produce` exactly `n` times and can't fail after the first call, so every clone is moved out once
            let value = unsafe { ptr::read(src_ptr.add(moved)) };
            moved += 1;
            value
        });
        // Every clone was moved into `self`
        clones.len = 0;
        index
    }

    /// Resizes the dynamic array in-place so that `len` is equal to `new_len`.
    ///
    /// If `new_len` is greater than `len`, the dynamic array is extended by the difference, with each additional slot filled with `value`.
    /// If `new_len` is less than `len`, the dynamic array is simply truncated.
    pub fn resize(&mut self, new_len: usize, value: T) {
        if new_len < self.len {
            self.truncate(new_len);
        } else {
            let len = self.len;
            self.insert_n(len, new_len - len, value);
        }
    }
}

//------------------------------------------------------------------------------------------------------------------------------

impl<T, A: Allocator<T>, G: GrowthStrategy> Deref for DynArray<T, A, G> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> DerefMut for DynArray<T, A, G> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: Allocator<T>, G: GrowthStrategy> Clone for DynArray<T, A, G> {
    fn clone(&self) -> Self {
        Self::from_slice_in(self, self.allocator().clone())
    }

    /// Overwrites the contents of `self` with a clone of the contents of `source`.
    ///
    /// Existing elements and the existing buffer are reused where possible.
    fn clone_from(&mut self, source: &Self) {
        let n = source.len();
        if n > self.capacity() {
            *self = Self::from_slice_in(source, self.allocator().clone());
        } else if n > self.len {
            let (prefix, rest) = source.split_at(self.len);
            self.as_mut_slice().clone_from_slice(prefix);
            let mut i = 0;
            // SAFETY: `n <= capacity`
            unsafe { self.append_within_capacity(rest.len(), || {
                let value = rest[i].clone();
                i += 1;
                value
            }) };
        } else {
            self[..n].clone_from_slice(source);
            self.truncate(n);
        }
    }
}

impl<T: Hash, A: Allocator<T>, G: GrowthStrategy> Hash for DynArray<T, A, G> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(&**self, state)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator<T>, G: GrowthStrategy> Index<I> for DynArray<T, A, G> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(&**self, index)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator<T>, G: GrowthStrategy> IndexMut<I> for DynArray<T, A, G> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(&mut **self, index)
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> FromIterator<T> for DynArray<T, A, G> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::new();
        arr.extend(iter);
        arr
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> IntoIterator for DynArray<T, A, G> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    /// Creates a consuming iterator, that is, one that moves each value out of the dynamic array (from start to end).
    fn into_iter(self) -> Self::IntoIter {
        let me = ManuallyDrop::new(self);
        // SAFETY: `me` is never used or dropped again, so the buffer is moved into the iterator exactly once
        let buf = unsafe { ptr::read(&me.buf) };
        IntoIter { buf, start: 0, end: me.len }
    }
}

impl<'a, T, A: Allocator<T>, G: GrowthStrategy> IntoIterator for &'a DynArray<T, A, G> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator<T>, G: GrowthStrategy> IntoIterator for &'a mut DynArray<T, A, G> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> Extend<T> for DynArray<T, A, G> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.grow_for(lower);
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator<T>, G: GrowthStrategy> Extend<&'a T> for DynArray<T, A, G> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        Extend::<T>::extend(self, iter.into_iter().copied())
    }
}

impl_slice_partial_eq_generic!([A0: Allocator<T>, A1: Allocator<U>, G0: GrowthStrategy, G1: GrowthStrategy] DynArray<T, A0, G0>, DynArray<U, A1, G1>);
impl_slice_partial_eq_generic!([A: Allocator<T>, G: GrowthStrategy] DynArray<T, A, G>, &[U]);
impl_slice_partial_eq_generic!([A: Allocator<T>, G: GrowthStrategy] DynArray<T, A, G>, &mut [U]);
impl_slice_partial_eq_generic!([A: Allocator<U>, G: GrowthStrategy] &[T], DynArray<U, A, G>);
impl_slice_partial_eq_generic!([A: Allocator<U>, G: GrowthStrategy] &mut [T], DynArray<U, A, G>);
impl_slice_partial_eq_generic!([A: Allocator<T>, G: GrowthStrategy] DynArray<T, A, G>, [U]);
impl_slice_partial_eq_generic!([A: Allocator<U>, G: GrowthStrategy] [T], DynArray<U, A, G>);
impl_slice_partial_eq_generic!([A: Allocator<T>, G: GrowthStrategy, const N: usize] DynArray<T, A, G>, [U; N]);
impl_slice_partial_eq_generic!([A: Allocator<U>, G: GrowthStrategy, const N: usize] [T; N], DynArray<U, A, G>);

impl<T, A0, A1, G0, G1> PartialOrd<DynArray<T, A1, G1>> for DynArray<T, A0, G0> where
    T: PartialOrd,
    A0: Allocator<T>,
    A1: Allocator<T>,
    G0: GrowthStrategy,
    G1: GrowthStrategy
{
    #[inline]
    fn partial_cmp(&self, other: &DynArray<T, A1, G1>) -> Option<Ordering> {
        PartialOrd::partial_cmp(&**self, &**other)
    }
}

impl<T: Eq, A: Allocator<T>, G: GrowthStrategy> Eq for DynArray<T, A, G> {}

impl<T: Ord, A: Allocator<T>, G: GrowthStrategy> Ord for DynArray<T, A, G> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(&**self, &**other)
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> Drop for DynArray<T, A, G> {
    fn drop(&mut self) {
        let len = self.len;
        self.len = 0;
        let ptr = self.buf.ptr();
        // SAFETY: The first `len` elements are live, the raw buffer frees the memory afterwards
        unsafe { destroy_each(self.buf.allocator_mut(), ptr, len) };
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> Default for DynArray<T, A, G> {
    /// Creates an empty `DynArray<T>`.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, A: Allocator<T>, G: GrowthStrategy> fmt::Debug for DynArray<T, A, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> AsRef<[T]> for DynArray<T, A, G> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> AsMut<[T]> for DynArray<T, A, G> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone, A: Allocator<T>, G: GrowthStrategy> From<&[T]> for DynArray<T, A, G> {
    /// Allocate a `DynArray<T>` and fill it by cloning `s`'s items.
    fn from(s: &[T]) -> Self {
        Self::from_slice_in(s, A::default())
    }
}

impl<T: Clone, A: Allocator<T>, G: GrowthStrategy, const N: usize> From<&[T; N]> for DynArray<T, A, G> {
    fn from(s: &[T; N]) -> Self {
        Self::from_slice_in(s, A::default())
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy, const N: usize> From<[T; N]> for DynArray<T, A, G> {
    /// Allocate a `DynArray<T>` and move `value`'s items into it.
    fn from(value: [T; N]) -> Self {
        let mut arr = Self::with_capacity(N);
        let value = ManuallyDrop::new(value);
        // SAFETY: The array has room for exactly `N` elements, which are moved out of `value` without being dropped there
        unsafe {
            ptr::copy_nonoverlapping(value.as_ptr(), arr.as_mut_ptr(), N);
        }
        arr.len = N;
        arr
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> PushBack for DynArray<T, A, G> {
    type Item = T;

    fn push_back(&mut self, value: T) {
        DynArray::push_back(self, value)
    }
}

impl<T, A: Allocator<T>, G: GrowthStrategy> InsertAt for DynArray<T, A, G> {
    type Item = T;

    fn insert_at(&mut self, index: usize, value: T) -> usize {
        self.insert(index, value)
    }
}

/// Creates a [`DynArray`] containing the arguments.
///
/// - Create a [`DynArray`] containing a given list of elements:
///
/// ```
/// # use vessel_common::prelude::*;
/// let arr = dynarray![1, 2, 3];
/// assert_eq!(arr[0], 1);
/// assert_eq!(arr[1], 2);
/// assert_eq!(arr[2], 3);
/// ```
///
/// - Create a [`DynArray`] from a given element and size, the element is cloned:
///
/// ```
/// # use vessel_common::prelude::*;
/// let arr = dynarray![1; 3];
/// assert_eq!(arr, [1, 1, 1]);
/// ```
#[macro_export]
macro_rules! dynarray {
    () => {
        <$crate::collections::DynArray<_>>::new()
    };
    ($elem:expr; $n:expr) => {
        <$crate::collections::DynArray<_>>::from_elem($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        <$crate::collections::DynArray<_>>::from([$($x),+])
    };
}
