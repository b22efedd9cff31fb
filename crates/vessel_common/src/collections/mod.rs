use core::fmt;

use crate::alloc::AllocError;

mod dynarray;

pub use dynarray::*;

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq_generic {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty $(where $ty:ty: $bound:path)?) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs  where
            T : PartialEq<U>,
            $($ty: $bound)?
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
            #[inline]
            fn ne(&self, other: &$rhs) -> bool { self[..] != other[..] }
        }
    };
}
use impl_slice_partial_eq_generic;

//--------------------------------------------------------------

/// Error returned by checked element access when the index is not below the length.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OutOfRange {
    /// Requested index
    pub index: usize,
    /// Length of the container at the time of the access
    pub len:   usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index (is {}) should be < len (is {})", self.index, self.len)
    }
}

impl std::error::Error for OutOfRange {}

//--------------------------------------------------------------

/// A trait used to define how a container grows when it runs out of space.
pub trait GrowthStrategy {
    /// Calculate the new capacity for a container.
    ///
    /// `len` is the number of elements currently in the container, `additional` the number of elements about to be added.
    /// The result is never smaller than `len + additional`.
    ///
    /// Returns [`AllocError::CapacityOverflow`] if the capacity would overflow.
    fn calculate(len: usize, additional: usize) -> Result<usize, AllocError>;
}

/// Doubles the size for small additions, or grows to exactly the required size when more than the current size is added.
///
/// For a single element this results in the sequence `1, 2, 4, 8, ...`.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct DoubleOrExactGrowth;

impl GrowthStrategy for DoubleOrExactGrowth {
    fn calculate(len: usize, additional: usize) -> Result<usize, AllocError> {
        if additional > len {
            len.checked_add(additional).ok_or(AllocError::CapacityOverflow)
        } else if len == 0 {
            Ok(1)
        } else {
            len.checked_mul(2).ok_or(AllocError::CapacityOverflow)
        }
    }
}

/// Grows to the next power of 2 of the required size.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Pow2Growth;

impl GrowthStrategy for Pow2Growth {
    fn calculate(len: usize, additional: usize) -> Result<usize, AllocError> {
        len.checked_add(additional)
            .and_then(usize::checked_next_power_of_two)
            .ok_or(AllocError::CapacityOverflow)
    }
}
