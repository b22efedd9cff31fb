pub use core::prelude::*;

pub use crate::alloc::{Allocator, AllocError, primitives::Mallocator};

pub use crate::iter::{
    IteratorTraits, Cursor, ForwardCursor, BidirectionalCursor, RandomAccessCursor, OutputCursor,
    distance, advance,
};

pub use crate::collections::{DynArray, OutOfRange};
pub use crate::dynarray;
