mod alloc;
mod tracking;

pub mod primitives;

pub use alloc::*;
pub use tracking::{MemoryStats, memory_stats};
