mod mallocator;
mod system_allocator;

pub use mallocator::*;
pub use system_allocator::*;
