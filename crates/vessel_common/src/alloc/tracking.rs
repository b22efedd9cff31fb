/// Snapshot of the allocations made through the crate's allocators.
///
/// Only collected with the `memory_tracking` feature, otherwise every counter stays 0.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct MemoryStats {
    /// Number of successful allocations.
    pub allocations:   usize,
    /// Number of deallocations.
    pub deallocations: usize,
    /// Bytes currently allocated.
    pub live_bytes:    usize,
    /// Highest value `live_bytes` has reached.
    pub peak_bytes:    usize,
}

impl MemoryStats {
    /// Number of allocations that have not been deallocated yet.
    pub fn live_allocations(&self) -> usize {
        self.allocations.saturating_sub(self.deallocations)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "memory_tracking")] {
        use core::sync::atomic::{AtomicUsize, Ordering};

        static ALLOCATIONS   : AtomicUsize = AtomicUsize::new(0);
        static DEALLOCATIONS : AtomicUsize = AtomicUsize::new(0);
        static LIVE_BYTES    : AtomicUsize = AtomicUsize::new(0);
        static PEAK_BYTES    : AtomicUsize = AtomicUsize::new(0);

        pub(crate) fn record_alloc(bytes: usize) {
            ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            let live = LIVE_BYTES.fetch_add(bytes, Ordering::Relaxed) + bytes;
            PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
        }

        pub(crate) fn record_dealloc(bytes: usize) {
            DEALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            LIVE_BYTES.fetch_sub(bytes, Ordering::Relaxed);
        }

        /// Get the current allocation statistics.
        pub fn memory_stats() -> MemoryStats {
            MemoryStats {
                allocations: ALLOCATIONS.load(Ordering::Relaxed),
                deallocations: DEALLOCATIONS.load(Ordering::Relaxed),
                live_bytes: LIVE_BYTES.load(Ordering::Relaxed),
                peak_bytes: PEAK_BYTES.load(Ordering::Relaxed),
            }
        }
    } else {
        #[inline(always)]
        pub(crate) fn record_alloc(_bytes: usize) {}

        #[inline(always)]
        pub(crate) fn record_dealloc(_bytes: usize) {}

        /// Get the current allocation statistics.
        pub fn memory_stats() -> MemoryStats {
            MemoryStats::default()
        }
    }
}

#[cfg(all(test, feature = "memory_tracking"))]
mod tests {
    use crate::alloc::{Allocator, primitives::Mallocator};
    use super::memory_stats;

    #[test]
    fn counts_allocations() {
        let before = memory_stats();

        let mut alloc = Mallocator;
        let ptr = Allocator::<u64>::allocate(&mut alloc, 16).unwrap();
        let during = memory_stats();
        unsafe { Allocator::<u64>::deallocate(&mut alloc, ptr, 16) };
        let after = memory_stats();

        // Other tests allocate concurrently, so only growth can be checked
        assert!(during.allocations > before.allocations);
        assert!(during.peak_bytes >= 16 * 8);
        assert!(after.deallocations > before.deallocations);
    }
}
