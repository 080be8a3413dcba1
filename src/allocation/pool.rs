//! Number Pool
//!
//! Stateful, lock-protected wrapper around [`allocate`] that tracks every
//! number it has issued.

use super::allocator::allocate;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use tracing::{debug, warn};

// =============================================================================
// Pool State
// =============================================================================

/// State guarded by the pool lock
#[derive(Debug, Default)]
struct PoolState {
    /// Issued numbers, ascending and duplicate free
    used: Vec<u32>,
    /// Successful `get` calls
    allocations: u64,
    /// Successful `release` calls
    releases: u64,
}

impl PoolState {
    fn insert(&mut self, number: u32) -> bool {
        match self.used.binary_search(&number) {
            Ok(_) => false,
            Err(idx) => {
                self.used.insert(idx, number);
                true
            }
        }
    }

    fn remove(&mut self, number: u32) -> bool {
        match self.used.binary_search(&number) {
            Ok(idx) => {
                self.used.remove(idx);
                true
            }
            Err(_) => false,
        }
    }
}

/// Snapshot of pool statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub min: u32,
    pub max: u32,
    pub capacity: u64,
    pub issued: usize,
    pub allocations: u64,
    pub releases: u64,
}

// =============================================================================
// Number Pool
// =============================================================================

/// Range-bounded allocator that remembers issued numbers
///
/// Every public operation holds the pool lock for its whole duration, so
/// concurrent [`get`](NumberPool::get) calls never hand out the same number.
/// Distinct pools do not coordinate: two pools over overlapping ranges can
/// issue the same number independently.
#[derive(Debug)]
pub struct NumberPool {
    min: u32,
    max: u32,
    state: Mutex<PoolState>,
}

impl NumberPool {
    /// Create a pool over `[min, max]` seeded with numbers already in use
    ///
    /// Seeds outside the range are dropped and duplicates collapsed, so the
    /// pool only ever tracks numbers it could hand out. A seed above `max`
    /// would otherwise disable the next-after-highest path of [`allocate`]:
    /// `allocate(10, 20, &[19, 25])` yields 10, while a pool seeded with
    /// `[19, 25]` yields 20. The range itself is validated lazily by
    /// [`get`](NumberPool::get).
    pub fn new(min: u32, max: u32, used: impl IntoIterator<Item = u32>) -> Self {
        let mut seeds: Vec<u32> = used.into_iter().collect();
        let supplied = seeds.len();

        seeds.retain(|n| (min..=max).contains(n));
        let dropped = supplied - seeds.len();
        if dropped > 0 {
            warn!(
                "Dropped {} seed numbers outside of range [{}, {}]",
                dropped, min, max
            );
        }

        seeds.sort_unstable();
        seeds.dedup();

        Self {
            min,
            max,
            state: Mutex::new(PoolState {
                used: seeds,
                ..Default::default()
            }),
        }
    }

    /// Create an empty pool over `[min, max]`
    pub fn empty(min: u32, max: u32) -> Self {
        Self::new(min, max, std::iter::empty())
    }

    /// Get a free number and record it as used
    pub fn get(&self) -> Result<u32> {
        let mut state = self.state.lock();

        let number = match allocate(self.min, self.max, &state.used) {
            Ok(number) => number,
            Err(e) => {
                if let Error::Exhausted { .. } = e {
                    warn!("Number pool [{}, {}] exhausted", self.min, self.max);
                }
                return Err(e);
            }
        };

        state.insert(number);
        state.allocations += 1;

        debug!("Allocated {} from pool [{}, {}]", number, self.min, self.max);
        Ok(number)
    }

    /// Mark a specific number as used
    ///
    /// Returns `false` if the number was already taken.
    pub fn reserve(&self, number: u32) -> Result<bool> {
        if !(self.min..=self.max).contains(&number) {
            return Err(Error::OutOfRange {
                value: number,
                min: self.min,
                max: self.max,
            });
        }

        let inserted = self.state.lock().insert(number);
        if inserted {
            debug!("Reserved {} in pool [{}, {}]", number, self.min, self.max);
        }
        Ok(inserted)
    }

    /// Return a number to the pool
    ///
    /// Returns `false` if the number was not in use.
    pub fn release(&self, number: u32) -> bool {
        let mut state = self.state.lock();
        let removed = state.remove(number);
        if removed {
            state.releases += 1;
            debug!("Released {} to pool [{}, {}]", number, self.min, self.max);
        }
        removed
    }

    /// Lower bound (inclusive)
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Upper bound (inclusive)
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Number of values the pool can hand out
    ///
    /// Zero for ranges [`get`](NumberPool::get) rejects as invalid.
    pub fn capacity(&self) -> u64 {
        if self.max <= self.min {
            return 0;
        }
        u64::from(self.max - self.min) + 1
    }

    /// Number of issued values
    pub fn len(&self) -> usize {
        self.state.lock().used.len()
    }

    /// Check whether nothing has been issued
    pub fn is_empty(&self) -> bool {
        self.state.lock().used.is_empty()
    }

    /// Values still available
    pub fn remaining(&self) -> u64 {
        self.capacity().saturating_sub(self.len() as u64)
    }

    /// Check whether a number is in use
    pub fn contains(&self, number: u32) -> bool {
        self.state.lock().used.binary_search(&number).is_ok()
    }

    /// Issued numbers in ascending order
    pub fn used(&self) -> Vec<u32> {
        self.state.lock().used.clone()
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        PoolStats {
            min: self.min,
            max: self.max,
            capacity: self.capacity(),
            issued: state.used.len(),
            allocations: state.allocations,
            releases: state.releases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sequential_gets_until_exhausted() {
        let pool = NumberPool::empty(10, 15);

        let got: Vec<u32> = (0..6).map(|_| pool.get().unwrap()).collect();
        assert_eq!(got, vec![10, 11, 12, 13, 14, 15]);

        assert_matches!(pool.get(), Err(Error::Exhausted { min: 10, max: 15 }));
        assert_eq!(pool.remaining(), 0);
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn test_seeded_pool() {
        let pool = NumberPool::new(10, 20, vec![10, 11, 12, 20]);
        assert_eq!(pool.get().unwrap(), 13);
        assert_eq!(pool.get().unwrap(), 14);
        assert!(pool.contains(13));
        assert_eq!(pool.used(), vec![10, 11, 12, 13, 14, 20]);
    }

    #[test]
    fn test_seeds_outside_range_dropped() {
        let pool = NumberPool::new(10, 20, vec![1, 10, 10, 42]);
        assert_eq!(pool.used(), vec![10]);
        assert_eq!(pool.get().unwrap(), 11);
    }

    #[test]
    fn test_seed_above_max_does_not_force_hole_search() {
        // The raw allocator scans from min because 25 >= max
        assert_eq!(allocate(10, 20, &[19, 25]).unwrap(), 10);

        // The pool drops 25 and continues after the highest tracked number
        let pool = NumberPool::new(10, 20, vec![19, 25]);
        assert_eq!(pool.used(), vec![19]);
        assert_eq!(pool.get().unwrap(), 20);
        assert_eq!(pool.get().unwrap(), 10);
    }

    #[test]
    fn test_degenerate_range_has_no_capacity() {
        let pool = NumberPool::empty(10, 10);
        assert_eq!(pool.capacity(), 0);
        assert_eq!(pool.remaining(), 0);
        assert_matches!(pool.get(), Err(Error::InvalidRange { min: 10, max: 10 }));
    }

    #[test]
    fn test_invalid_range_records_nothing() {
        let pool = NumberPool::empty(15, 10);
        assert_matches!(pool.get(), Err(Error::InvalidRange { .. }));
        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn test_reserve_and_release() {
        let pool = NumberPool::empty(100, 110);

        assert!(pool.reserve(100).unwrap());
        assert!(!pool.reserve(100).unwrap());
        assert_matches!(
            pool.reserve(111),
            Err(Error::OutOfRange {
                value: 111,
                min: 100,
                max: 110
            })
        );

        assert_eq!(pool.get().unwrap(), 101);
        assert!(pool.release(100));
        assert!(!pool.release(100));

        // 101 is the highest used number, so the next one follows it
        assert_eq!(pool.get().unwrap(), 102);

        let stats = pool.stats();
        assert_eq!(stats.capacity, 11);
        assert_eq!(stats.issued, 2);
        assert_eq!(stats.allocations, 2);
        assert_eq!(stats.releases, 1);
    }

    #[test]
    fn test_released_hole_is_reused_when_top_is_taken() {
        let pool = NumberPool::empty(1, 3);
        for _ in 0..3 {
            pool.get().unwrap();
        }
        assert!(pool.release(2));
        assert_eq!(pool.get().unwrap(), 2);
        assert_matches!(pool.get(), Err(Error::Exhausted { .. }));
    }

    #[test]
    fn test_no_repeats_across_full_range() {
        let (min, max) = (7788u32, 7999u32);
        let pool = NumberPool::empty(min, max);
        let mut seen = HashSet::new();
        for expected in min..=max {
            let n = pool.get().unwrap();
            assert_eq!(n, expected);
            assert!(seen.insert(n));
        }
        assert_matches!(pool.get(), Err(Error::Exhausted { .. }));
    }

    #[test]
    fn test_concurrent_gets_are_distinct() {
        let pool = Arc::new(NumberPool::empty(1000, 1999));
        let threads = 8;
        let per_thread = 25;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    (0..per_thread)
                        .map(|_| pool.get().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for n in handle.join().unwrap() {
                assert!((1000..=1999).contains(&n));
                assert!(all.insert(n), "{} issued twice", n);
            }
        }
        assert_eq!(all.len(), threads * per_thread);
        assert_eq!(pool.len(), threads * per_thread);
    }
}
