//! Rank slots shared by all workers.
//!
//! The budget starts at N and is decremented once per completed temp download. The
//! decrement, the check of its result and the promotion of the file happen under one lock,
//! so each post-decrement value is seen by exactly one worker and promotions never overlap.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Position of a final file, 1-based.
pub type Rank = u32;

#[derive(Debug)]
pub struct SlotAllocator {
    total: i64,
    budget: AtomicI64,
    claims: AtomicU64,
    lock: Mutex<()>,
}

impl SlotAllocator {
    pub fn new(total: u32) -> Self {
        Self {
            total: i64::from(total),
            budget: AtomicI64::new(i64::from(total)),
            claims: AtomicU64::new(0),
            lock: Mutex::new(()),
        }
    }

    /// Number of slots this allocator started with.
    pub fn total(&self) -> u32 {
        self.total as u32
    }

    /// Current budget. Negative once workers have over-claimed. Does not block.
    pub fn remaining(&self) -> i64 {
        self.budget.load(Ordering::Acquire)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() <= 0
    }

    /// Number of budget decrements so far (one per [`claim`](Self::claim) call).
    pub fn claims(&self) -> u64 {
        self.claims.load(Ordering::Acquire)
    }

    /// Decrements the budget and, if a slot is left, runs `promote` with its rank while still
    /// holding the lock. Returns `None` when the budget was already used up.
    ///
    /// Ranks are handed out 1, 2, 3... in the order claims complete.
    pub fn claim<T, F>(&self, promote: F) -> Option<(Rank, T)>
    where
        F: FnOnce(Rank) -> T,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.claims.fetch_add(1, Ordering::AcqRel);
        let left = self.budget.fetch_sub(1, Ordering::AcqRel) - 1;
        if left < 0 {
            return None;
        }
        let rank = (self.total - left) as Rank;
        Some((rank, promote(rank)))
    }
}
