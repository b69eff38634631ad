//! Per-bid serialization locks for the decision protocol.
//!
//! The quorum algorithm is a read-count-decide-write sequence; two voters
//! interleaving on the same bid could each observe a stale tally. Every
//! `submit_decision` call therefore holds the bid's exclusive lock from
//! before the first read until after commit. Voting on distinct bids
//! proceeds in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use procura_core::types::DbId;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Registry handing out one async mutex per bid id.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across service clones. Entries are never reclaimed: one small
/// allocation per bid ever voted on.
pub struct BidLocks {
    locks: RwLock<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl BidLocks {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Acquire the exclusive lock for a bid, creating it on first use.
    ///
    /// The returned guard is owned, so it can be held across await points;
    /// dropping it releases the lock on every exit path.
    pub async fn acquire(&self, bid_id: DbId) -> OwnedMutexGuard<()> {
        let existing = self.locks.read().await.get(&bid_id).cloned();
        let lock = match existing {
            Some(lock) => lock,
            None => self
                .locks
                .write()
                .await
                .entry(bid_id)
                .or_default()
                .clone(),
        };
        lock.lock_owned().await
    }

    /// Number of bids a lock has been created for.
    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }

    /// Whether no lock has been created yet.
    pub async fn is_empty(&self) -> bool {
        self.locks.read().await.is_empty()
    }
}

impl Default for BidLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn same_bid_is_mutually_exclusive() {
        let locks = Arc::new(BidLocks::new());
        let in_section = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let in_section = Arc::clone(&in_section);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(7).await;
                let inside = in_section.fetch_add(1, Ordering::SeqCst);
                assert_eq!(inside, 0, "two tasks inside the same bid's section");
                tokio::task::yield_now().await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(locks.len().await, 1);
    }

    #[tokio::test]
    async fn distinct_bids_do_not_block_each_other() {
        let locks = BidLocks::new();
        let _first = locks.acquire(1).await;
        // Must not deadlock.
        let _second = locks.acquire(2).await;
        assert_eq!(locks.len().await, 2);
    }
}
