//! Per-collection-key mutual exclusion
//!
//! Scratch paths derive from the collection key, so two in-flight uploads
//! with the same key would race on the same files. [`KeyLocks`] serializes
//! them: a request holds the key's lock across its whole pipeline run while
//! requests with other keys proceed untouched. Map entries are dropped once
//! the last holder releases.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;
type LockMap = Arc<Mutex<HashMap<String, Slot>>>;

/// Map of in-flight keys to their locks. Clones share the same map.
#[derive(Clone, Default)]
pub struct KeyLocks {
    map: LockMap,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting behind any holder of the same key.
    pub async fn acquire(&self, key: &str) -> KeyGuard {
        let slot = {
            let mut map = lock_map(&self.map);
            map.entry(key.to_string()).or_default().clone()
        };
        let guard = slot.clone().lock_owned().await;

        KeyGuard {
            key: key.to_string(),
            map: self.map.clone(),
            slot,
            guard: Some(guard),
        }
    }

    /// Number of keys currently tracked, for diagnostics.
    pub fn entry_count(&self) -> usize {
        lock_map(&self.map).len()
    }
}

/// Held for the duration of one ingestion request.
pub struct KeyGuard {
    key: String,
    map: LockMap,
    slot: Slot,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Release the key lock before inspecting the map.
        self.guard.take();

        let mut map = lock_map(&self.map);
        if let Some(entry) = map.get(&self.key) {
            // Two owners left means map entry + our `slot` field: no other
            // request holds or awaits this key, so the entry can go.
            if Arc::strong_count(entry) == 2 && Arc::ptr_eq(entry, &self.slot) {
                map.remove(&self.key);
            }
        }
    }
}

fn lock_map(map: &LockMap) -> MutexGuard<'_, HashMap<String, Slot>> {
    match map.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_serializes() {
        let locks = KeyLocks::new();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let locks = locks.clone();
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("111_222").await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_concurrent() {
        let locks = KeyLocks::new();

        let _a = locks.acquire("111").await;
        // A different key must not block.
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("222")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_entries_removed_after_release() {
        let locks = KeyLocks::new();

        {
            let _guard = locks.acquire("111").await;
            assert_eq!(locks.entry_count(), 1);
        }
        assert_eq!(locks.entry_count(), 0);
    }
}
