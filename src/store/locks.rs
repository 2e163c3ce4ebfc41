//! Per-product mutation locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::models::ProductId;

/// Lazily creates one async mutex per product id and hands out the same `Arc`
/// for repeated lookups. Waiters are served in arrival order.
#[derive(Debug, Default)]
pub(crate) struct IdLocks {
    locks: Mutex<HashMap<ProductId, Arc<AsyncMutex<()>>>>,
}

impl IdLocks {
    pub(crate) fn get(&self, id: &ProductId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Waits until no other mutation of `id` is in flight.
    pub(crate) async fn acquire(&self, id: &ProductId) -> OwnedMutexGuard<()> {
        self.get(id).lock_owned().await
    }

    /// Drops the lock entry of a product that no longer exists.
    pub(crate) fn forget(&self, id: &ProductId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.remove(id);
    }

    /// Keeps only the entries whose id satisfies `keep`.
    pub(crate) fn retain(&self, mut keep: impl FnMut(&ProductId) -> bool) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|id, _| keep(id));
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
