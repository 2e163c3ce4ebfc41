//! Product store
//!
//! Owns the in-memory product collection and is its only writer. Every mutation
//! goes through the gateway first; the collection changes only after the service
//! acknowledged it. Readers get snapshots.
//!
//! Error policy:
//! - validation failures never reach the network and leave state untouched
//! - `add` and `remove` fail closed: gateway errors are returned, state is unchanged
//! - `update` fails soft: the call resolves with [`UpdateOutcome::RolledBack`]
//!   holding the untouched original record

mod locks;
mod validation;

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};
use tokio::sync::{Mutex as AsyncMutex, RwLock};

use crate::error::{GatewayError, StoreError, StoreResult, ValidationError};
use crate::gateway::ProductGateway;
use crate::models::{names_match, Product, ProductDraft, ProductId};
use crate::query::{self, SearchView, SUGGESTION_LIMIT};

use locks::IdLocks;
use validation::{duplicate_names, ensure_unique_name, validate_draft};

/// Result of an update attempt.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The service accepted the record; the store now holds its answer.
    Applied(Product),
    /// The service call failed; the store still holds `original`.
    RolledBack {
        original: Product,
        reason: GatewayError,
    },
}

impl UpdateOutcome {
    /// The record the store holds after the attempt
    pub fn product(&self) -> &Product {
        match self {
            UpdateOutcome::Applied(product) => product,
            UpdateOutcome::RolledBack { original, .. } => original,
        }
    }

    pub fn into_product(self) -> Product {
        match self {
            UpdateOutcome::Applied(product) => product,
            UpdateOutcome::RolledBack { original, .. } => original,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Applied(_))
    }
}

/// In-memory product collection kept in sync with a [`ProductGateway`].
pub struct ProductStore<G> {
    gateway: G,
    products: RwLock<Vec<Product>>,
    draft: Mutex<ProductDraft>,
    id_locks: IdLocks,
    // Held while a name is checked for uniqueness and until the result is stored,
    // and while a load swaps the collection
    name_lock: AsyncMutex<()>,
}

impl<G: ProductGateway> ProductStore<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            products: RwLock::new(Vec::new()),
            draft: Mutex::new(ProductDraft::default()),
            id_locks: IdLocks::default(),
            name_lock: AsyncMutex::new(()),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Replaces the collection with the service's list.
    ///
    /// On failure the previous collection is kept. Waits for in-flight adds and
    /// renames so their results are not stored twice.
    pub async fn load(&self) -> StoreResult<usize> {
        info!("Loading products");
        let _names = self.name_lock.lock().await;
        let products = match self.gateway.list_all().await {
            Ok(products) => products,
            Err(e) => {
                error!("Failed to load products, keeping current collection: {e}");
                return Err(StoreError::LoadFailed(e));
            }
        };

        let duplicates = duplicate_names(&products);
        if !duplicates.is_empty() {
            warn!("Service returned duplicate product names: {duplicates:?}");
        }

        let count = products.len();
        self.id_locks.retain(|id| products.iter().any(|p| &p.id == id));
        *self.products.write().await = products;
        info!("Loaded {count} products");
        Ok(count)
    }

    /// Copy of the current collection
    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    /// Filtered list and suggestions for `term`, computed from one snapshot.
    pub async fn view(&self, term: &str) -> SearchView {
        let products = self.products.read().await;
        SearchView {
            products: query::filter(term, &products).into_iter().cloned().collect(),
            suggestions: query::suggestions(term, &products, SUGGESTION_LIMIT),
        }
    }

    /// Validates `draft`, creates it on the service and appends the result.
    ///
    /// On success the input scaffold is reset to its defaults.
    pub async fn add(&self, draft: ProductDraft) -> StoreResult<Product> {
        debug!("Adding product '{}'", draft.name);
        validate_draft(&draft).inspect_err(|e| warn!("Rejected new product: {e}"))?;

        let _names = self.name_lock.lock().await;
        ensure_unique_name(&draft.name, &self.products.read().await, None)
            .inspect_err(|e| warn!("Rejected new product: {e}"))?;

        let created = self.gateway.create(&draft).await.map_err(|e| {
            error!("Failed to create product '{}': {e}", draft.name);
            StoreError::Gateway(e)
        })?;

        {
            let mut products = self.products.write().await;
            match products.iter_mut().find(|p| p.id == created.id) {
                Some(slot) => *slot = created.clone(),
                None => products.push(created.clone()),
            }
        }
        self.reset_draft();
        info!("Added product: {} (ID: {})", created.name, created.id);
        Ok(created)
    }

    /// Current contents of the input scaffold
    pub fn draft(&self) -> ProductDraft {
        self.draft_slot().clone()
    }

    pub fn edit_draft(&self, edit: impl FnOnce(&mut ProductDraft)) {
        edit(&mut self.draft_slot());
    }

    pub fn reset_draft(&self) {
        *self.draft_slot() = ProductDraft::default();
    }

    /// Adds the scaffold's contents; the scaffold is reset only when the add succeeds.
    pub async fn submit_draft(&self) -> StoreResult<Product> {
        self.add(self.draft()).await
    }

    fn draft_slot(&self) -> MutexGuard<'_, ProductDraft> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sends `record` as the full replacement for `id`.
    ///
    /// Local precondition failures are returned as errors. A failed service call
    /// is not: it resolves with [`UpdateOutcome::RolledBack`].
    pub async fn update(&self, id: &ProductId, record: Product) -> StoreResult<UpdateOutcome> {
        let _guard = self.id_locks.acquire(id).await;
        let original = self.require(id).await?;
        self.replace_locked(original, record).await
    }

    /// Like [`update`](Self::update), but builds the record from the stored one
    /// while mutations of `id` are held off. `build` returning `None` sends nothing.
    pub async fn update_with<F>(
        &self,
        id: &ProductId,
        build: F,
    ) -> StoreResult<Option<UpdateOutcome>>
    where
        F: FnOnce(&Product) -> Option<Product> + Send,
    {
        let _guard = self.id_locks.acquire(id).await;
        let original = self.require(id).await?;
        let Some(record) = build(&original) else {
            debug!("Nothing to send for product {id}");
            return Ok(None);
        };
        self.replace_locked(original, record).await.map(Some)
    }

    /// Deletes `id` on the service, then drops it locally. Returns the removed record.
    pub async fn remove(&self, id: &ProductId) -> StoreResult<Product> {
        let _guard = self.id_locks.acquire(id).await;
        let existing = self.require(id).await?;

        self.gateway.delete(id).await.map_err(|e| {
            error!("Failed to delete product {id}, keeping it: {e}");
            StoreError::Gateway(e)
        })?;

        self.products.write().await.retain(|p| &p.id != id);
        self.id_locks.forget(id);
        info!("Removed product: {} (ID: {})", existing.name, id);
        Ok(existing)
    }

    async fn require(&self, id: &ProductId) -> StoreResult<Product> {
        self.get(id)
            .await
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Caller holds the id lock for `original.id`.
    async fn replace_locked(
        &self,
        original: Product,
        record: Product,
    ) -> StoreResult<UpdateOutcome> {
        let id = &original.id;
        if &record.id != id {
            return Err(ValidationError::IdMismatch {
                target: id.clone(),
                record: record.id.clone(),
            }
            .into());
        }
        validate_draft(&record.to_draft())?;

        let _names = if names_match(&original.name, &record.name) {
            None
        } else {
            let guard = self.name_lock.lock().await;
            ensure_unique_name(&record.name, &self.products.read().await, Some(id))?;
            Some(guard)
        };

        match self.gateway.replace(id, &record).await {
            Ok(updated) => {
                let mut products = self.products.write().await;
                match products.iter_mut().find(|p| &p.id == id) {
                    Some(slot) => *slot = updated.clone(),
                    None => warn!("Product {id} disappeared during update, not re-adding it"),
                }
                info!("Updated product: {} (ID: {})", updated.name, id);
                Ok(UpdateOutcome::Applied(updated))
            }
            Err(reason) => {
                warn!("Update of product {id} failed, keeping previous record: {reason}");
                Ok(UpdateOutcome::RolledBack { original, reason })
            }
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
