//! Quantity adjustment policy
//!
//! Each quantity edit moves through `Idle → ProposedDelta` and ends in one of:
//! - `Committed`: the new quantity is non-negative and is sent as a full-record update
//! - `PendingConfirmation`: the new quantity would be negative; nothing is sent until
//!   the holder of the [`ConfirmationToken`] resolves it
//! - `Rejected`: confirmation was declined; the stored quantity stays as it was
//!
//! A confirmed pending deletion removes the product. Negative quantities never reach
//! the service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::gateway::ProductGateway;
use crate::models::{Product, ProductId};
use crate::store::{ProductStore, UpdateOutcome};

/// A quantity edit intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    Increment,
    Decrement,
    By(i64),
    Set(i64),
    /// Raw text typed into a quantity field
    Entered(String),
}

impl Adjustment {
    /// Quantity after applying this edit to `current`
    pub fn apply_to(&self, current: i64) -> i64 {
        match self {
            Adjustment::Increment => current.saturating_add(1),
            Adjustment::Decrement => current.saturating_sub(1),
            Adjustment::By(delta) => current.saturating_add(*delta),
            Adjustment::Set(value) => *value,
            Adjustment::Entered(text) => parse_quantity(text),
        }
    }
}

/// Reads a typed quantity: optional sign followed by leading digits.
///
/// Trailing garbage is ignored (`"12abc"` is 12); text without leading digits is 0.
pub fn parse_quantity(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let value = rest[..digits_len]
        .bytes()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    if negative {
        -value
    } else {
        value
    }
}

/// What an adjustment asks for, before anything is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    /// Non-negative: send an update with this quantity
    Commit(i64),
    /// Negative: ask before deleting the product
    ConfirmDeletion(i64),
}

/// Computes the proposed quantity for `adjustment` on `current`.
pub fn propose(current: &Product, adjustment: &Adjustment) -> Proposal {
    let proposed = adjustment.apply_to(current.quantity);
    if proposed < 0 {
        Proposal::ConfirmDeletion(proposed)
    } else {
        Proposal::Commit(proposed)
    }
}

/// Handle for a deletion waiting on user confirmation.
///
/// Single use. Only the newest token issued for a product resolves.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmationToken {
    id: u64,
    product_id: ProductId,
    proposed_quantity: Option<i64>,
}

impl ConfirmationToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// The negative quantity that triggered the request, if it came from an adjustment
    pub fn proposed_quantity(&self) -> Option<i64> {
        self.proposed_quantity
    }
}

#[derive(Debug)]
pub enum AdjustmentOutcome {
    /// An update was sent; see the outcome for whether it applied
    Committed(UpdateOutcome),
    /// Nothing was sent; resolve the token to delete or keep the product
    PendingConfirmation(ConfirmationToken),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Confirmed and acknowledged by the service; the removed record
    Deleted(Product),
    /// Declined; the product as it is still stored
    Declined(Product),
}

/// Applies quantity edits to products held by a [`ProductStore`].
pub struct QuantityPolicy<'a, G> {
    store: &'a ProductStore<G>,
    pending: Mutex<HashMap<u64, ProductId>>,
    next_token: AtomicU64,
}

impl<'a, G: ProductGateway> QuantityPolicy<'a, G> {
    pub fn new(store: &'a ProductStore<G>) -> Self {
        Self {
            store,
            pending: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(0),
        }
    }

    /// Applies `adjustment` to the stored quantity of `id`.
    ///
    /// The proposal is computed from the stored record while other mutations of
    /// the same product wait, so back-to-back increments compose.
    pub async fn adjust(
        &self,
        id: &ProductId,
        adjustment: Adjustment,
    ) -> StoreResult<AdjustmentOutcome> {
        let mut needs_confirmation = None;
        let outcome = self
            .store
            .update_with(id, |current| match propose(current, &adjustment) {
                Proposal::Commit(quantity) => {
                    debug!(
                        "Committing quantity {} -> {} for product {}",
                        current.quantity, quantity, id
                    );
                    Some(current.with_quantity(quantity))
                }
                Proposal::ConfirmDeletion(quantity) => {
                    needs_confirmation = Some(quantity);
                    None
                }
            })
            .await?;

        match outcome {
            Some(outcome) => Ok(AdjustmentOutcome::Committed(outcome)),
            None => {
                info!(
                    "Quantity of product {} would drop to {:?}, confirmation required",
                    id, needs_confirmation
                );
                Ok(AdjustmentOutcome::PendingConfirmation(
                    self.register(id, needs_confirmation),
                ))
            }
        }
    }

    /// Starts the two-phase deletion of `id`.
    pub async fn propose_deletion(&self, id: &ProductId) -> StoreResult<ConfirmationToken> {
        if self.store.get(id).await.is_none() {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(self.register(id, None))
    }

    /// Finishes a pending deletion.
    ///
    /// Confirming removes the product through the store and drops every other
    /// token for it; if the service call fails the product is kept and a new token
    /// is needed to try again. Declining sends nothing.
    pub async fn resolve(
        &self,
        token: ConfirmationToken,
        confirmed: bool,
    ) -> StoreResult<Resolution> {
        let product_id = self
            .pending()
            .remove(&token.id)
            .ok_or(StoreError::UnknownToken(token.id))?;

        if confirmed {
            info!("Deletion of product {product_id} confirmed");
            let removed = self.store.remove(&product_id).await?;
            self.pending().retain(|_, pending_id| pending_id != &product_id);
            Ok(Resolution::Deleted(removed))
        } else {
            info!("Deletion of product {product_id} declined");
            let current = self
                .store
                .get(&product_id)
                .await
                .ok_or(StoreError::NotFound(product_id))?;
            Ok(Resolution::Declined(current))
        }
    }

    /// Number of unresolved confirmation tokens
    pub fn pending_count(&self) -> usize {
        self.pending().len()
    }

    /// Issues a token for `id`. An older unresolved token for the same product is
    /// superseded and no longer resolves.
    fn register(&self, id: &ProductId, proposed_quantity: Option<i64>) -> ConfirmationToken {
        let token_id = self.next_token.fetch_add(1, Ordering::SeqCst) + 1;
        let mut pending = self.pending();
        pending.retain(|_, pending_id| pending_id != id);
        pending.insert(token_id, id.clone());
        drop(pending);
        ConfirmationToken {
            id: token_id,
            product_id: id.clone(),
            proposed_quantity,
        }
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<u64, ProductId>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "quantity_tests.rs"]
mod tests;
