//! In-memory product service for dry runs and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use reqwest::StatusCode;

use super::ProductGateway;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{Product, ProductDraft, ProductId};

#[derive(Debug, Default)]
struct ServiceState {
    records: Vec<Product>,
    next_id: i64,
}

/// Simulated product service assigning integer ids starting at 1.
///
/// Failure switches let callers exercise the store's rollback paths without a
/// network.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    state: Mutex<ServiceState>,
    offline: AtomicBool,
    reject_updates: AtomicBool,
    requests: AtomicUsize,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service pre-populated with `records`; new ids continue after the highest numeric id.
    pub fn with_records(records: Vec<Product>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|p| match p.id {
                ProductId::Number(n) => Some(n),
                ProductId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        Self {
            state: Mutex::new(ServiceState { records, next_id }),
            ..Self::default()
        }
    }

    /// While offline every call fails as if the service were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// While set, every replace is answered with a 500.
    pub fn set_reject_updates(&self, reject: bool) {
        self.reject_updates.store(reject, Ordering::SeqCst);
    }

    /// Server-side records
    pub fn records(&self) -> Vec<Product> {
        self.state().records.clone()
    }

    /// Number of calls received, including failed ones
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn state(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn receive(&self, call: &str) -> GatewayResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        debug!("Simulated service received: {call}");
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable(format!(
                "simulated service offline ({call})"
            )));
        }
        Ok(())
    }
}

impl ProductGateway for InMemoryGateway {
    async fn list_all(&self) -> GatewayResult<Vec<Product>> {
        self.receive("list")?;
        Ok(self.records())
    }

    async fn create(&self, draft: &ProductDraft) -> GatewayResult<Product> {
        self.receive("create")?;
        let mut state = self.state();
        state.next_id += 1;
        let product = Product::from_draft(ProductId::Number(state.next_id), draft.clone());
        state.records.push(product.clone());
        Ok(product)
    }

    async fn replace(&self, id: &ProductId, record: &Product) -> GatewayResult<Product> {
        self.receive("replace")?;
        if self.reject_updates.load(Ordering::SeqCst) {
            return Err(GatewayError::UpdateRejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                payload: Box::new(record.clone()),
            });
        }
        let mut state = self.state();
        match state.records.iter_mut().find(|p| &p.id == id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(record.clone())
            }
            None => Err(GatewayError::UpdateRejected {
                status: StatusCode::NOT_FOUND,
                payload: Box::new(record.clone()),
            }),
        }
    }

    async fn delete(&self, id: &ProductId) -> GatewayResult<()> {
        self.receive("delete")?;
        let mut state = self.state();
        let before = state.records.len();
        state.records.retain(|p| &p.id != id);
        if state.records.len() == before {
            return Err(GatewayError::HttpStatus(StatusCode::NOT_FOUND));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let gateway = InMemoryGateway::new();
        let a = gateway.create(&ProductDraft::named("A")).await.unwrap();
        let b = gateway.create(&ProductDraft::named("B")).await.unwrap();

        assert_eq!(a.id, ProductId::Number(1));
        assert_eq!(b.id, ProductId::Number(2));
        assert_eq!(gateway.list_all().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn seeded_ids_continue_after_highest() {
        let seed = Product::from_draft(ProductId::Number(41), ProductDraft::named("Seed"));
        let gateway = InMemoryGateway::with_records(vec![seed]);
        let created = gateway.create(&ProductDraft::named("Next")).await.unwrap();
        assert_eq!(created.id, ProductId::Number(42));
    }

    #[tokio::test]
    async fn offline_fails_every_call_as_transport_error() {
        let gateway = InMemoryGateway::new();
        gateway.set_offline(true);

        let err = gateway.list_all().await.unwrap_err();
        assert!(err.is_transport());
        assert!(gateway.delete(&ProductId::Number(1)).await.is_err());
        assert_eq!(gateway.request_count(), 2);
    }

    #[tokio::test]
    async fn replace_of_unknown_id_is_rejected() {
        let gateway = InMemoryGateway::new();
        let ghost = Product::from_draft(ProductId::Number(9), ProductDraft::named("Ghost"));

        match gateway.replace(&ghost.id, &ghost).await {
            Err(GatewayError::UpdateRejected { status, payload }) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(*payload, ghost);
            }
            other => panic!("Expected UpdateRejected, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_http_error() {
        let gateway = InMemoryGateway::new();
        let err = gateway.delete(&ProductId::Number(3)).await.unwrap_err();
        assert!(matches!(err, GatewayError::HttpStatus(StatusCode::NOT_FOUND)));
    }
}
