//! Remote product gateway
//!
//! Thin contract to the product CRUD service. Implementations translate transport
//! and HTTP failures into [`GatewayError`](crate::error::GatewayError) and never
//! touch local state.

mod http;
mod memory;

use std::future::Future;

use crate::error::GatewayResult;
use crate::models::{Product, ProductDraft, ProductId};

pub use http::HttpGateway;
pub use memory::InMemoryGateway;

/// CRUD operations against the product service.
pub trait ProductGateway: Send + Sync {
    /// Fetch every product, in service order.
    fn list_all(&self) -> impl Future<Output = GatewayResult<Vec<Product>>> + Send;

    /// Create a product; the service assigns the id.
    fn create(&self, draft: &ProductDraft) -> impl Future<Output = GatewayResult<Product>> + Send;

    /// Replace the full record stored under `id`.
    ///
    /// A non-success answer is reported as `UpdateRejected` carrying `record`.
    fn replace(
        &self,
        id: &ProductId,
        record: &Product,
    ) -> impl Future<Output = GatewayResult<Product>> + Send;

    /// Delete the product stored under `id`.
    fn delete(&self, id: &ProductId) -> impl Future<Output = GatewayResult<()>> + Send;
}
