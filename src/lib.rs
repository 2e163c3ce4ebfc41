//! Product Sync - warehouse product client
//!
//! Keeps an in-memory product collection synchronized with a remote CRUD service
//! and derives search views (filtered list, autocomplete) from it.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod quantity;
pub mod query;
pub mod store;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult, StoreError, StoreResult, ValidationError};
pub use gateway::{HttpGateway, InMemoryGateway, ProductGateway};
pub use models::{Product, ProductDraft, ProductId};
pub use quantity::{Adjustment, AdjustmentOutcome, ConfirmationToken, QuantityPolicy, Resolution};
pub use query::{filter, suggestions, SearchView, SUGGESTION_LIMIT};
pub use store::{ProductStore, UpdateOutcome};
