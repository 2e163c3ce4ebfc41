//! Error types for product_sync

use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{Product, ProductId};

/// A local precondition failed; nothing was sent to the service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Required field is missing: {0}")]
    MissingField(&'static str),
    #[error("Quantity must not be negative (got {0})")]
    NegativeQuantity(i64),
    #[error("Price must not be negative (got {0})")]
    NegativePrice(f64),
    #[error("Unit must not be empty")]
    EmptyUnit,
    #[error("A product with this name already exists: {0}")]
    DuplicateName(String),
    #[error("Record id {record} does not match target id {target}")]
    IdMismatch { target: ProductId, record: ProductId },
}

/// Failure talking to the product service
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Service could not be reached (simulated transport failure)
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(StatusCode),
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The service refused a replace; carries the payload that was sent
    #[error("Update of product {} rejected: {status}", .payload.id)]
    UpdateRejected {
        status: StatusCode,
        payload: Box<Product>,
    },
}

impl GatewayError {
    /// True when the service was never reached
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Network(_) | GatewayError::Unavailable(_))
    }
}

/// Errors surfaced by the product store and the quantity policy
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Failed to load products: {0}")]
    LoadFailed(#[source] GatewayError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Unknown or already resolved confirmation token: {0}")]
    UnknownToken(u64),
}

impl StoreError {
    /// The validation rule that rejected the operation, if any
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result alias for gateway calls
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Result alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
