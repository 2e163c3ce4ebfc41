//! JSON-over-HTTP gateway built on reqwest.

use log::{debug, error, info};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};

use super::ProductGateway;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{Product, ProductDraft, ProductId};

/// Product service client.
pub struct HttpGateway {
    pub(crate) client: Client,
    pub(crate) config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        info!("Creating product gateway for {}", config.base_url);
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Gateway configured from `PRODUCT_API_URL`
    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.config.user_agent)
    }

    /// Turns a non-success response into `HttpStatus`, logging its body.
    async fn ensure_success(response: Response, action: &str) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_text = response.text().await.unwrap_or_default();
        error!("{action} failed with status {status}: {error_text}");
        Err(GatewayError::HttpStatus(status))
    }
}

impl ProductGateway for HttpGateway {
    async fn list_all(&self) -> GatewayResult<Vec<Product>> {
        let url = &self.config.base_url;
        debug!("Fetching products from: {url}");

        let response = self.with_headers(self.client.get(url)).send().await?;
        debug!("List products response status: {}", response.status());
        let response = Self::ensure_success(response, "Listing products").await?;

        let response_text = response.text().await?;
        let products: Vec<Product> = serde_json::from_str(&response_text)?;

        info!("Fetched {} products", products.len());
        Ok(products)
    }

    async fn create(&self, draft: &ProductDraft) -> GatewayResult<Product> {
        let url = &self.config.base_url;
        debug!("Creating product '{}' at: {url}", draft.name);

        let response = self
            .with_headers(self.client.post(url))
            .header(CONTENT_TYPE, "application/json")
            .json(draft)
            .send()
            .await?;
        debug!("Create product response status: {}", response.status());
        let response = Self::ensure_success(response, "Creating product").await?;

        let response_text = response.text().await?;
        debug!("Create product response body: {response_text}");
        let created: Product = serde_json::from_str(&response_text)?;

        info!("Created product: {} (ID: {})", created.name, created.id);
        Ok(created)
    }

    async fn replace(&self, id: &ProductId, record: &Product) -> GatewayResult<Product> {
        let url = self.config.item_url(&id.path_segment());
        debug!("Replacing product {id} at: {url}");

        let response = self
            .with_headers(self.client.put(&url))
            .header(CONTENT_TYPE, "application/json")
            .json(record)
            .send()
            .await?;

        let status = response.status();
        debug!("Replace product response status: {status}");
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Update of product {id} rejected with status {status}: {error_text}");
            return Err(GatewayError::UpdateRejected {
                status,
                payload: Box::new(record.clone()),
            });
        }

        // An empty body means the service accepted the record as sent
        let response_text = response.text().await?;
        if response_text.trim().is_empty() {
            debug!("Empty replace response for product {id}, echoing payload");
            return Ok(record.clone());
        }
        Ok(serde_json::from_str(&response_text)?)
    }

    async fn delete(&self, id: &ProductId) -> GatewayResult<()> {
        let url = self.config.item_url(&id.path_segment());
        debug!("Deleting product {id} at: {url}");

        let response = self.with_headers(self.client.delete(&url)).send().await?;
        debug!("Delete product response status: {}", response.status());
        Self::ensure_success(response, "Deleting product").await?;

        info!("Deleted product {id}");
        Ok(())
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
