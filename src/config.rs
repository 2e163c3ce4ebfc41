//! Gateway configuration

/// Environment variable overriding the product service base URL
pub const API_URL_ENV: &str = "PRODUCT_API_URL";

/// Base URL used when the environment does not provide one
pub const DEFAULT_API_URL: &str = "https://localhost:7165/api/Products";

const USER_AGENT: &str = "D2D-Automations-ProductSync/1.0";

/// Where and how the HTTP gateway talks to the product service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Reads the base URL from `PRODUCT_API_URL`, falling back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                log::debug!("Using product service URL from {}: {}", API_URL_ENV, url);
                Self::new(url.trim())
            }
            None => Self::default(),
        }
    }

    /// URL of a single product resource
    pub fn item_url(&self, segment: &str) -> String {
        format!("{}/{}", self.base_url, segment)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
