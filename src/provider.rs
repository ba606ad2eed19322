//! Provider abstraction for fetching market data from external APIs

use crate::{cache::CacheKey, error::ProviderError};
use async_trait::async_trait;

/// A GET request against the market data API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    endpoint: String,
    params: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: Vec::new(),
        }
    }

    /// Appends a query parameter
    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Query string in insertion order, without the leading `?`
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Cache key from the endpoint and the sorted parameters
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.endpoint, &self.params)
    }
}

/// Trait for market data providers
///
/// Implementations perform a single GET and hand back the raw body. Caching,
/// parsing and error classification live in `MarketDataClient`.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Performs the request and returns the response body
    ///
    /// # Returns
    /// The body of a 2xx response, or the raw failure
    async fn get(&self, request: &ApiRequest) -> Result<String, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
