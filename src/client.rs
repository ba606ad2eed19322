//! Market data client
//!
//! Cache-then-fetch access to price history, ranked market snapshots and the
//! coin catalog.

use crate::{
    cache::{CacheKey, Payload, ResponseCache},
    config::ClientConfig,
    constants::{CATALOG_PAGE_SIZE, COINGECKO_MARKETS_ENDPOINT, VS_CURRENCY},
    error::{FetchError, ProviderError},
    metrics::{ClientMetrics, MetricsCollector},
    provider::{ApiRequest, MarketDataProvider},
    providers::CoinGeckoProvider,
    types::{CoinMarket, CoinSummary, Interval, MarketChartResponse, QuoteSeries, RankedSnapshot},
};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

/// Market data client
///
/// Every fetch first consults the client's response cache. A fresh entry is
/// returned as the same `Arc` that was stored, without touching the network.
/// Failures are classified into [`FetchError`] and never retried here;
/// calling the same method again is the retry.
///
/// # Example
/// ```no_run
/// use dashboard_core::MarketDataClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MarketDataClient::new()?;
/// let history = client.fetch_price_history("bitcoin", 7).await?;
/// println!("BTC: {:?}", history.latest_price());
/// # Ok(())
/// # }
/// ```
pub struct MarketDataClient {
    provider: Arc<dyn MarketDataProvider>,
    cache: ResponseCache,
    metrics: MetricsCollector,
    config: ClientConfig,
}

impl MarketDataClient {
    /// Creates a CoinGecko-backed client configured from the environment
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Creates a CoinGecko-backed client with explicit settings
    pub fn with_config(config: ClientConfig) -> Result<Self, FetchError> {
        let provider = CoinGeckoProvider::with_config(&config)?;
        Ok(Self::with_provider(Arc::new(provider), config))
    }

    /// Creates a client with a custom provider
    ///
    /// This is primarily for testing with mock providers.
    pub fn with_provider(provider: Arc<dyn MarketDataProvider>, config: ClientConfig) -> Self {
        let cache = ResponseCache::new(config.cache_ttl);
        let metrics = MetricsCollector::new(provider.provider_name());

        Self {
            provider,
            cache,
            metrics,
            config,
        }
    }

    /// Fetches price, market-cap and volume history for a coin
    ///
    /// A one-day window is sampled hourly, anything longer daily.
    ///
    /// # Arguments
    /// * `coin_id` - CoinGecko coin id, e.g. `"bitcoin"`
    /// * `days` - Length of the window in days
    pub async fn fetch_price_history(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<Arc<QuoteSeries>, FetchError> {
        if coin_id.is_empty() {
            return Err(FetchError::UnknownError("Coin id must not be empty".to_string()));
        }

        let request = ApiRequest::new(format!("/coins/{}/market_chart", coin_id))
            .param("vs_currency", VS_CURRENCY)
            .param("days", days)
            .param("interval", Interval::for_days(days).as_str());

        self.fetch_cached(request, |body| {
            let raw: MarketChartResponse = parse_json(body)?;
            let series = QuoteSeries::from(raw);
            tracing::debug!(coin_id, points = series.prices.len(), "Fetched price history");
            Ok(series)
        })
        .await
    }

    /// Fetches the top `page_size` coins by market cap
    pub async fn fetch_market_snapshot(
        &self,
        page_size: u32,
    ) -> Result<Arc<RankedSnapshot>, FetchError> {
        let request = markets_request(page_size).param("price_change_percentage", "24h");

        self.fetch_cached(request, |body| {
            let coins: Vec<CoinMarket> = parse_json(body)?;
            tracing::debug!(count = coins.len(), "Fetched market data");
            Ok(RankedSnapshot::new(coins))
        })
        .await
    }

    /// Fetches the coin list used to populate selection controls
    pub async fn fetch_coins_catalog(&self) -> Result<Arc<Vec<CoinSummary>>, FetchError> {
        let request = markets_request(CATALOG_PAGE_SIZE);

        self.fetch_cached(request, |body| {
            let coins: Vec<CoinSummary> = parse_json(body)?;
            tracing::debug!(count = coins.len(), "Fetched coins list");
            Ok(coins)
        })
        .await
    }

    /// Drops every cached response
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Keys of the responses that are currently fresh
    pub async fn cached_entries(&self) -> Vec<CacheKey> {
        self.cache.fresh_keys().await
    }

    /// Request and cache metrics
    pub async fn metrics(&self) -> ClientMetrics {
        self.metrics.get_metrics().await
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Looks up the cache, falling back to the provider on a miss
    ///
    /// Only successful, parsed responses are stored.
    async fn fetch_cached<T, F>(&self, request: ApiRequest, parse: F) -> Result<Arc<T>, FetchError>
    where
        T: Any + Send + Sync,
        F: FnOnce(&str) -> Result<T, ProviderError>,
    {
        let key = request.cache_key();

        if let Some(hit) = self.cache.get_as::<T>(&key).await {
            self.metrics.record_cache_hit().await;
            return Ok(hit);
        }
        self.metrics.record_cache_miss().await;

        let start = Instant::now();
        let result = self.send(&request).await.and_then(|body| parse(&body));

        match result {
            Ok(value) => {
                self.metrics.record_request(start.elapsed(), true).await;
                let value = Arc::new(value);
                let payload: Payload = value.clone();
                self.cache.insert(key, payload).await;
                Ok(value)
            }
            Err(e) => {
                self.metrics.record_request(start.elapsed(), false).await;
                let classified = FetchError::from(e);
                tracing::warn!(
                    key = %key,
                    provider = self.provider.provider_name(),
                    error = %classified,
                    confirmed = classified.is_confirmed(),
                    "Failed to fetch market data"
                );
                Err(classified)
            }
        }
    }

    /// Issues the request under the client-side timeout
    async fn send(&self, request: &ApiRequest) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.config.request_timeout, self.provider.get(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    endpoint = request.endpoint(),
                    timeout_secs = self.config.request_timeout.as_secs(),
                    "Request timed out"
                );
                Err(ProviderError::Timeout)
            }
        }
    }
}

fn markets_request(page_size: u32) -> ApiRequest {
    ApiRequest::new(COINGECKO_MARKETS_ENDPOINT)
        .param("vs_currency", VS_CURRENCY)
        .param("order", "market_cap_desc")
        .param("per_page", page_size)
        .param("page", 1)
        .param("sparkline", false)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
    })
}
