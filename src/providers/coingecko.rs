//! CoinGecko market data provider implementation

use crate::{
    config::ClientConfig,
    error::ProviderError,
    provider::{ApiRequest, MarketDataProvider},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// CoinGecko REST provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider with default settings
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a provider using the base URL, timeout and user agent from `config`
    pub fn with_config(config: &ClientConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Builds the full request URL
    fn build_url(&self, request: &ApiRequest) -> String {
        let query = request.query_string();
        if query.is_empty() {
            format!("{}{}", self.base_url, request.endpoint())
        } else {
            format!("{}{}?{}", self.base_url, request.endpoint(), query)
        }
    }
}

/// Maps a reqwest failure that carries no HTTP status
fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_connect() {
        ProviderError::Connect(err.to_string())
    } else if err.is_request() || err.is_body() {
        ProviderError::Transport(err.to_string())
    } else {
        ProviderError::Http(err)
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn get(&self, request: &ApiRequest) -> Result<String, ProviderError> {
        let url = self.build_url(request);
        tracing::debug!(url = %url, "Fetching from CoinGecko");

        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Response status");

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response.text().await.map_err(transport_error)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let provider = CoinGeckoProvider::new().unwrap();
        let request = ApiRequest::new("/coins/bitcoin/market_chart")
            .param("vs_currency", "usd")
            .param("days", 7)
            .param("interval", "daily");
        assert_eq!(
            provider.build_url(&request),
            "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=7&interval=daily"
        );
    }

    #[test]
    fn test_build_url_custom_base() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9000");
        let provider = CoinGeckoProvider::with_config(&config).unwrap();
        assert_eq!(
            provider.build_url(&ApiRequest::new("/ping")),
            "http://127.0.0.1:9000/ping"
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        use crate::error::FetchError;

        // Port 9 (discard) on loopback is closed on CI hosts
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
        let provider = CoinGeckoProvider::with_config(&config).unwrap();
        let err = provider.get(&ApiRequest::new("/ping")).await.unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::NetworkError(_)));
    }
}
