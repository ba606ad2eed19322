//! Error types for the market data client

use thiserror::Error;

/// Raw failures reported by a market data provider
///
/// These describe what happened on the wire. Callers of the client never see
/// them directly; they are classified into [`FetchError`] first.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP client error that was not mapped to a more specific variant
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The client-side request timeout fired
    #[error("Request timeout")]
    Timeout,

    /// Connection could not be established (DNS, refused, TLS)
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request failed in transit without an HTTP status
    #[error("Failed to fetch: {0}")]
    Transport(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// How a rate-limit classification was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitEvidence {
    /// The server answered with HTTP 429
    Status,
    /// An error message mentioned 429 or "Too Many Requests"
    Message,
    /// A generic transport failure that may be throttling in disguise
    Heuristic,
}

/// Classified fetch failure, suitable for display
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Too many requests, or a failure that looks like it
    #[error("Rate limited ({evidence:?})")]
    RateLimited { evidence: RateLimitEvidence },

    /// Request aborted after the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Any HTTP 5xx
    #[error("Server error (HTTP {status})")]
    ServerError { status: u16 },

    /// HTTP 404
    #[error("Not found")]
    NotFound,

    /// HTTP 403
    #[error("Forbidden")]
    Forbidden,

    /// Transport failure that is not a rate limit
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Anything else, with the underlying message
    #[error("{0}")]
    UnknownError(String),
}

impl FetchError {
    /// Creates a RateLimited error
    pub fn rate_limited(evidence: RateLimitEvidence) -> Self {
        Self::RateLimited { evidence }
    }

    /// Classifies a non-success HTTP status
    pub fn from_status(status: u16, message: &str) -> Self {
        match status {
            429 => Self::rate_limited(RateLimitEvidence::Status),
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500..=599 => Self::ServerError { status },
            _ if mentions_rate_limit(message) => Self::rate_limited(RateLimitEvidence::Message),
            _ => Self::UnknownError(format!("HTTP {}: {}", status, message)),
        }
    }

    /// Returns false when the classification is only a guess
    ///
    /// Only the heuristic rate-limit path is unconfirmed; the remote API does
    /// not let a generic transport failure be told apart from throttling.
    pub fn is_confirmed(&self) -> bool {
        !matches!(
            self,
            Self::RateLimited {
                evidence: RateLimitEvidence::Heuristic
            }
        )
    }

    /// Human-readable message for the error banner
    pub fn user_message(&self) -> String {
        match self {
            Self::RateLimited {
                evidence: RateLimitEvidence::Heuristic,
            } => "Unable to connect to the server. This might be due to rate limiting. \
                  Please wait a few minutes before trying again."
                .to_string(),
            Self::RateLimited { .. } => "Rate limited: Too many requests. \
                                         Please wait a few minutes before trying again."
                .to_string(),
            Self::Timeout => {
                "Request timed out. Please check your connection and try again.".to_string()
            }
            Self::ServerError { .. } => {
                "Server error. The API service is temporarily unavailable.".to_string()
            }
            Self::NotFound => "The requested market data could not be found.".to_string(),
            Self::Forbidden => "Access to the market data service was denied.".to_string(),
            Self::NetworkError(_) => {
                "Unable to connect to the server. Please check your network and try again."
                    .to_string()
            }
            Self::UnknownError(message) => message.clone(),
        }
    }
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::RateLimitExceeded => Self::rate_limited(RateLimitEvidence::Status),
            ProviderError::HttpStatus { status, message } => Self::from_status(status, &message),
            ProviderError::Timeout => Self::Timeout,
            ProviderError::Connect(message) => Self::NetworkError(message),
            ProviderError::Transport(message) => {
                if mentions_rate_limit(&message) {
                    Self::rate_limited(RateLimitEvidence::Message)
                } else {
                    Self::rate_limited(RateLimitEvidence::Heuristic)
                }
            }
            ProviderError::Http(e) => classify_reqwest(&e),
            ProviderError::InvalidResponse(message) => {
                if mentions_rate_limit(&message) {
                    Self::rate_limited(RateLimitEvidence::Message)
                } else {
                    Self::UnknownError(message)
                }
            }
        }
    }
}

fn classify_reqwest(err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = err.status() {
        FetchError::from_status(status.as_u16(), &err.to_string())
    } else if err.is_connect() {
        FetchError::NetworkError(err.to_string())
    } else if mentions_rate_limit(&err.to_string()) {
        FetchError::rate_limited(RateLimitEvidence::Message)
    } else {
        FetchError::UnknownError(err.to_string())
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    message.contains("429") || message.contains("Too Many Requests")
}
