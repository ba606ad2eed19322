//! Constants for the dashboard core
//!
//! Defaults for the market data client and the pacing of the match engine.
//! The client reads these through `ClientConfig`, which can override a few
//! of them from the environment.

use std::time::Duration;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Endpoint for ranked market listings
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Quote currency for every request
pub const VS_CURRENCY: &str = "usd";

/// HTTP request timeout when fetching market data (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// How long a cached response stays fresh (in seconds)
pub const CACHE_TTL_SECS: u64 = 300;

/// Page size used to populate coin selection lists
pub const CATALOG_PAGE_SIZE: u32 = 100;

/// Default page size for the market overview table
pub const DEFAULT_SNAPSHOT_PAGE_SIZE: u32 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "dashboard-core/0.1.0";

/// Delay before a matching pair is locked in
pub const MATCH_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Delay before a mismatched pair is turned back over
pub const MISMATCH_HIDE_DELAY: Duration = Duration::from_millis(1000);
