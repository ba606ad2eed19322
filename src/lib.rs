//! # Dashboard Core
//!
//! The stateful pieces behind two small web front ends:
//!
//! - **Match engine** (`game`): deals memory-game decks, tracks flips,
//!   matches and mismatches, scores the round and detects completion.
//! - **Market data client** (`client`): fetches price history and ranked
//!   market snapshots from CoinGecko behind a time-bounded response cache,
//!   and classifies failures into a small display taxonomy.
//!
//! The two halves do not depend on each other.
//!
//! ## Market data
//!
//! ```no_run
//! use dashboard_core::{DataSlot, FetchError, MarketDataClient};
//!
//! # async fn example() -> Result<(), FetchError> {
//! let client = MarketDataClient::new()?;
//! let mut panel = DataSlot::new();
//!
//! panel.record(client.fetch_market_snapshot(10).await);
//! if let Some(err) = panel.error() {
//!     eprintln!("{} (retry available)", err.user_message());
//! }
//! for coin in panel.data().map(|s| s.coins.as_slice()).unwrap_or_default() {
//!     println!("{}: {:?}", coin.symbol, coin.current_price);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Memory game
//!
//! ```no_run
//! use dashboard_core::game::{Difficulty, MatchSession, Theme};
//!
//! # async fn example() {
//! let session = MatchSession::new();
//! let board = session.start(Theme::Ocean, Difficulty::Easy).await;
//! println!("{} cards dealt", board.cards.len());
//! session.select(0).await;
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! MarketDataClient
//!     ↓ cache hit?  → ResponseCache (per client, 5 minute window)
//!     ↓ miss
//! MarketDataProvider (CoinGecko, 10s timeout)
//!     ↓
//! FetchError classification / parsed payload
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod metrics;
pub mod provider;
pub mod providers;
pub mod slot;
pub mod types;

// Re-export commonly used types
pub use client::MarketDataClient;
pub use config::ClientConfig;
pub use error::{FetchError, ProviderError, RateLimitEvidence};
pub use metrics::ClientMetrics;
pub use slot::DataSlot;
pub use types::{CoinMarket, CoinSummary, PricePoint, QuoteSeries, RankedSnapshot};
