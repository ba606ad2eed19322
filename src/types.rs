//! Types for the market data client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single `(timestamp, value)` sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    /// Sample time
    pub timestamp: DateTime<Utc>,
    /// Sample value in USD
    pub value: f64,
}

/// Sampling interval requested from the chart endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Hourly,
    Daily,
}

impl Interval {
    /// Hourly samples for a one-day window, daily otherwise
    pub fn for_days(days: u32) -> Self {
        if days == 1 {
            Interval::Hourly
        } else {
            Interval::Daily
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Hourly => "hourly",
            Interval::Daily => "daily",
        }
    }
}

/// Raw `market_chart` response: arrays of `[timestampMillis, value]`
#[derive(Debug, Deserialize)]
pub(crate) struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
    #[serde(default)]
    market_caps: Vec<(f64, f64)>,
    #[serde(default)]
    total_volumes: Vec<(f64, f64)>,
}

/// Historical price, market-cap and volume series for one coin
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteSeries {
    pub prices: Vec<PricePoint>,
    pub market_caps: Vec<PricePoint>,
    pub total_volumes: Vec<PricePoint>,
}

impl QuoteSeries {
    /// Most recent price sample, if any
    pub fn latest_price(&self) -> Option<f64> {
        self.prices.last().map(|p| p.value)
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl From<MarketChartResponse> for QuoteSeries {
    fn from(raw: MarketChartResponse) -> Self {
        Self {
            prices: to_points(raw.prices),
            market_caps: to_points(raw.market_caps),
            total_volumes: to_points(raw.total_volumes),
        }
    }
}

/// Samples with a timestamp outside chrono's range are dropped
fn to_points(pairs: Vec<(f64, f64)>) -> Vec<PricePoint> {
    pairs
        .into_iter()
        .filter_map(|(ts, value)| {
            DateTime::from_timestamp_millis(ts as i64).map(|timestamp| PricePoint { timestamp, value })
        })
        .collect()
}

/// A coin record from the markets endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Coins ordered by descending market cap
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedSnapshot {
    pub coins: Vec<CoinMarket>,
}

impl RankedSnapshot {
    /// Sorts by descending market cap; coins without one go last
    pub fn new(mut coins: Vec<CoinMarket>) -> Self {
        coins.sort_by(|a, b| match (a.market_cap, b.market_cap) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Self { coins }
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn get(&self, coin_id: &str) -> Option<&CoinMarket> {
        self.coins.iter().find(|c| c.id == coin_id)
    }
}

/// Catalog entry used to populate coin selection lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSummary {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, cap: Option<f64>) -> CoinMarket {
        CoinMarket {
            id: id.to_string(),
            symbol: id.to_string(),
            name: id.to_string(),
            image: None,
            current_price: Some(1.0),
            market_cap: cap,
            market_cap_rank: None,
            total_volume: None,
            price_change_percentage_24h: None,
        }
    }

    #[test]
    fn test_interval_for_days() {
        assert_eq!(Interval::for_days(1), Interval::Hourly);
        assert_eq!(Interval::for_days(7), Interval::Daily);
        assert_eq!(Interval::for_days(365).as_str(), "daily");
    }

    #[test]
    fn test_snapshot_orders_by_market_cap() {
        let snapshot = RankedSnapshot::new(vec![
            coin("a", Some(10.0)),
            coin("b", None),
            coin("c", Some(300.0)),
            coin("d", Some(20.0)),
        ]);
        let ids: Vec<_> = snapshot.coins.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
        assert!(snapshot.get("d").is_some());
    }

    #[test]
    fn test_market_chart_parsing() {
        let raw: MarketChartResponse = serde_json::from_str(
            r#"{"prices":[[1700000000000,37000.5],[1700003600000,37100.0]],
                "market_caps":[[1700000000000,7.2e11]],
                "total_volumes":[]}"#,
        )
        .unwrap();
        let series = QuoteSeries::from(raw);
        assert_eq!(series.prices.len(), 2);
        assert_eq!(series.market_caps.len(), 1);
        assert!(series.total_volumes.is_empty());
        assert_eq!(series.latest_price(), Some(37100.0));
        assert_eq!(series.prices[0].timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_coin_market_tolerates_nulls() {
        let coin: CoinMarket = serde_json::from_str(
            r#"{"id":"bitcoin","symbol":"btc","name":"Bitcoin","current_price":null,
                "market_cap":null,"total_volume":1.0,"price_change_percentage_24h":-2.5}"#,
        )
        .unwrap();
        assert_eq!(coin.current_price, None);
        assert_eq!(coin.price_change_percentage_24h, Some(-2.5));
    }
}
