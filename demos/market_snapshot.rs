use dashboard_core::constants::DEFAULT_SNAPSHOT_PAGE_SIZE;
use dashboard_core::{DataSlot, MarketDataClient};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let client = MarketDataClient::new()?;
    println!("Market snapshot via {}", client.provider_name());
    println!("-------------------------------------------");

    let mut snapshot = DataSlot::new();
    snapshot.record(client.fetch_market_snapshot(DEFAULT_SNAPSHOT_PAGE_SIZE).await);

    match (snapshot.data(), snapshot.error()) {
        (Some(data), _) => {
            for coin in &data.coins {
                println!(
                    "{:>6}  {:<16} ${:>12.2}  {:>+7.2}%",
                    coin.symbol.to_uppercase(),
                    coin.name,
                    coin.current_price.unwrap_or_default(),
                    coin.price_change_percentage_24h.unwrap_or_default()
                );
            }
        }
        (None, Some(err)) => {
            eprintln!("Error: {}", err.user_message());
            return Ok(());
        }
        (None, None) => unreachable!("a recorded fetch leaves data or an error"),
    }
    println!();

    // Second call inside the freshness window never touches the network
    let start = Instant::now();
    let history = client.fetch_price_history("bitcoin", 7).await;
    let network = start.elapsed();
    let start = Instant::now();
    let cached = client.fetch_price_history("bitcoin", 7).await;
    let from_cache = start.elapsed();

    match (history, cached) {
        (Ok(first), Ok(second)) => {
            println!(
                "BTC 7d: {} samples, latest ${:.2}",
                first.prices.len(),
                first.latest_price().unwrap_or_default()
            );
            println!("Same payload from cache: {}", std::sync::Arc::ptr_eq(&first, &second));
            println!("Network: {:?}, cache: {:?}", network, from_cache);
        }
        (Err(e), _) | (_, Err(e)) => eprintln!("Error: {}", e.user_message()),
    }

    let metrics = client.metrics().await;
    println!(
        "Requests: {}, failed: {}, cache hit rate: {:.0}%",
        metrics.total_requests,
        metrics.failed_requests,
        metrics.hit_rate() * 100.0
    );

    Ok(())
}
