// Market data: provider trait, CoinMarketCap client and history pairing

pub mod coinmarketcap;
pub mod traits;

pub use coinmarketcap::CoinMarketCapClient;
pub use traits::MarketDataSource;

use crate::analyzer::Timeframe;
use crate::model::{AssetInput, CryptoSnapshot};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

/// Upper bound on history requests in flight at once.
pub const MAX_CONCURRENT_HISTORY_REQUESTS: usize = 8;

/// Pairs every snapshot with its history, fetched concurrently with at most
/// [`MAX_CONCURRENT_HISTORY_REQUESTS`] requests in flight. Output keeps the input order.
///
/// A failed history request leaves that asset without history; the rest of the batch
/// is unaffected.
pub async fn fetch_histories(
    source: &dyn MarketDataSource,
    snapshots: Vec<CryptoSnapshot>,
    timeframe: Timeframe,
) -> Vec<AssetInput> {
    let assets: Vec<AssetInput> = stream::iter(snapshots)
        .map(|snapshot| async move {
            let history = match source.fetch_history(&snapshot.symbol, timeframe).await {
                Ok(history) => history,
                Err(e) => {
                    warn!("History fetch failed for {}: {}", snapshot.symbol, e);
                    None
                }
            };
            AssetInput::new(snapshot, history)
        })
        .buffered(MAX_CONCURRENT_HISTORY_REQUESTS)
        .collect()
        .await;

    let with_history = assets.iter().filter(|a| a.historical_data.is_some()).count();
    info!(
        "Fetched {} history for {} of {} assets",
        timeframe,
        with_history,
        assets.len()
    );
    assets
}
