use crate::analyzer::Timeframe;
use crate::model::{CryptoSnapshot, HistoricalSeries, MarketDataError};

#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Latest snapshot of every listed asset.
    async fn fetch_listings(&self) -> Result<Vec<CryptoSnapshot>, MarketDataError>;

    /// History of `symbol` covering `timeframe`, oldest first. `Ok(None)` when the provider
    /// has nothing for the symbol.
    async fn fetch_history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<HistoricalSeries>, MarketDataError>;
}
