use crate::analyzer::{AnalysisConfig, Timeframe};
use crate::market_data::traits::MarketDataSource;
use crate::model::{CryptoSnapshot, HistoricalSeries, MarketDataError};
use crate::normalizer::{normalize_all, normalize_history};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info};

const CMC_API_URL: &str = "https://pro-api.coinmarketcap.com/v1";

// Raw CoinMarketCap payloads. Every number is optional, the normalizer decides what is usable.

#[derive(Debug, Deserialize)]
pub struct ListingsResponse {
    pub data: Vec<RawListing>,
}

#[derive(Debug, Deserialize)]
pub struct RawListing {
    pub symbol: String,
    pub name: String,
    pub quote: RawQuoteMap,
}

#[derive(Debug, Deserialize)]
pub struct RawQuoteMap {
    #[serde(rename = "USD")]
    pub usd: Option<RawUsdQuote>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawUsdQuote {
    pub price: Option<f64>,
    pub volume_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub volume_change_24h: Option<f64>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalResponse {
    pub data: HashMap<String, RawHistory>,
}

/// The endpoint returns either a bare list of quotes or an object wrapping them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawHistory {
    Quotes(Vec<RawHistoricalQuote>),
    Wrapped { quotes: Vec<RawHistoricalQuote> },
}

impl RawHistory {
    pub fn into_quotes(self) -> Vec<RawHistoricalQuote> {
        match self {
            RawHistory::Quotes(quotes) | RawHistory::Wrapped { quotes } => quotes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawHistoricalQuote {
    pub timestamp: Option<String>,
    pub quote: RawQuoteMap,
}

pub struct CoinMarketCapClient {
    client: Client,
    api_key: String,
    base_url: String,
    listing_limit: usize,
    interval: String,
}

impl CoinMarketCapClient {
    pub fn new(api_key: String, listing_limit: usize) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("crypto-sniper/0.1")
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: CMC_API_URL.to_string(),
            listing_limit,
            interval: "1d".to_string(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .header("Accept", "application/json")
    }

    async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, MarketDataError> {
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            return Err(MarketDataError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MarketDataError::DecodeError(e.to_string()))
    }
}

/// Number of daily quotes requested for a timeframe: its reliability cutoff.
pub fn history_count(timeframe: Timeframe) -> usize {
    AnalysisConfig::for_timeframe(timeframe).min_data_points
}

#[async_trait::async_trait]
impl MarketDataSource for CoinMarketCapClient {
    async fn fetch_listings(&self) -> Result<Vec<CryptoSnapshot>, MarketDataError> {
        info!("Fetching crypto data from CoinMarketCap...");
        let limit = self.listing_limit.to_string();
        let req = self
            .get("/cryptocurrency/listings/latest")
            .query(&[("limit", limit.as_str()), ("convert", "USD")]);

        let response: ListingsResponse = Self::send_json(req).await.inspect_err(|e| {
            error!("Error fetching crypto data: {}", e);
        })?;
        let snapshots = normalize_all(response.data);
        info!("Successfully fetched {} cryptocurrencies", snapshots.len());
        Ok(snapshots)
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<HistoricalSeries>, MarketDataError> {
        let count = history_count(timeframe).to_string();
        let req = self.get("/cryptocurrency/quotes/historical").query(&[
            ("symbol", symbol),
            ("interval", self.interval.as_str()),
            ("count", count.as_str()),
            ("convert", "USD"),
        ]);

        let mut response: HistoricalResponse = Self::send_json(req).await?;
        Ok(response
            .data
            .remove(symbol)
            .and_then(|history| normalize_history(symbol, history.into_quotes())))
    }
}
