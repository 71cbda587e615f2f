// Core structs: snapshots, series, indicator results, scored assets and error types
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latest market snapshot of a single asset, as delivered by the market data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoSnapshot {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub percent_change_24h: f64,
    pub volume_change_24h: f64,
}

/// Price and volume history, oldest first. Both sequences have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub prices: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl HistoricalSeries {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// One unit of engine input: a snapshot with its optional history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    #[serde(flatten)]
    pub snapshot: CryptoSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_data: Option<HistoricalSeries>,
}

impl AssetInput {
    pub fn new(snapshot: CryptoSnapshot, historical_data: Option<HistoricalSeries>) -> Self {
        Self {
            snapshot,
            historical_data,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAnalysis {
    pub volume_increase: bool,
    pub volume_ratio: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub is_uptrend: bool,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAction {
    pub price_change: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    pub has_historical_data: bool,
    pub data_points: usize,
    pub is_reliable: bool,
}

/// Everything the indicator library and feature extractor derived for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorResult {
    pub rsi: f64,
    pub macd: MacdResult,
    pub volume_analysis: VolumeAnalysis,
    pub price_action: PriceAction,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reliability {
    pub data_quality: DataQuality,
    /// Percent, 100 for a reliable series.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialGain {
    pub score: f64,
    pub is_potential: bool,
    pub reasons: Vec<String>,
    pub reliability: Reliability,
}

/// Terminal output of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredAsset {
    #[serde(flatten)]
    pub snapshot: CryptoSnapshot,
    pub technical_indicators: IndicatorResult,
    pub potential_gain: PotentialGain,
}

/// Result of analyzing a single asset. A failure never aborts the rest of the batch.
pub type AssetOutcome = Result<ScoredAsset, AnalysisError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("{symbol}: snapshot field `{field}` is not a finite number")]
    InvalidSnapshot { symbol: String, field: &'static str },
    #[error("{symbol}: history has {prices} prices but {volumes} volumes")]
    SeriesLengthMismatch {
        symbol: String,
        prices: usize,
        volumes: usize,
    },
    #[error("{symbol}: history contains non-finite values")]
    NonFiniteSeries { symbol: String },
    #[error("analysis worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("API responded [{status}]: {body}")]
    ApiError { status: u16, body: String },
    #[error("Failed to decode response: {0}")]
    DecodeError(String),
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MarketDataError::DecodeError(err.to_string())
        } else {
            MarketDataError::HttpError(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Telegram API error: {0}")]
    ApiError(String),
    #[error("Telegram unreachable")]
    Unreachable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
    #[error("CMC_API_KEY is not defined")]
    MissingApiKey,
}
