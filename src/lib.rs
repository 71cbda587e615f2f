//! Technical analysis and scoring of crypto market snapshots.
//!
//! The engine lives in [`analyzer`]: RSI and MACD, volume and trend features, a
//! timeframe-driven [`analyzer::ConfigManager`] and the scoring heuristic. The other
//! modules feed it (CoinMarketCap) and deliver its results (Telegram).

pub mod analyzer;
pub mod config;
pub mod market_data;
pub mod model;
pub mod normalizer;
pub mod notifier;
pub mod utils;
