// Analyzer module: indicator library, feature extraction, configuration and scoring.

pub mod analysis_config;
pub mod crypto_analysis;
pub mod features;
pub mod market_indicators;
pub mod scoring;

// Re-export the main Analyzer implementation for ease of use.
pub use analysis_config::{AnalysisConfig, ConfigManager, ConfigUpdate, Timeframe};
pub use crypto_analysis::{Analyzer, AnalyzerImpl};
