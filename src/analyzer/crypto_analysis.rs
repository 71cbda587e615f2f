use crate::analyzer::analysis_config::{AnalysisConfig, ConfigManager, ConfigUpdate, Timeframe};
use crate::analyzer::features::{analyze_price_action, analyze_volume};
use crate::analyzer::market_indicators::MarketAnalyzer;
use crate::analyzer::scoring::evaluate_potential;
use crate::model::{
    AnalysisError, AssetInput, AssetOutcome, CryptoSnapshot, DataQuality, HistoricalSeries,
    IndicatorResult, ScoredAsset,
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Trait defining the interface of the scoring engine.
pub trait Analyzer {
    /// Scores every asset against one snapshot of the active config.
    /// The output has one entry per input, in input order.
    fn analyze_cryptos(&self, assets: &[AssetInput]) -> Vec<AssetOutcome>;
    fn set_analysis_config(&self, update: ConfigUpdate) -> Arc<AnalysisConfig>;
    fn get_timeframe(&self) -> Timeframe;
}

/// Implementation of the scoring engine.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerImpl {
    config: Arc<ConfigManager>,
}

impl AnalyzerImpl {
    pub fn new(config: Arc<ConfigManager>) -> Self {
        Self { config }
    }

    /// Same as [`Analyzer::analyze_cryptos`], with every asset scored on the blocking pool.
    pub async fn analyze_cryptos_concurrent(&self, assets: Vec<AssetInput>) -> Vec<AssetOutcome> {
        let config = self.config.snapshot();
        let total = assets.len();

        let tasks = assets.into_iter().map(|asset| {
            let config = Arc::clone(&config);
            tokio::task::spawn_blocking(move || analyze_asset(&asset, &config))
        });
        let outcomes: Vec<AssetOutcome> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap_or_else(|e| Err(AnalysisError::Worker(e.to_string()))))
            .collect();

        log_batch(&outcomes, total, &config);
        outcomes
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze_cryptos(&self, assets: &[AssetInput]) -> Vec<AssetOutcome> {
        let config = self.config.snapshot();
        let outcomes: Vec<AssetOutcome> = assets
            .iter()
            .map(|asset| analyze_asset(asset, &config))
            .collect();
        log_batch(&outcomes, assets.len(), &config);
        outcomes
    }

    fn set_analysis_config(&self, update: ConfigUpdate) -> Arc<AnalysisConfig> {
        self.config.set_analysis_config(update)
    }

    fn get_timeframe(&self) -> Timeframe {
        self.config.get_timeframe()
    }
}

/// Runs indicators, features and scoring for a single asset.
pub fn analyze_asset(asset: &AssetInput, config: &AnalysisConfig) -> AssetOutcome {
    validate(asset)?;
    let snapshot = &asset.snapshot;

    let (prices, volumes) = match &asset.historical_data {
        Some(history) => (history.prices.clone(), history.volumes.clone()),
        None => synthesize_series(snapshot),
    };

    let periods = &config.periods;
    let data_points = prices.len();
    let indicators = IndicatorResult {
        rsi: MarketAnalyzer::compute_rsi(&prices, periods.rsi),
        macd: MarketAnalyzer::compute_macd(
            &prices,
            periods.macd_fast,
            periods.macd_slow,
            periods.macd_signal,
        ),
        volume_analysis: analyze_volume(&volumes),
        price_action: analyze_price_action(&prices),
        data_quality: DataQuality {
            has_historical_data: asset.historical_data.is_some(),
            data_points,
            is_reliable: data_points >= config.min_data_points,
        },
    };
    let potential_gain = evaluate_potential(&indicators, snapshot, config);

    debug!(
        "{}: rsi={:.2} histogram={:.4} volume_ratio={:.2} score={:.2} potential={}",
        snapshot.symbol,
        indicators.rsi,
        indicators.macd.histogram,
        indicators.volume_analysis.volume_ratio,
        potential_gain.score,
        potential_gain.is_potential
    );

    Ok(ScoredAsset {
        snapshot: snapshot.clone(),
        technical_indicators: indicators,
        potential_gain,
    })
}

/// Two-point price and volume series rebuilt from the 24h percent changes.
pub fn synthesize_series(snapshot: &CryptoSnapshot) -> (Vec<f64>, Vec<f64>) {
    let previous_price = snapshot.price / (1.0 + snapshot.percent_change_24h / 100.0);
    let previous_price = if previous_price.is_finite() {
        previous_price
    } else {
        snapshot.price
    };
    let current_volume = snapshot.volume_24h * (1.0 + snapshot.volume_change_24h / 100.0);

    (
        vec![previous_price, snapshot.price],
        vec![snapshot.volume_24h, current_volume],
    )
}

fn validate(asset: &AssetInput) -> Result<(), AnalysisError> {
    let s = &asset.snapshot;
    let fields = [
        ("price", s.price),
        ("volume_24h", s.volume_24h),
        ("market_cap", s.market_cap),
        ("percent_change_24h", s.percent_change_24h),
        ("volume_change_24h", s.volume_change_24h),
    ];
    if let Some(&(field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
        return Err(AnalysisError::InvalidSnapshot {
            symbol: s.symbol.clone(),
            field,
        });
    }

    if let Some(history) = &asset.historical_data {
        check_history(&s.symbol, history)?;
    }
    Ok(())
}

fn check_history(symbol: &str, history: &HistoricalSeries) -> Result<(), AnalysisError> {
    if history.prices.len() != history.volumes.len() {
        return Err(AnalysisError::SeriesLengthMismatch {
            symbol: symbol.to_string(),
            prices: history.prices.len(),
            volumes: history.volumes.len(),
        });
    }
    if history.prices.iter().chain(&history.volumes).any(|v| !v.is_finite()) {
        return Err(AnalysisError::NonFiniteSeries {
            symbol: symbol.to_string(),
        });
    }
    Ok(())
}

fn log_batch(outcomes: &[AssetOutcome], total: usize, config: &AnalysisConfig) {
    let mut potential = 0;
    for outcome in outcomes {
        match outcome {
            Ok(asset) if asset.potential_gain.is_potential => potential += 1,
            Ok(_) => {}
            Err(e) => warn!("Skipping asset: {}", e),
        }
    }
    info!(
        "Analyzed {} assets ({} timeframe): {} potential",
        total, config.timeframe, potential
    );
}
