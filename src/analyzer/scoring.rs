use crate::analyzer::analysis_config::{AnalysisConfig, Timeframe};
use crate::model::{CryptoSnapshot, IndicatorResult, PotentialGain, Reliability};

/// Score discount for series shorter than `min_data_points`.
pub const UNRELIABLE_MULTIPLIER: f64 = 0.7;
/// Unscaled points an asset needs to be flagged as a potential opportunity.
pub const POTENTIAL_POINTS: u32 = 5;

const SMALL_CAP: f64 = 500_000_000.0;
const MID_CAP: f64 = 1_000_000_000.0;
/// Width of the one-point band next to the RSI and volume thresholds.
const RSI_BAND: f64 = 10.0;
const VOLUME_BAND: f64 = 0.2;
/// Volume ratio above which the increase is listed as a reason, for every timeframe.
const VOLUME_REASON_RATIO: f64 = 1.1;

/// Timeframe-dependent thresholds of the scoring heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringProfile {
    pub rsi_threshold: f64,
    pub volume_threshold: f64,
    pub timeframe_multiplier: f64,
}

impl ScoringProfile {
    pub fn for_timeframe(timeframe: Timeframe) -> Self {
        match timeframe {
            Timeframe::Short => Self {
                rsi_threshold: 30.0,
                volume_threshold: 1.5,
                timeframe_multiplier: 1.5,
            },
            Timeframe::Medium => Self {
                rsi_threshold: 35.0,
                volume_threshold: 1.3,
                timeframe_multiplier: 1.0,
            },
            Timeframe::Long => Self {
                rsi_threshold: 40.0,
                volume_threshold: 1.2,
                timeframe_multiplier: 0.7,
            },
        }
    }
}

/// Scores one asset. Every factor gives 0, 1 or 2 points; the total is scaled by the
/// timeframe multiplier and by the data-quality multiplier.
pub fn evaluate_potential(
    indicators: &IndicatorResult,
    snapshot: &CryptoSnapshot,
    config: &AnalysisConfig,
) -> PotentialGain {
    let profile = ScoringProfile::for_timeframe(config.timeframe);
    let quality_multiplier = data_quality_multiplier(indicators, config);
    let final_multiplier = profile.timeframe_multiplier * quality_multiplier;

    let points = rsi_points(indicators.rsi, &profile)
        + macd_points(indicators)
        + volume_points(indicators.volume_analysis.volume_ratio, &profile)
        + trend_points(indicators)
        + market_cap_points(snapshot.market_cap)
        + price_change_points(snapshot.percent_change_24h);

    PotentialGain {
        score: points as f64 * final_multiplier,
        // same as score >= POTENTIAL_POINTS * final_multiplier, without float rounding
        is_potential: points >= POTENTIAL_POINTS,
        reasons: generate_reasons(indicators, snapshot, config, &profile),
        reliability: Reliability {
            data_quality: indicators.data_quality,
            confidence: quality_multiplier * 100.0,
        },
    }
}

fn data_quality_multiplier(indicators: &IndicatorResult, config: &AnalysisConfig) -> f64 {
    if indicators.data_quality.data_points < config.min_data_points {
        UNRELIABLE_MULTIPLIER
    } else {
        1.0
    }
}

fn rsi_points(rsi: f64, profile: &ScoringProfile) -> u32 {
    if rsi < profile.rsi_threshold {
        2
    } else if rsi < profile.rsi_threshold + RSI_BAND {
        1
    } else {
        0
    }
}

fn macd_points(indicators: &IndicatorResult) -> u32 {
    let macd = &indicators.macd;
    match (macd.histogram > 0.0, macd.signal > 0.0) {
        (true, true) => 2,
        (true, false) => 1,
        _ => 0,
    }
}

fn volume_points(ratio: f64, profile: &ScoringProfile) -> u32 {
    if ratio > profile.volume_threshold {
        2
    } else if ratio > profile.volume_threshold - VOLUME_BAND {
        1
    } else {
        0
    }
}

fn trend_points(indicators: &IndicatorResult) -> u32 {
    let trend = &indicators.price_action.trend;
    match (trend.is_uptrend, trend.strength > 3.0) {
        (true, true) => 2,
        (true, false) => 1,
        _ => 0,
    }
}

fn market_cap_points(market_cap: f64) -> u32 {
    if market_cap < SMALL_CAP {
        2
    } else if market_cap < MID_CAP {
        1
    } else {
        0
    }
}

fn price_change_points(change: f64) -> u32 {
    if is_moderate_increase(change) || is_limited_decrease(change) {
        1
    } else {
        0
    }
}

fn is_moderate_increase(change: f64) -> bool {
    change > 0.0 && change < 15.0
}

fn is_limited_decrease(change: f64) -> bool {
    change < 0.0 && change > -10.0
}

/// Human-readable reasons, in a fixed order.
fn generate_reasons(
    indicators: &IndicatorResult,
    snapshot: &CryptoSnapshot,
    config: &AnalysisConfig,
    profile: &ScoringProfile,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if indicators.rsi < profile.rsi_threshold {
        reasons.push("RSI indicates potential oversold condition".to_string());
    }

    if indicators.macd.histogram > 0.0 {
        if indicators.macd.signal > 0.0 {
            reasons.push("Strong MACD momentum with positive signal".to_string());
        } else {
            reasons.push("Positive MACD histogram showing potential momentum".to_string());
        }
    }

    let ratio = indicators.volume_analysis.volume_ratio;
    if ratio > VOLUME_REASON_RATIO {
        reasons.push(format!("Volume increase: {:.1}%", (ratio - 1.0) * 100.0));
    }

    let trend = &indicators.price_action.trend;
    if trend.is_uptrend {
        reasons.push(format!("Upward trend with {:.1}% strength", trend.strength));
    }

    if snapshot.market_cap < SMALL_CAP {
        reasons.push(format!(
            "Small market cap: ${:.1}M",
            snapshot.market_cap / 1_000_000.0
        ));
    }

    let change = snapshot.percent_change_24h;
    if is_moderate_increase(change) {
        reasons.push(format!("Moderate price increase: +{:.1}% in 24h", change));
    } else if is_limited_decrease(change) {
        reasons.push(format!("Limited price decrease: {:.1}% in 24h", change));
    }

    let quality = &indicators.data_quality;
    if quality.data_points < config.min_data_points {
        reasons.push(format!(
            "Low data quality: {} of {} expected data points",
            quality.data_points, config.min_data_points
        ));
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataQuality, MacdResult, PriceAction, Trend, VolumeAnalysis};

    const EPS: f64 = 1e-9;

    fn snapshot(market_cap: f64, percent_change_24h: f64) -> CryptoSnapshot {
        CryptoSnapshot {
            symbol: "TST".into(),
            name: "Test".into(),
            price: 1.0,
            volume_24h: 1_000_000.0,
            market_cap,
            percent_change_24h,
            volume_change_24h: 0.0,
        }
    }

    fn indicators(
        rsi: f64,
        macd: MacdResult,
        ratio: f64,
        trend: Trend,
        data_points: usize,
    ) -> IndicatorResult {
        IndicatorResult {
            rsi,
            macd,
            volume_analysis: VolumeAnalysis {
                volume_increase: ratio > 1.0,
                volume_ratio: ratio,
            },
            price_action: PriceAction {
                price_change: if trend.is_uptrend { trend.strength } else { -trend.strength },
                trend,
            },
            data_quality: DataQuality {
                has_historical_data: data_points > 2,
                data_points,
                is_reliable: false,
            },
        }
    }

    fn bullish_macd() -> MacdResult {
        MacdResult { macd: 2.0, signal: 1.0, histogram: 1.0 }
    }

    fn neutral(data_points: usize) -> IndicatorResult {
        indicators(
            80.0,
            MacdResult::default(),
            0.5,
            Trend::default(),
            data_points,
        )
    }

    #[test]
    fn test_short_timeframe_unreliable_scenario() {
        let config = AnalysisConfig::for_timeframe(Timeframe::Short);
        let ind = indicators(
            20.0,
            bullish_macd(),
            1.6,
            Trend { is_uptrend: true, strength: 5.0 },
            10,
        );
        let gain = evaluate_potential(&ind, &snapshot(3e8, 5.0), &config);

        assert!((gain.score - 11.55).abs() < EPS);
        assert!(gain.is_potential);
        assert!((gain.reliability.confidence - 70.0).abs() < EPS);
        assert_eq!(
            gain.reasons,
            vec![
                "RSI indicates potential oversold condition",
                "Strong MACD momentum with positive signal",
                "Volume increase: 60.0%",
                "Upward trend with 5.0% strength",
                "Small market cap: $300.0M",
                "Moderate price increase: +5.0% in 24h",
                "Low data quality: 10 of 30 expected data points",
            ]
        );
    }

    #[test]
    fn test_nothing_triggers() {
        let config = AnalysisConfig::default();
        let gain = evaluate_potential(&neutral(120), &snapshot(5e9, 30.0), &config);
        assert_eq!(gain.score, 0.0);
        assert!(!gain.is_potential);
        assert!(gain.reasons.is_empty());
        assert_eq!(gain.reliability.confidence, 100.0);
    }

    #[test]
    fn test_rsi_bands_per_timeframe() {
        let short = ScoringProfile::for_timeframe(Timeframe::Short);
        assert_eq!(rsi_points(29.9, &short), 2);
        assert_eq!(rsi_points(30.0, &short), 1);
        assert_eq!(rsi_points(39.9, &short), 1);
        assert_eq!(rsi_points(40.0, &short), 0);

        let long = ScoringProfile::for_timeframe(Timeframe::Long);
        assert_eq!(rsi_points(39.0, &long), 2);
        assert_eq!(rsi_points(45.0, &long), 1);
        assert_eq!(rsi_points(50.0, &long), 0);
    }

    #[test]
    fn test_volume_bands_per_timeframe() {
        let medium = ScoringProfile::for_timeframe(Timeframe::Medium);
        assert_eq!(volume_points(1.31, &medium), 2);
        assert_eq!(volume_points(1.3, &medium), 1);
        assert_eq!(volume_points(1.2, &medium), 1);
        assert_eq!(volume_points(1.05, &medium), 0);

        let long = ScoringProfile::for_timeframe(Timeframe::Long);
        assert_eq!(volume_points(1.25, &long), 2);
        assert_eq!(volume_points(1.05, &long), 1);
        assert_eq!(volume_points(0.95, &long), 0);
    }

    #[test]
    fn test_volume_reason_uses_fixed_cutoff() {
        // short: 1.25 scores nothing against 1.5 - 0.2 but is still a listed increase
        let mut ind = neutral(400);
        ind.volume_analysis.volume_ratio = 1.25;
        let short = AnalysisConfig::for_timeframe(Timeframe::Short);
        let gain = evaluate_potential(&ind, &snapshot(5e9, 30.0), &short);
        assert_eq!(gain.score, 0.0);
        assert_eq!(gain.reasons, vec!["Volume increase: 25.0%"]);

        // long: 1.05 scores a point against 1.2 - 0.2 but stays below the reason cutoff
        ind.volume_analysis.volume_ratio = 1.05;
        let long = AnalysisConfig::for_timeframe(Timeframe::Long);
        let gain = evaluate_potential(&ind, &snapshot(5e9, 30.0), &long);
        assert!(gain.score > 0.0);
        assert!(gain.reasons.is_empty());
    }

    #[test]
    fn test_macd_and_trend_points() {
        let mut ind = neutral(100);
        ind.macd = MacdResult { macd: -1.0, signal: -2.0, histogram: 1.0 };
        assert_eq!(macd_points(&ind), 1);
        ind.macd = bullish_macd();
        assert_eq!(macd_points(&ind), 2);
        ind.macd = MacdResult { macd: 1.0, signal: 2.0, histogram: -1.0 };
        assert_eq!(macd_points(&ind), 0);

        ind.price_action.trend = Trend { is_uptrend: true, strength: 3.0 };
        assert_eq!(trend_points(&ind), 1);
        ind.price_action.trend = Trend { is_uptrend: true, strength: 3.5 };
        assert_eq!(trend_points(&ind), 2);
        ind.price_action.trend = Trend { is_uptrend: false, strength: 8.0 };
        assert_eq!(trend_points(&ind), 0);
    }

    #[test]
    fn test_snapshot_factors() {
        assert_eq!(market_cap_points(499_999_999.0), 2);
        assert_eq!(market_cap_points(500_000_000.0), 1);
        assert_eq!(market_cap_points(1_000_000_000.0), 0);

        assert_eq!(price_change_points(0.0), 0);
        assert_eq!(price_change_points(14.9), 1);
        assert_eq!(price_change_points(15.0), 0);
        assert_eq!(price_change_points(-9.9), 1);
        assert_eq!(price_change_points(-10.0), 0);
    }

    #[test]
    fn test_potential_threshold_scales_with_multiplier() {
        // long timeframe, reliable: 5 points -> 3.5 >= 5 * 0.7
        let config = AnalysisConfig::for_timeframe(Timeframe::Long);
        let mut ind = neutral(400);
        ind.macd = bullish_macd();
        let gain = evaluate_potential(&ind, &snapshot(8e8, 12.0), &config);
        // macd 2 + cap 1 + change 1 = 4
        assert!(!gain.is_potential);
        assert!((gain.score - 2.8).abs() < EPS);

        ind.rsi = 45.0;
        let gain = evaluate_potential(&ind, &snapshot(8e8, 12.0), &config);
        assert!(gain.is_potential);
        assert!((gain.score - 3.5).abs() < EPS);
    }

    #[test]
    fn test_decrease_reason_formatting() {
        let config = AnalysisConfig::default();
        let mut ind = neutral(100);
        ind.macd = MacdResult { macd: -0.5, signal: -1.0, histogram: 0.5 };
        let gain = evaluate_potential(&ind, &snapshot(2e9, -3.14), &config);
        assert_eq!(
            gain.reasons,
            vec![
                "Positive MACD histogram showing potential momentum",
                "Limited price decrease: -3.1% in 24h",
            ]
        );
    }
}
