use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Coarse analysis horizon. Selects indicator periods and scoring thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Short,
    #[default]
    Medium,
    Long,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::Short, Timeframe::Medium, Timeframe::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Short => "short",
            Timeframe::Medium => "medium",
            Timeframe::Long => "long",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|timeframe| timeframe.as_str() == name)
            .ok_or_else(|| {
                format!("unknown timeframe `{}` (expected short, medium or long)", name)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorPeriods {
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

/// The active analysis parameters. Never mutated in place; see [`ConfigManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub timeframe: Timeframe,
    /// Series shorter than this are scored as unreliable.
    pub min_data_points: usize,
    pub periods: IndicatorPeriods,
}

impl AnalysisConfig {
    /// Preset for a timeframe.
    pub fn for_timeframe(timeframe: Timeframe) -> Self {
        let (min_data_points, periods) = match timeframe {
            Timeframe::Short => (
                30,
                IndicatorPeriods {
                    rsi: 7,
                    macd_fast: 6,
                    macd_slow: 13,
                    macd_signal: 4,
                },
            ),
            Timeframe::Medium => (
                90,
                IndicatorPeriods {
                    rsi: 14,
                    macd_fast: 12,
                    macd_slow: 26,
                    macd_signal: 9,
                },
            ),
            Timeframe::Long => (
                365,
                IndicatorPeriods {
                    rsi: 21,
                    macd_fast: 24,
                    macd_slow: 52,
                    macd_signal: 18,
                },
            ),
        };
        Self {
            timeframe,
            min_data_points,
            periods,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::for_timeframe(Timeframe::default())
    }
}

/// Partial update for [`ConfigManager::set_analysis_config`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigUpdate {
    pub timeframe: Option<Timeframe>,
}

/// Holds the one active [`AnalysisConfig`] and swaps it atomically.
///
/// Readers take an `Arc` snapshot and keep using it for the rest of their batch, so an
/// update never shows up halfway through an analysis.
#[derive(Debug)]
pub struct ConfigManager {
    current: RwLock<Arc<AnalysisConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Merges `update` over the active config and re-derives the timeframe preset.
    /// Returns the new active config.
    pub fn set_analysis_config(&self, update: ConfigUpdate) -> Arc<AnalysisConfig> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let timeframe = update.timeframe.unwrap_or(guard.timeframe);
        let next = Arc::new(AnalysisConfig::for_timeframe(timeframe));
        *guard = Arc::clone(&next);
        info!(
            "Analysis config set: timeframe={} min_data_points={} periods={:?}",
            next.timeframe, next.min_data_points, next.periods
        );
        next
    }

    pub fn snapshot(&self) -> Arc<AnalysisConfig> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn get_timeframe(&self) -> Timeframe {
        self.snapshot().timeframe
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_default_is_medium_preset() {
        let manager = ConfigManager::new();
        let config = manager.snapshot();
        assert_eq!(config.timeframe, Timeframe::Medium);
        assert_eq!(config.min_data_points, 90);
        assert_eq!(
            config.periods,
            IndicatorPeriods { rsi: 14, macd_fast: 12, macd_slow: 26, macd_signal: 9 }
        );
    }

    #[test]
    fn test_presets_keep_fast_below_slow() {
        for timeframe in Timeframe::ALL {
            let p = AnalysisConfig::for_timeframe(timeframe).periods;
            assert!(p.macd_fast < p.macd_slow);
            assert!(p.rsi > 0 && p.macd_signal > 0);
        }
    }

    #[test]
    fn test_long_to_short_update() {
        let manager = ConfigManager::with_config(AnalysisConfig::for_timeframe(Timeframe::Long));
        assert_eq!(manager.get_timeframe(), Timeframe::Long);

        manager.set_analysis_config(ConfigUpdate { timeframe: Some(Timeframe::Short) });

        assert_eq!(manager.get_timeframe(), Timeframe::Short);
        let config = manager.snapshot();
        assert_eq!(config.min_data_points, 30);
        assert_eq!(
            config.periods,
            IndicatorPeriods { rsi: 7, macd_fast: 6, macd_slow: 13, macd_signal: 4 }
        );
    }

    #[test]
    fn test_empty_update_keeps_timeframe() {
        let manager = ConfigManager::new();
        manager.set_analysis_config(ConfigUpdate { timeframe: Some(Timeframe::Long) });
        let config = manager.set_analysis_config(ConfigUpdate::default());
        assert_eq!(*config, AnalysisConfig::for_timeframe(Timeframe::Long));
    }

    #[test]
    fn test_snapshot_survives_update() {
        let manager = ConfigManager::new();
        let before = manager.snapshot();
        manager.set_analysis_config(ConfigUpdate { timeframe: Some(Timeframe::Short) });
        assert_eq!(before.timeframe, Timeframe::Medium);
        assert_eq!(before.min_data_points, 90);
    }

    #[test]
    fn test_concurrent_readers_never_see_mixed_presets() {
        let manager = Arc::new(ConfigManager::new());
        let presets = Timeframe::ALL.map(AnalysisConfig::for_timeframe);

        let writer = {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for i in 0..500 {
                    let timeframe = [Timeframe::Short, Timeframe::Long][i % 2];
                    manager.set_analysis_config(ConfigUpdate { timeframe: Some(timeframe) });
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let config = manager.snapshot();
                        assert!(presets.contains(&*config));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn test_parse_timeframe() {
        assert_eq!(" Short ".parse::<Timeframe>(), Ok(Timeframe::Short));
        assert_eq!("LONG".parse::<Timeframe>(), Ok(Timeframe::Long));
        assert!("weekly".parse::<Timeframe>().is_err());
        assert_eq!(Timeframe::Medium.to_string(), "medium");
    }
}
