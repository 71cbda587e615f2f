use crate::analyzer::Timeframe;
use crate::model::ConfigError;
use serde::Deserialize;
use std::env;
use std::fs;

/// Environment variables that take precedence over `config.json`.
pub const API_KEY_VAR: &str = "CMC_API_KEY";
pub const TIMEFRAME_VAR: &str = "CRYPTO_ANALYSIS_TIMEFRAME";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cmc_api_key: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: i64,
    #[serde(default)]
    pub timeframe: Timeframe,
    #[serde(default = "default_listing_limit")]
    pub listing_limit: usize,
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    /// Opportunities scoring below this are left out of the report.
    #[serde(default)]
    pub min_report_score: f64,
}

fn default_listing_limit() -> usize {
    200
}

fn default_check_interval() -> u64 {
    24 * 60 * 60
}

impl AppConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_VAR) {
            self.cmc_api_key = key;
        }
        if let Some(raw) = lookup(TIMEFRAME_VAR) {
            self.timeframe = raw
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("{}: {}", TIMEFRAME_VAR, e)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cmc_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.listing_limit == 0 || self.listing_limit > 5000 {
            return Err(ConfigError::InvalidValue(format!(
                "listing_limit must be within 1..=5000, got {}",
                self.listing_limit
            )));
        }
        if self.check_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "check_interval_seconds must be positive".into(),
            ));
        }
        if !self.min_report_score.is_finite() || self.min_report_score < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "min_report_score must be a non-negative number, got {}",
                self.min_report_score
            )));
        }
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config = AppConfig::from_json(&content)?;
    config.apply_overrides(|name| env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}
