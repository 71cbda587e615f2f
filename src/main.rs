use chrono::Utc;
use crypto_sniper::analyzer::{Analyzer, AnalyzerImpl, ConfigManager, ConfigUpdate};
use crypto_sniper::config::{load_config, AppConfig};
use crypto_sniper::market_data::{fetch_histories, CoinMarketCapClient, MarketDataSource};
use crypto_sniper::notifier::report::{format_report, select_opportunities};
use crypto_sniper::notifier::TelegramNotifier;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from file and environment
    let config: Arc<AppConfig> = match load_config("config.json") {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let analyzer = AnalyzerImpl::new(Arc::new(ConfigManager::new()));
    analyzer.set_analysis_config(ConfigUpdate {
        timeframe: Some(config.timeframe),
    });

    let source = match CoinMarketCapClient::new(config.cmc_api_key.clone(), config.listing_limit) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create market data client: {}", e);
            return;
        }
    };

    let notifier = match TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id,
    ) {
        Ok(n) => n,
        Err(e) => {
            error!("Failed to create notifier: {}", e);
            return;
        }
    };

    info!("Sending startup message...");
    if let Err(e) = notifier.notify_text("🚀 CryptoSniper started!").await {
        warn!("Startup notification failed: {}", e);
    }

    // Main processing loop
    loop {
        info!("Starting analysis cycle...");
        run_cycle(&source, &analyzer, &notifier, &config).await;

        info!("Waiting {}s for the next cycle...", config.check_interval_seconds);
        sleep(Duration::from_secs(config.check_interval_seconds)).await;
    }
}

/// Fetches market data, scores every asset and reports the opportunities.
async fn run_cycle(
    source: &dyn MarketDataSource,
    analyzer: &AnalyzerImpl,
    notifier: &TelegramNotifier,
    config: &AppConfig,
) {
    let snapshots = match source.fetch_listings().await {
        Ok(s) => s,
        Err(e) => {
            warn!("Skipping cycle, listings unavailable: {}", e);
            return;
        }
    };

    let timeframe = analyzer.get_timeframe();
    let assets = fetch_histories(source, snapshots, timeframe).await;
    let outcomes = analyzer.analyze_cryptos_concurrent(assets).await;

    let opportunities = select_opportunities(&outcomes, config.min_report_score);
    info!("Found {} potential cryptocurrencies", opportunities.len());

    let Some(report) = format_report(Utc::now().date_naive(), &opportunities) else {
        info!("No potential cryptocurrencies found today");
        return;
    };
    match notifier.notify_report(&report).await {
        Ok(()) => info!("Daily report sent"),
        Err(e) => warn!("Report delivery failed: {}", e),
    }
}
