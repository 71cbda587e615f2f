use crate::market_data::coinmarketcap::{RawHistoricalQuote, RawListing};
use crate::model::{CryptoSnapshot, HistoricalSeries};
use crate::utils::parse_datetime;
use tracing::warn;

/// Turns raw listings into snapshots, dropping entries without a usable USD quote.
pub fn normalize_all(listings: Vec<RawListing>) -> Vec<CryptoSnapshot> {
    let total = listings.len();
    let snapshots: Vec<CryptoSnapshot> = listings
        .into_iter()
        .filter_map(normalize_listing)
        .collect();
    if snapshots.len() < total {
        warn!("Dropped {} listings with incomplete quotes", total - snapshots.len());
    }
    snapshots
}

fn normalize_listing(listing: RawListing) -> Option<CryptoSnapshot> {
    let Some(usd) = listing.quote.usd else {
        warn!("{}: no USD quote", listing.symbol);
        return None;
    };

    let required = |field: &str, value: Option<f64>| match value.filter(|v| v.is_finite()) {
        Some(v) => Some(v),
        None => {
            warn!("{}: missing {}", listing.symbol, field);
            None
        }
    };
    let price = required("price", usd.price)?;
    let volume_24h = required("volume_24h", usd.volume_24h)?;
    let market_cap = required("market_cap", usd.market_cap)?;

    Some(CryptoSnapshot {
        price,
        volume_24h,
        market_cap,
        // freshly listed assets report no change yet
        percent_change_24h: finite_or_zero(usd.percent_change_24h),
        volume_change_24h: finite_or_zero(usd.volume_change_24h),
        symbol: listing.symbol,
        name: listing.name,
    })
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Builds an oldest-first series from historical quotes.
///
/// Quotes are ordered by timestamp (from the entry or its USD quote); undated quotes keep
/// their position after the dated ones. A quote missing its price or volume is dropped as
/// a whole so both sequences stay aligned. `None` when no usable quote is left, so the
/// asset is analyzed from its snapshot instead.
pub fn normalize_history(
    symbol: &str,
    quotes: Vec<RawHistoricalQuote>,
) -> Option<HistoricalSeries> {
    let total = quotes.len();
    let mut points: Vec<_> = quotes
        .into_iter()
        .filter_map(|q| {
            let usd = q.quote.usd?;
            let price = usd.price.filter(|v| v.is_finite())?;
            let volume = usd.volume_24h.filter(|v| v.is_finite())?;
            let at = q
                .timestamp
                .or(usd.timestamp)
                .and_then(|ts| parse_datetime(&ts));
            Some((at, price, volume))
        })
        .collect();

    if points.len() < total {
        warn!("{}: dropped {} incomplete historical quotes", symbol, total - points.len());
    }

    // stable sort, `None` timestamps go last
    points.sort_by_key(|(at, _, _)| (at.is_none(), *at));

    let series = HistoricalSeries {
        prices: points.iter().map(|(_, p, _)| *p).collect(),
        volumes: points.iter().map(|(_, _, v)| *v).collect(),
    };
    if series.is_empty() {
        warn!("{}: no usable historical quotes", symbol);
        return None;
    }
    Some(series)
}
