use crate::model::{PriceAction, Trend, VolumeAnalysis};

/// Compares the latest volume against the series mean.
///
/// An empty series or a zero mean carries no signal: ratio 1, no increase.
pub fn analyze_volume(volumes: &[f64]) -> VolumeAnalysis {
    let no_signal = VolumeAnalysis {
        volume_increase: false,
        volume_ratio: 1.0,
    };

    let Some(&recent) = volumes.last() else {
        return no_signal;
    };
    let avg = volumes.iter().sum::<f64>() / volumes.len() as f64;
    let ratio = recent / avg;
    if avg == 0.0 || !ratio.is_finite() {
        return no_signal;
    }

    VolumeAnalysis {
        volume_increase: recent > avg,
        volume_ratio: ratio,
    }
}

pub fn analyze_price_action(prices: &[f64]) -> PriceAction {
    PriceAction {
        price_change: percent_change(prices).unwrap_or(0.0),
        trend: identify_trend(prices),
    }
}

/// Direction and size of the move from the first to the last price.
pub fn identify_trend(prices: &[f64]) -> Trend {
    if prices.len() < 2 {
        return Trend::default();
    }
    match percent_change(prices) {
        Some(change) => Trend {
            is_uptrend: change > 0.0,
            strength: change.abs(),
        },
        None => Trend::default(),
    }
}

/// `(last - first) / first * 100`, `None` when undefined.
fn percent_change(prices: &[f64]) -> Option<f64> {
    let (&first, &last) = (prices.first()?, prices.last()?);
    if first == 0.0 {
        return None;
    }
    let change = (last - first) / first * 100.0;
    change.is_finite().then_some(change)
}
