use crate::model::MacdResult;

/// RSI reported when the series is too short to say anything.
pub const NEUTRAL_RSI: f64 = 50.0;

pub struct MarketAnalyzer;

impl MarketAnalyzer {
    /// Wilder RSI of the last price in `prices` (oldest first).
    ///
    /// The first average gain/loss is the simple mean over `period` price changes, every
    /// later change is folded in with Wilder smoothing. `period` changes need `period + 1`
    /// prices; anything shorter gives [`NEUTRAL_RSI`].
    pub fn compute_rsi(prices: &[f64], period: usize) -> f64 {
        if period == 0 || prices.len() <= period {
            return NEUTRAL_RSI;
        }

        let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
        let (seed, rest) = changes.split_at(period);
        let n = period as f64;

        let mut avg_gain = seed.iter().map(|&c| c.max(0.0)).sum::<f64>() / n;
        let mut avg_loss = seed.iter().map(|&c| (-c).max(0.0)).sum::<f64>() / n;

        for &change in rest {
            avg_gain = (avg_gain * (n - 1.0) + change.max(0.0)) / n;
            avg_loss = (avg_loss * (n - 1.0) + (-change).max(0.0)) / n;
        }

        if avg_loss == 0.0 {
            return 100.0;
        }

        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }

    /// Exponential moving average with factor `2 / (period + 1)`, seeded with the simple
    /// mean of the first `period` values.
    ///
    /// Element `i` of the result belongs to `data[i + period - 1]`. Empty when `data` holds
    /// fewer than `period` values.
    pub fn exponential_moving_average(data: &[f64], period: usize) -> Vec<f64> {
        if period == 0 || data.len() < period {
            return Vec::new();
        }

        let k = 2.0 / (period as f64 + 1.0);
        let seed = Self::moving_average(&data[..period], period)[0];

        let mut result = Vec::with_capacity(data.len() - period + 1);
        result.push(seed);
        let mut prev = seed;
        for &value in &data[period..] {
            prev = value * k + prev * (1.0 - k);
            result.push(prev);
        }
        result
    }

    /// MACD of the last price: `EMA(fast) - EMA(slow)`, its EMA(`signal`) and the histogram.
    ///
    /// All zero while `prices` is shorter than `slow`. When the MACD line is still too short
    /// to seed the signal EMA the signal is 0.
    pub fn compute_macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> MacdResult {
        if fast == 0 || slow == 0 || prices.len() < slow {
            return MacdResult::default();
        }

        let fast_ema = Self::exponential_moving_average(prices, fast);
        let slow_ema = Self::exponential_moving_average(prices, slow);

        // Both lines end at the last price; align them on their tails.
        let n = fast_ema.len().min(slow_ema.len());
        let macd_line: Vec<f64> = fast_ema[fast_ema.len() - n..]
            .iter()
            .zip(&slow_ema[slow_ema.len() - n..])
            .map(|(f, s)| f - s)
            .collect();

        let Some(&macd) = macd_line.last() else {
            return MacdResult::default();
        };
        let signal = Self::exponential_moving_average(&macd_line, signal)
            .last()
            .copied()
            .unwrap_or(0.0);

        MacdResult {
            macd,
            signal,
            histogram: macd - signal,
        }
    }

    /// Calculates the moving average of a slice of data with the given window size.
    pub fn moving_average(data: &[f64], window_size: usize) -> Vec<f64> {
        if window_size == 0 || data.len() < window_size {
            return Vec::new();
        }
        data.windows(window_size)
            .map(|window| window.iter().sum::<f64>() / window_size as f64)
            .collect()
    }
}
