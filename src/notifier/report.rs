use crate::model::{AssetOutcome, ScoredAsset};
use chrono::NaiveDate;
use std::fmt::Write;

/// Telegram rejects messages longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

const DISCLAIMER: &str = "Note: This is an automated analysis based on technical indicators. \
Always do your own research before making investment decisions.";

/// Successful potential opportunities scoring at least `min_score`, best first.
pub fn select_opportunities(outcomes: &[AssetOutcome], min_score: f64) -> Vec<&ScoredAsset> {
    let mut selected: Vec<&ScoredAsset> = outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().ok())
        .filter(|asset| {
            asset.potential_gain.is_potential && asset.potential_gain.score >= min_score
        })
        .collect();
    selected.sort_by(|a, b| b.potential_gain.score.total_cmp(&a.potential_gain.score));
    selected
}

/// Plain-text report, `None` when there is nothing to report.
pub fn format_report(date: NaiveDate, assets: &[&ScoredAsset]) -> Option<String> {
    if assets.is_empty() {
        return None;
    }

    let mut report = format!(
        "📈 Crypto Trading Opportunities - {}\n\
         Here are today's most promising cryptocurrencies based on technical analysis:",
        date.format("%Y-%m-%d")
    );
    for asset in assets {
        report.push_str("\n\n");
        report.push_str(&format_asset(asset));
    }
    report.push_str("\n\n");
    report.push_str(DISCLAIMER);
    Some(report)
}

fn format_asset(asset: &ScoredAsset) -> String {
    let s = &asset.snapshot;
    let gain = &asset.potential_gain;
    let mut block = format!(
        "{} ({})\n💰 Price: ${:.4}\n🏦 Market Cap: ${:.2}M\n\
         ⭐ Score: {:.2}/10 (confidence {:.0}%)",
        s.symbol,
        s.name,
        s.price,
        s.market_cap / 1_000_000.0,
        gain.score,
        gain.reliability.confidence
    );
    for reason in &gain.reasons {
        // writing to a String cannot fail
        let _ = write!(block, "\n• {}", reason);
    }
    block
}

/// Splits `text` into messages of at most `max_chars` characters, preferring the blank
/// lines between report blocks as cut points.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = String::new();

    for block in text.split("\n\n") {
        let joined_len = current.chars().count() + 2 + block.chars().count();
        if !current.is_empty() && joined_len > max_chars {
            messages.push(std::mem::take(&mut current));
        }

        if block.chars().count() > max_chars {
            let chars: Vec<char> = block.chars().collect();
            for chunk in chars.chunks(max_chars.max(1)) {
                if !current.is_empty() {
                    messages.push(std::mem::take(&mut current));
                }
                current = chunk.iter().collect();
            }
            continue;
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(block);
    }

    if !current.is_empty() {
        messages.push(current);
    }
    messages
}
