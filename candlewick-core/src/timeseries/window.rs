use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::CandleRow;

/// Keep candles whose `open_time` falls in `[start, end]` and drop duplicate
/// timestamps.
///
/// - The first appearance of a timestamp wins; later pages overlapping the
///   same instant are discarded.
/// - Output is sorted by `open_time`, so timestamps are strictly increasing.
#[must_use]
pub fn clip_and_dedup(
    candles: Vec<CandleRow>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<CandleRow> {
    let mut map: BTreeMap<DateTime<Utc>, CandleRow> = BTreeMap::new();
    for c in candles {
        if c.open_time < start || c.open_time > end {
            continue;
        }
        map.entry(c.open_time).or_insert(c);
    }
    map.into_values().collect()
}

/// Sum of base volume across a candle series.
#[must_use]
pub fn total_volume(candles: &[CandleRow]) -> f64 {
    candles.iter().map(|c| c.volume_base).sum()
}
