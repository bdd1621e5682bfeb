use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Find the series point nearest to `ts`.
///
/// An exact key wins. Otherwise the neighbours on both sides are compared by
/// absolute distance, the earlier one winning a tie. Points further than
/// `max_distance_seconds` are rejected; `None` accepts any distance.
#[must_use]
pub fn nearest(
    series: &BTreeMap<DateTime<Utc>, f64>,
    ts: DateTime<Utc>,
    max_distance_seconds: Option<i64>,
) -> Option<(DateTime<Utc>, f64)> {
    if let Some(v) = series.get(&ts) {
        return Some((ts, *v));
    }
    let before = series.range(..ts).next_back();
    let after = series.range(ts..).next();
    let best = match (before, after) {
        (Some((bt, bv)), Some((at, av))) => {
            if (ts - *bt) <= (*at - ts) {
                (*bt, *bv)
            } else {
                (*at, *av)
            }
        }
        (Some((bt, bv)), None) => (*bt, *bv),
        (None, Some((at, av))) => (*at, *av),
        (None, None) => return None,
    };
    match max_distance_seconds {
        Some(max) if (best.0 - ts).num_seconds().abs() > max => None,
        _ => Some(best),
    }
}
