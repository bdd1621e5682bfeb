use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{NormalizedRow, NumericColumn, OhlcvError, OutputBucket, ResampleRules, RowIdentity};

/// Start (epoch seconds) of the left-closed bucket of width `step` containing `ts`.
#[must_use]
pub const fn bucket_start(ts: i64, step: i64) -> i64 {
    ts - ts.rem_euclid(step)
}

/// Bucket normalized rows into fixed-width, epoch-aligned output candles.
///
/// - Buckets are left-closed and left-labeled: `[b, b + output_seconds)` where
///   `b` is a multiple of `output_seconds` since 1970-01-01 UTC.
/// - Numeric columns follow `rules`; identity columns take the last row's value.
/// - Every bucket between the first and last populated one is emitted. Empty
///   buckets carry `identity` and have every numeric column missing, volumes
///   included unless `zero_fill_empty_volume` is set.
/// - Output `timestamp` is the naive UTC wall-clock bucket start.
///
/// # Errors
/// Returns `Err(OhlcvError::InvalidArg)` if `output_seconds` is not positive and
/// `Err(OhlcvError::Data)` if a bucket start is out of chrono's range.
///
/// ```
/// use candlewick_core::timeseries::resample::resample;
/// use candlewick_core::{NormalizedRow, ResampleRules, RowIdentity};
/// use chrono::{DateTime, Utc};
///
/// let identity = RowIdentity {
///     exchange_name: "Binance".into(),
///     pair: "BTC/USDT".into(),
///     base: "BTC".into(),
///     quote: "USDT".into(),
/// };
/// let row = |ts: i64, price: f64| NormalizedRow {
///     exchange_name: "Binance".into(),
///     pair: "BTC/USDT".into(),
///     base: "BTC".into(),
///     quote: "USDT".into(),
///     open_time: DateTime::<Utc>::from_timestamp(ts, 0).unwrap(),
///     average_price: price,
///     open: price,
///     close: price,
///     high: price,
///     low: price,
///     volume_base: 1.0,
///     quote_price_in_usdt: 1.0,
///     average_price_usdt: price,
///     open_usdt: price,
///     close_usdt: price,
///     high_usdt: price,
///     low_usdt: price,
///     volume_usdt: price,
/// };
/// // Hours 0 and 2 populated, hour 1 synthesized as an empty bucket.
/// let out = resample(
///     &[row(0, 1.0), row(7_200, 2.0)],
///     3_600,
///     &identity,
///     &ResampleRules::default(),
///     false,
/// )
/// .unwrap();
/// assert_eq!(out.len(), 3);
/// assert_eq!(out[1].open, None);
/// assert_eq!(out[1].volume_base, None);
/// assert_eq!(out[1].pair, "BTC/USDT");
/// ```
pub fn resample(
    rows: &[NormalizedRow],
    output_seconds: i64,
    identity: &RowIdentity,
    rules: &ResampleRules,
    zero_fill_empty_volume: bool,
) -> Result<Vec<OutputBucket>, OhlcvError> {
    if output_seconds <= 0 {
        return Err(OhlcvError::InvalidArg(format!(
            "output granularity must be positive, got {output_seconds}s"
        )));
    }

    let mut sorted: Vec<&NormalizedRow> = rows.iter().collect();
    sorted.sort_by_key(|r| r.open_time);

    let mut groups: BTreeMap<i64, Vec<&NormalizedRow>> = BTreeMap::new();
    for r in sorted {
        groups
            .entry(bucket_start(r.open_time.timestamp(), output_seconds))
            .or_default()
            .push(r);
    }

    let (Some(&first), Some(&last)) = (groups.keys().next(), groups.keys().next_back()) else {
        return Ok(Vec::new());
    };

    let mut out: Vec<OutputBucket> = Vec::new();
    let mut cur = first;
    while cur <= last {
        let bucket = match groups.get(&cur) {
            Some(members) => aggregate_bucket(cur, members, rules)?,
            None => empty_bucket(cur, identity, zero_fill_empty_volume)?,
        };
        out.push(bucket);
        cur += output_seconds;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        buckets = out.len(),
        populated = groups.len(),
        output_seconds,
        "resampled rows"
    );

    Ok(out)
}

fn naive_start(start: i64) -> Result<chrono::NaiveDateTime, OhlcvError> {
    DateTime::<Utc>::from_timestamp(start, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| OhlcvError::Data(format!("bucket start {start} out of range")))
}

fn blank_bucket(start: i64, identity: RowIdentity) -> Result<OutputBucket, OhlcvError> {
    Ok(OutputBucket {
        exchange_name: identity.exchange_name,
        pair: identity.pair,
        base: identity.base,
        quote: identity.quote,
        average_price: None,
        open: None,
        close: None,
        high: None,
        low: None,
        volume_base: None,
        quote_price_in_usdt: None,
        average_price_usdt: None,
        open_usdt: None,
        close_usdt: None,
        high_usdt: None,
        low_usdt: None,
        volume_usdt: None,
        timestamp: naive_start(start)?,
    })
}

fn aggregate_bucket(
    start: i64,
    members: &[&NormalizedRow],
    rules: &ResampleRules,
) -> Result<OutputBucket, OhlcvError> {
    // Groups are never empty; the identity of the last row labels the bucket.
    let last = members
        .last()
        .ok_or_else(|| OhlcvError::Data(format!("empty group at {start}")))?;
    let identity = RowIdentity {
        exchange_name: last.exchange_name.clone(),
        pair: last.pair.clone(),
        base: last.base.clone(),
        quote: last.quote.clone(),
    };
    let mut bucket = blank_bucket(start, identity)?;
    let mut values: Vec<f64> = Vec::with_capacity(members.len());
    for col in NumericColumn::ALL {
        values.clear();
        values.extend(members.iter().map(|r| col.value(r)));
        col.set(&mut bucket, rules.get(col).apply(&values));
    }
    Ok(bucket)
}

fn empty_bucket(
    start: i64,
    identity: &RowIdentity,
    zero_fill_empty_volume: bool,
) -> Result<OutputBucket, OhlcvError> {
    let mut bucket = blank_bucket(start, identity.clone())?;
    if zero_fill_empty_volume {
        for col in NumericColumn::ALL.into_iter().filter(|c| c.is_volume()) {
            col.set(&mut bucket, Some(0.0));
        }
    }
    Ok(bucket)
}
