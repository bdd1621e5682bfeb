use candlewick_core::CandleRow;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// 2024-03-01T00:00:00Z, the first open time of every canned series.
#[must_use]
pub fn anchor() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |dt| dt.and_utc())
}

/// Build one candle.
#[must_use]
pub const fn candle(
    open_time: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume_base: f64,
) -> CandleRow {
    CandleRow {
        open_time,
        open,
        high,
        low,
        close,
        volume_base,
    }
}

/// `n` candles every `step_seconds` from `start`, priced by `price(i)` with a
/// symmetric `spread` around it and `volume(i)` base volume.
pub fn series(
    start: DateTime<Utc>,
    step_seconds: i64,
    n: u32,
    spread: f64,
    price: impl Fn(u32) -> f64,
    volume: impl Fn(u32) -> f64,
) -> Vec<CandleRow> {
    (0..n)
        .map(|i| {
            let p = price(i);
            candle(
                start + Duration::seconds(step_seconds * i64::from(i)),
                p,
                p + spread,
                p - spread,
                p,
                volume(i),
            )
        })
        .collect()
}

/// 24 hourly BTC/KRW candles on a steady uptrend.
#[must_use]
pub fn btc_krw_hourly() -> Vec<CandleRow> {
    (0..24u32)
        .map(|i| {
            let open = 85_000_000.0 + 100_000.0 * f64::from(i);
            let close = open + 100_000.0;
            candle(
                anchor() + Duration::hours(i64::from(i)),
                open,
                close + 50_000.0,
                open - 50_000.0,
                close,
                1.5 + 0.1 * f64::from(i),
            )
        })
        .collect()
}

/// 24 hourly USDT/KRW candles around 1,350 KRW per USDT.
#[must_use]
pub fn usdt_krw_hourly() -> Vec<CandleRow> {
    series(anchor(), 3_600, 24, 1.0, |i| 1_350.0 + f64::from(i % 4), |_| 250_000.0)
}

/// 24 hourly KRW/USDT candles, the reciprocal market.
#[must_use]
pub fn krw_usdt_hourly() -> Vec<CandleRow> {
    series(anchor(), 3_600, 24, 0.0, |_| 1.0 / 1_350.0, |_| 1.0e9)
}

/// One day of 5-minute ETH/USDT candles.
#[must_use]
pub fn eth_usdt_5m() -> Vec<CandleRow> {
    series(
        anchor(),
        300,
        288,
        2.5,
        |i| 3_400.0 + f64::from(i % 12),
        |i| 10.0 + f64::from(i % 5),
    )
}

/// 24 hourly candles that never traded.
#[must_use]
pub fn untraded_hourly(price: f64) -> Vec<CandleRow> {
    series(anchor(), 3_600, 24, 0.0, |_| price, |_| 0.0)
}
