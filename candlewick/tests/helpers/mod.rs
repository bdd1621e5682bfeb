// Shared fixtures so tests can `use crate::helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use candlewick::{BackoffConfig, Candlewick, CandlewickBuilder, ExchangeId, SpotPriceSource};
use candlewick_mock::MockExchange;

pub use candlewick_mock::{ScriptedSpot, fixtures};

/// Window covering the 24 hourly fixture candles.
pub const DAY_START: &str = "2024-03-01 00:00:00+00:00";
pub const DAY_END: &str = "2024-03-01 23:00:00+00:00";

/// Builder with no page delay and a 1 ms spot backoff.
pub fn fast_builder() -> CandlewickBuilder {
    Candlewick::builder()
        .page_delay(Duration::ZERO)
        .spot_backoff(BackoffConfig {
            min_backoff_ms: 1,
            max_backoff_ms: 1,
            factor: 1,
            jitter_percent: 0,
        })
}

/// Orchestrator over a single exchange, optionally with a spot source.
pub fn cw_with(
    exchange: ExchangeId,
    client: Arc<MockExchange>,
    spot: Option<Arc<dyn SpotPriceSource>>,
) -> Candlewick {
    let mut b = fast_builder().with_client(exchange, client);
    if let Some(s) = spot {
        b = b.spot_source(s);
    }
    b.build().unwrap()
}

/// Upbit mock with BTC/KRW only; no USDT market in either direction.
pub fn upbit_krw_only() -> Arc<MockExchange> {
    Arc::new(MockExchange::new("upbit").with_series("BTC/KRW", fixtures::btc_krw_hourly()))
}

/// Spot source answering 1,350 KRW per USDT.
pub fn krw_spot() -> Arc<ScriptedSpot> {
    Arc::new(ScriptedSpot::fixed(1_350.0))
}

/// Compare floats with a relative tolerance.
pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
