use std::sync::Arc;

use candlewick::SpotPriceSource;
use candlewick_mock::{MockExchange, fixtures};

/// Upbit stand-in serving BTC/KRW only, so KRW conversion needs the spot step.
#[must_use]
pub fn upbit() -> Arc<MockExchange> {
    Arc::new(
        MockExchange::new("upbit")
            .with_series("BTC/KRW", fixtures::btc_krw_hourly())
            .with_markets(["BTC/KRW", "1000BTC/KRW", "ETH/KRW"]),
    )
}

#[must_use]
pub fn spot_source() -> Arc<dyn SpotPriceSource> {
    if std::env::var("CANDLEWICK_EXAMPLES_LIVE_SPOT").is_ok() {
        Arc::new(candlewick_coingecko::CoinGeckoSpot::new())
    } else {
        println!("--- (Using scripted spot price 1350 KRW/USDT) ---");
        Arc::new(candlewick_mock::ScriptedSpot::fixed(1_350.0))
    }
}
