use std::sync::Arc;

use candlewick::{ExchangeId, OhlcvError};
use candlewick_mock::MockExchange;

use crate::helpers::cw_with;

#[tokio::test]
async fn find_pairs_matches_base_and_multiplier_listings() {
    let bybit = Arc::new(MockExchange::new("bybit").with_markets([
        "ROOT/USDT",
        "ROOTS/USDT",
        "1000ROOT/USDT:USDT",
        "ETH/ROOT",
        "ETH/USDT",
    ]));
    let cw = cw_with(ExchangeId::Bybit, bybit, None);
    let pairs = cw.find_pairs("bybit", "ROOT").await.unwrap();
    assert_eq!(pairs, vec!["ROOT/USDT", "1000ROOT/USDT:USDT"]);
}

#[tokio::test]
async fn find_pairs_validates_exchange() {
    let cw = cw_with(ExchangeId::Bybit, Arc::new(MockExchange::new("bybit")), None);
    assert_eq!(
        cw.find_pairs("nope", "BTC").await.unwrap_err(),
        OhlcvError::unsupported_exchange("nope")
    );
    assert!(matches!(
        cw.find_pairs("okx", "BTC").await.unwrap_err(),
        OhlcvError::ClientNotRegistered { .. }
    ));
}
