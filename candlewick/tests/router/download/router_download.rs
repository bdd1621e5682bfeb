use std::sync::Arc;

use candlewick::{BasisSource, ExchangeId, OhlcvError, SpotPriceSource};
use candlewick_mock::{MockExchange, fixtures};
use chrono::Duration;

use crate::helpers::{DAY_END, DAY_START, approx, cw_with, krw_spot, upbit_krw_only};

#[tokio::test]
async fn usdt_pairs_keep_base_prices_exactly() {
    let binance = Arc::new(MockExchange::new("binance").with_series("ETH/USDT", fixtures::eth_usdt_5m()));
    let cw = cw_with(ExchangeId::Binance, binance.clone(), None);

    let report = cw
        .download()
        .exchange("binance")
        .pair("ETH/USDT")
        .period("2024-03-01T00:00:00Z", "2024-03-01T23:55:00Z")
        .input_granularity("5m")
        .output_granularity_seconds(3_600)
        .run()
        .await
        .unwrap();

    assert_eq!(report.conversion, BasisSource::Identity);
    assert!(report.warnings.is_empty());
    assert!(!report.is_degraded());
    assert_eq!(report.rows.len(), 24);
    for r in &report.rows {
        assert_eq!(r.exchange_name, "Binance");
        assert_eq!(r.quote_price_in_usdt, Some(1.0));
        assert_eq!(r.open_usdt, r.open);
        assert_eq!(r.close_usdt, r.close);
        assert_eq!(r.high_usdt, r.high);
        assert_eq!(r.low_usdt, r.low);
    }
    // Only the primary pair is fetched for USDT quotes.
    assert_eq!(binance.fetched_pairs().await, vec!["ETH/USDT"]);
}

#[tokio::test]
async fn hourly_rows_fold_into_four_hour_buckets() {
    let upbit = Arc::new(
        MockExchange::new("upbit")
            .with_series("BTC/KRW", fixtures::btc_krw_hourly())
            .with_series("KRW/USDT", fixtures::krw_usdt_hourly()),
    );
    let cw = cw_with(ExchangeId::Upbit, upbit, None);
    let report = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", Some(4 * 3_600))
        .await
        .unwrap();

    let source = fixtures::btc_krw_hourly();
    assert_eq!(report.rows.len(), 6);
    let first = &report.rows[0];
    assert_eq!(first.timestamp, fixtures::anchor().naive_utc());
    assert_eq!(first.open, Some(source[0].open));
    assert_eq!(first.close, Some(source[3].close));
    assert_eq!(first.high, Some(source[3].high));
    assert_eq!(first.low, Some(source[0].low));
    let vol: f64 = source[..4].iter().map(|c| c.volume_base).sum();
    assert!(approx(first.volume_base.unwrap(), vol));
    assert_eq!(report.missing_rows(), 0);
}

#[tokio::test]
async fn repeated_downloads_are_identical() {
    let upbit = upbit_krw_only();
    let spot: Arc<dyn SpotPriceSource> = krw_spot();
    let cw = cw_with(ExchangeId::Upbit, upbit, Some(spot));

    let a = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", Some(7_200))
        .await
        .unwrap();
    let b = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", Some(7_200))
        .await
        .unwrap();
    assert_eq!(a, b);

    let mut csv_a = Vec::new();
    let mut csv_b = Vec::new();
    candlewick::write_csv(&a.rows, &mut csv_a).unwrap();
    candlewick::write_csv(&b.rows, &mut csv_b).unwrap();
    assert_eq!(csv_a, csv_b);
}

#[tokio::test]
async fn empty_first_page_is_no_data_and_skips_conversion() {
    let upbit = Arc::new(MockExchange::new("upbit").with_series("USDT/KRW", fixtures::usdt_krw_hourly()));
    let spot = krw_spot();
    let cw = cw_with(ExchangeId::Upbit, upbit.clone(), Some(spot.clone()));

    let err = cw
        .download_ohlcv("upbit", "DOGE/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OhlcvError::NoDataForPeriod {
            pair: "DOGE/KRW".into()
        }
    );
    assert_eq!(upbit.fetched_pairs().await, vec!["DOGE/KRW"]);
    assert_eq!(spot.calls().await, 0);
}

#[tokio::test]
async fn untraded_pair_is_no_data() {
    let upbit = Arc::new(MockExchange::new("upbit").with_series("XYZ/KRW", fixtures::untraded_hourly(10.0)));
    let cw = cw_with(ExchangeId::Upbit, upbit, None);
    let err = cw
        .download_ohlcv("upbit", "XYZ/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap_err();
    assert!(matches!(err, OhlcvError::NoDataForPeriod { .. }));
}

#[tokio::test]
async fn window_is_inclusive_and_duplicates_collapse() {
    let mut rows = fixtures::btc_krw_hourly();
    let mut dup = rows[3];
    dup.close += 1.0;
    rows.push(dup);
    let upbit = Arc::new(MockExchange::new("upbit").with_series("BTC/USDT", rows));
    let cw = cw_with(ExchangeId::Upbit, upbit, None);

    let start = fixtures::anchor() + Duration::hours(2);
    let end = fixtures::anchor() + Duration::hours(5);
    let report = cw
        .download_ohlcv(
            "upbit",
            "BTC/USDT",
            &start.to_rfc3339(),
            &end.to_rfc3339(),
            "1h",
            None,
        )
        .await
        .unwrap();
    assert_eq!(report.rows.len(), 4);
    assert_eq!(report.rows[0].timestamp, start.naive_utc());
    assert_eq!(report.rows[3].timestamp, end.naive_utc());
    assert!(report.rows.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
async fn gaps_surface_as_missing_rows() {
    let rows: Vec<_> = fixtures::btc_krw_hourly()
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !(5..8).contains(i))
        .map(|(_, r)| r)
        .collect();
    let upbit = Arc::new(MockExchange::new("upbit").with_series("BTC/USDT", rows));
    let cw = cw_with(ExchangeId::Upbit, upbit, None);
    let report = cw
        .download_ohlcv("upbit", "BTC/USDT", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();
    assert_eq!(report.rows.len(), 24);
    assert_eq!(report.missing_rows(), 3);
    let gap = &report.rows[6];
    assert_eq!(gap.pair, "BTC/USDT");
    assert_eq!(gap.exchange_name, "Upbit");
    assert!(gap.volume_base.is_none());
    assert!(gap.open_usdt.is_none());
}

#[tokio::test]
async fn zero_fill_applies_to_empty_bucket_volumes() {
    let rows: Vec<_> = fixtures::btc_krw_hourly()
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != 10)
        .map(|(_, r)| r)
        .collect();
    let upbit = Arc::new(MockExchange::new("upbit").with_series("BTC/USDT", rows));
    let cw = crate::helpers::fast_builder()
        .with_client(ExchangeId::Upbit, upbit)
        .zero_fill_empty_volume(true)
        .build()
        .unwrap();
    let report = cw
        .download_ohlcv("upbit", "BTC/USDT", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();
    assert_eq!(report.rows[10].volume_base, Some(0.0));
    assert_eq!(report.rows[10].volume_usdt, Some(0.0));
    assert!(report.rows[10].close.is_none());
}

#[tokio::test]
async fn derivative_pairs_strip_settle_for_conversion() {
    let binance = Arc::new(
        MockExchange::new("binance").with_series("EDU/USDT:USDT", fixtures::usdt_krw_hourly()),
    );
    let cw = cw_with(ExchangeId::Binance, binance.clone(), None);
    let report = cw
        .download_ohlcv("binance", "EDU/USDT:USDT", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();
    assert_eq!(report.conversion, BasisSource::Identity);
    // A USDT-settled quote needs no conversion market.
    assert_eq!(binance.fetched_pairs().await, vec!["EDU/USDT:USDT"]);
    let r = &report.rows[0];
    assert_eq!(r.pair, "EDU/USDT:USDT");
    assert_eq!(r.base, "EDU");
    assert_eq!(r.quote, "USDT");
    assert_eq!(r.open_usdt, r.open);
}

#[tokio::test]
async fn markets_load_once_per_download() {
    let upbit = Arc::new(MockExchange::new("upbit").with_series("BTC/USDT", fixtures::btc_krw_hourly()));
    let cw = cw_with(ExchangeId::Upbit, upbit.clone(), None);
    cw.download_ohlcv("upbit", "BTC/USDT", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();
    assert_eq!(upbit.market_loads().await, 1);
}

#[tokio::test]
async fn client_failures_are_tagged_and_fatal() {
    let upbit = Arc::new(
        MockExchange::new("upbit").failing("BTC/USDT", OhlcvError::Transport("reset".into())),
    );
    let cw = cw_with(ExchangeId::Upbit, upbit, None);
    let err = cw
        .download_ohlcv("upbit", "BTC/USDT", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap_err();
    match err {
        OhlcvError::Connector { connector, msg } => {
            assert_eq!(connector, "upbit");
            assert!(msg.contains("reset"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let broken = Arc::new(
        MockExchange::new("upbit").failing_markets(OhlcvError::connector("upbit", "maintenance")),
    );
    let cw = cw_with(ExchangeId::Upbit, broken.clone(), None);
    let err = cw
        .download_ohlcv("upbit", "BTC/USDT", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap_err();
    assert_eq!(err, OhlcvError::connector("upbit", "maintenance"));
    assert!(broken.fetch_calls().await.is_empty());
}
