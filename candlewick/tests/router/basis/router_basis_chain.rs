use std::sync::Arc;

use candlewick::{BasisSource, BasisTolerance, ExchangeId, OhlcvError, SpotPriceSource};
use candlewick_mock::{MockExchange, fixtures};

use crate::helpers::{DAY_END, DAY_START, approx, cw_with, fast_builder, krw_spot, upbit_krw_only};

#[tokio::test]
async fn inverse_pair_wins_over_spot_when_direct_fails() {
    let upbit = Arc::new(
        MockExchange::new("upbit")
            .with_series("BTC/KRW", fixtures::btc_krw_hourly())
            .with_series("USDT/KRW", fixtures::usdt_krw_hourly())
            .failing("KRW/USDT", OhlcvError::connector("upbit", "bad symbol"))
            .with_markets(["BTC/KRW", "KRW/USDT", "USDT/KRW"]),
    );
    let spot = krw_spot();
    let cw = cw_with(ExchangeId::Upbit, upbit.clone(), Some(spot.clone()));

    let report = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();

    assert_eq!(
        report.conversion,
        BasisSource::Inverse {
            pair: "USDT/KRW".into()
        }
    );
    assert!(!report.is_degraded());
    assert_eq!(spot.calls().await, 0);
    assert_eq!(
        upbit.fetched_pairs().await,
        vec!["BTC/KRW", "KRW/USDT", "USDT/KRW"]
    );
    assert_eq!(report.warnings, vec![OhlcvError::connector("upbit", "bad symbol")]);

    let usdt_krw = fixtures::usdt_krw_hourly();
    for (row, quote) in report.rows.iter().zip(&usdt_krw) {
        let rate = 1.0 / ((quote.high + quote.low) / 2.0);
        assert!(approx(row.quote_price_in_usdt.unwrap(), rate));
        assert!(approx(row.close_usdt.unwrap(), row.close.unwrap() * rate));
    }
}

#[tokio::test]
async fn direct_pair_is_tried_first() {
    let upbit = Arc::new(
        MockExchange::new("upbit")
            .with_series("BTC/KRW", fixtures::btc_krw_hourly())
            .with_series("KRW/USDT", fixtures::krw_usdt_hourly())
            .with_series("USDT/KRW", fixtures::usdt_krw_hourly()),
    );
    let cw = cw_with(ExchangeId::Upbit, upbit.clone(), None);
    let report = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();
    assert_eq!(
        report.conversion,
        BasisSource::Direct {
            pair: "KRW/USDT".into()
        }
    );
    assert!(report.warnings.is_empty());
    assert!(!upbit.fetched_pairs().await.contains(&"USDT/KRW".to_string()));
}

#[tokio::test]
async fn krw_without_markets_uses_spot_price_uniformly() {
    let spot: Arc<dyn SpotPriceSource> = <dyn SpotPriceSource>::from_fn(|quote| {
        assert_eq!(quote, "KRW");
        Ok(1_350.0)
    });
    let cw = cw_with(ExchangeId::Upbit, upbit_krw_only(), Some(spot));
    let report = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();

    assert!(report.is_degraded());
    let rate = 1.0 / 1_350.0;
    assert_eq!(
        report.conversion,
        BasisSource::Spot {
            quote_price_in_usdt: rate
        }
    );
    assert_eq!(report.rows.len(), 24);
    for r in &report.rows {
        assert_eq!(r.quote_price_in_usdt, Some(rate));
        assert!(approx(r.open_usdt.unwrap(), r.open.unwrap() * rate));
    }
    // Neither USDT market is listed, so both steps were skipped with a warning.
    assert_eq!(report.warnings.len(), 2);
}

#[tokio::test]
async fn exhausted_chain_without_spot_source_is_terminal() {
    let cw = cw_with(ExchangeId::Upbit, upbit_krw_only(), None);
    let err = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap_err();
    assert!(matches!(err, OhlcvError::QuoteConversionUnavailable { quote, .. } if quote == "KRW"));
}

#[tokio::test]
async fn sparse_direct_series_falls_through_under_tolerance() {
    // KRW/USDT only covers the first six hours of the day.
    let sparse: Vec<_> = fixtures::krw_usdt_hourly().into_iter().take(6).collect();
    let upbit = Arc::new(
        MockExchange::new("upbit")
            .with_series("BTC/KRW", fixtures::btc_krw_hourly())
            .with_series("KRW/USDT", sparse.clone())
            .with_series("USDT/KRW", fixtures::usdt_krw_hourly()),
    );
    let cw = fast_builder()
        .with_client(ExchangeId::Upbit, upbit)
        .basis_tolerance(BasisTolerance::Candles(2))
        .build()
        .unwrap();
    let report = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();
    assert_eq!(
        report.conversion,
        BasisSource::Inverse {
            pair: "USDT/KRW".into()
        }
    );
    assert!(matches!(&report.warnings[..], [OhlcvError::Data(msg)] if msg.contains("KRW/USDT")));

    // Unbounded tolerance accepts the far-away points instead.
    let upbit = Arc::new(
        MockExchange::new("upbit")
            .with_series("BTC/KRW", fixtures::btc_krw_hourly())
            .with_series("KRW/USDT", sparse),
    );
    let cw = fast_builder()
        .with_client(ExchangeId::Upbit, upbit)
        .basis_tolerance(BasisTolerance::Unbounded)
        .build()
        .unwrap();
    let report = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();
    assert_eq!(
        report.conversion,
        BasisSource::Direct {
            pair: "KRW/USDT".into()
        }
    );
}

#[tokio::test]
async fn misaligned_quote_grid_uses_nearest_point() {
    // Quote candles sit 20 minutes after every primary candle.
    let shifted: Vec<_> = fixtures::usdt_krw_hourly()
        .into_iter()
        .map(|mut c| {
            c.open_time += chrono::Duration::minutes(20);
            c
        })
        .collect();
    let upbit = Arc::new(
        MockExchange::new("upbit")
            .with_series("BTC/KRW", fixtures::btc_krw_hourly())
            .with_series("USDT/KRW", shifted.clone()),
    );
    let cw = cw_with(ExchangeId::Upbit, upbit, None);
    let report = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();
    // Hour 0 has no earlier neighbour, so it takes the 00:20 point.
    let want = 1.0 / ((shifted[0].high + shifted[0].low) / 2.0);
    assert!(approx(report.rows[0].quote_price_in_usdt.unwrap(), want));
    // Hour 5 is 40 minutes after 04:20 and 20 minutes before 05:20.
    let want = 1.0 / ((shifted[5].high + shifted[5].low) / 2.0);
    assert!(approx(report.rows[5].quote_price_in_usdt.unwrap(), want));
}

/// USDT/KRW with hours 10..=15 missing, as on a book that skips untraded candles.
fn gapped_usdt_krw() -> Vec<candlewick::CandleRow> {
    fixtures::usdt_krw_hourly()
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !(10..=15).contains(i))
        .map(|(_, c)| c)
        .collect()
}

#[tokio::test]
async fn gapped_quote_market_keeps_historical_basis_by_default() {
    let upbit = Arc::new(
        MockExchange::new("upbit")
            .with_series("BTC/KRW", fixtures::btc_krw_hourly())
            .with_series("USDT/KRW", gapped_usdt_krw()),
    );
    let spot = krw_spot();
    let cw = cw_with(ExchangeId::Upbit, upbit, Some(spot.clone()));
    let report = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();

    assert_eq!(
        report.conversion,
        BasisSource::Inverse {
            pair: "USDT/KRW".into()
        }
    );
    assert!(!report.is_degraded());
    assert_eq!(spot.calls().await, 0);
    // Only the unlisted direct market is reported.
    assert!(matches!(&report.warnings[..], [OhlcvError::Data(msg)] if msg.contains("KRW/USDT")));
    assert_eq!(report.rows.len(), 24);

    // Rows inside the gap take the nearest surviving quote candle.
    let quotes = fixtures::usdt_krw_hourly();
    let rate = |i: usize| 1.0 / ((quotes[i].high + quotes[i].low) / 2.0);
    assert!(approx(report.rows[10].quote_price_in_usdt.unwrap(), rate(9)));
    assert!(approx(report.rows[12].quote_price_in_usdt.unwrap(), rate(9)));
    assert!(approx(report.rows[13].quote_price_in_usdt.unwrap(), rate(16)));
    assert!(approx(report.rows[20].quote_price_in_usdt.unwrap(), rate(20)));
}

#[tokio::test]
async fn gapped_quote_market_falls_to_spot_under_explicit_bound() {
    let upbit = Arc::new(
        MockExchange::new("upbit")
            .with_series("BTC/KRW", fixtures::btc_krw_hourly())
            .with_series("USDT/KRW", gapped_usdt_krw()),
    );
    let cw = fast_builder()
        .with_client(ExchangeId::Upbit, upbit)
        .spot_source(krw_spot())
        .basis_tolerance(BasisTolerance::Candles(2))
        .build()
        .unwrap();
    let report = cw
        .download_ohlcv("upbit", "BTC/KRW", DAY_START, DAY_END, "1h", None)
        .await
        .unwrap();

    assert!(report.is_degraded());
    assert!(report.warnings.iter().any(|w| matches!(
        w,
        OhlcvError::Data(msg) if msg.contains("USDT/KRW has no price within tolerance")
    )));
}
