//! Candlewick downloads OHLCV candles from crypto exchanges, re-expresses them
//! in USDT and resamples them into fixed-width, epoch-aligned buckets.
//!
//! Overview
//! - Validates the exchange, granularities, pair and window against a static
//!   capability table before any network call.
//! - Pages through the exchange's history with a configurable inter-page delay,
//!   then clips to the inclusive window and drops duplicate timestamps.
//! - Resolves a USDT basis for the quote currency: identity for USDT, then the
//!   `{QUOTE}/USDT` market, then `USDT/{QUOTE}` inverted, then an external spot
//!   price. The spot step is a degraded mode and is flagged on the report.
//! - Resamples with per-column rules (mean, first, last, max, min, sum) and
//!   emits empty buckets for gaps so the time axis stays continuous.
//!
//! Exchange connectivity is supplied by the caller through
//! [`ConnectivityClient`](candlewick_core::connector::ConnectivityClient);
//! `candlewick-mock` ships a fixture-backed one.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use candlewick::{Candlewick, ExchangeId};
//!
//! let cw = Candlewick::builder()
//!     .with_client(ExchangeId::Upbit, Arc::new(upbit_client))
//!     .spot_source(Arc::new(candlewick_coingecko::CoinGeckoSpot::new()))
//!     .build()?;
//!
//! let report = cw
//!     .download()
//!     .exchange("upbit")
//!     .pair("BTC/KRW")
//!     .period("2024-03-01 00:00:00+00:00", "2024-03-02 00:00:00+00:00")
//!     .input_granularity("1h")
//!     .output_granularity_seconds(4 * 3600)
//!     .run()
//!     .await?;
//! if report.is_degraded() {
//!     eprintln!("USDT columns use a current spot price");
//! }
//! candlewick::write_csv(&report.rows, std::io::stdout())?;
//! ```
//!
//! See `candlewick/examples/` for a runnable demonstration.
#![warn(missing_docs)]

pub(crate) mod core;
mod export;
mod router;

pub use core::{Candlewick, CandlewickBuilder};
#[cfg(feature = "dataframe")]
pub use export::to_dataframe;
pub use export::write_csv;
pub use router::download::DownloadBuilder;
pub use router::util::parse_instant;

// Re-export core types for convenience
pub use candlewick_core::{
    Aggregation, BackoffConfig, BasisSource, BasisTolerance, CandleRow, ConnectivityClient,
    DownloadConfig, DownloadReport, ExchangeCapability, ExchangeId, Granularity, NumericColumn,
    OhlcvError, OutputBucket, ResampleRules, SpotPriceSource,
};
