use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{CandleRow, Granularity, OhlcvError};

/// Market connectivity for one exchange.
///
/// Implementations own transport, authentication and any shared rate
/// limiting. The pipeline calls them strictly sequentially within a download.
#[async_trait]
pub trait ConnectivityClient: Send + Sync {
    /// Stable connector name used in error messages.
    fn name(&self) -> &'static str;

    /// Load the exchange's market listing and return every tradable symbol.
    async fn load_markets(&self) -> Result<Vec<String>, OhlcvError>;

    /// Fetch up to `limit` candles for `pair` at `granularity`, starting at `since`.
    ///
    /// An empty page means no history is available from `since` onward.
    async fn fetch_candles(
        &self,
        pair: &str,
        granularity: Granularity,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CandleRow>, OhlcvError>;
}

/// External current price lookup used when no USDT market exists for a quote.
#[async_trait]
pub trait SpotPriceSource: Send + Sync {
    /// Stable source name used in error messages.
    fn name(&self) -> &'static str;

    /// Current price of one USDT expressed in `quote` (e.g. `1350.0` for KRW).
    ///
    /// Transient failures should be reported as `HttpStatus` or `Transport`
    /// so callers can retry them.
    async fn usdt_price_in(&self, quote: &str) -> Result<f64, OhlcvError>;
}

impl dyn SpotPriceSource {
    /// Build a `SpotPriceSource` from a closure taking the quote symbol.
    pub fn from_fn<F>(f: F) -> Arc<dyn SpotPriceSource>
    where
        F: Send + Sync + 'static + Fn(&str) -> Result<f64, OhlcvError>,
    {
        struct FnSpot<F>(F);

        #[async_trait]
        impl<F> SpotPriceSource for FnSpot<F>
        where
            F: Send + Sync + 'static + Fn(&str) -> Result<f64, OhlcvError>,
        {
            fn name(&self) -> &'static str {
                "fn-spot"
            }

            async fn usdt_price_in(&self, quote: &str) -> Result<f64, OhlcvError> {
                (self.0)(quote)
            }
        }

        Arc::new(FnSpot(f))
    }
}
