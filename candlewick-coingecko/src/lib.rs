//! candlewick-coingecko
//!
//! `SpotPriceSource` implementation over the public CoinGecko API. Used by the
//! candlewick orchestrator when an exchange lists no USDT market for a quote
//! currency in either direction.
#![warn(missing_docs)]

use async_trait::async_trait;
use candlewick_core::OhlcvError;
use candlewick_core::connector::SpotPriceSource;
use serde_json::Value;

/// Public CoinGecko API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const TETHER_QUERY: &[(&str, &str)] = &[
    ("localization", "false"),
    ("tickers", "false"),
    ("market_data", "true"),
    ("community_data", "false"),
    ("developer_data", "false"),
    ("sparkline", "false"),
];

/// Spot-price source reading tether's current price from CoinGecko.
#[derive(Clone)]
pub struct CoinGeckoSpot {
    http: reqwest::Client,
    base_url: String,
}

impl Default for CoinGeckoSpot {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoSpot {
    /// Source against the public API with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Source using a caller-configured HTTP client (timeouts, proxies, headers).
    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the source at another API root, e.g. a mirror or a test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn tether_url(&self) -> String {
        format!("{}/coins/tether", self.base_url)
    }
}

/// Read `market_data.current_price.<quote lowercase>` from a `coins/tether` payload.
///
/// # Errors
/// Returns `Data` if the path is missing or not a number.
pub fn extract_price(body: &Value, quote: &str) -> Result<f64, OhlcvError> {
    let key = quote.to_lowercase();
    body.get("market_data")
        .and_then(|m| m.get("current_price"))
        .and_then(|p| p.get(&key))
        .and_then(Value::as_f64)
        .ok_or_else(|| OhlcvError::Data(format!("missing market_data.current_price.{key}")))
}

#[async_trait]
impl SpotPriceSource for CoinGeckoSpot {
    fn name(&self) -> &'static str {
        "candlewick-coingecko"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "candlewick_coingecko::usdt_price_in", skip(self))
    )]
    async fn usdt_price_in(&self, quote: &str) -> Result<f64, OhlcvError> {
        let resp = self
            .http
            .get(self.tether_url())
            .query(TETHER_QUERY)
            .send()
            .await
            .map_err(|e| OhlcvError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::debug!(status = status.as_u16(), "coingecko non-success status");
            return Err(OhlcvError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| OhlcvError::Data(format!("coingecko body: {e}")))?;
        extract_price(&body, quote)
    }
}
