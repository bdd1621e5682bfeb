use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use candlewick_core::connector::{ConnectivityClient, SpotPriceSource};
use candlewick_core::{
    BackoffConfig, BasisTolerance, DownloadConfig, ExchangeId, OhlcvError, ResampleRules,
};

/// Orchestrator that routes downloads to the registered exchange clients.
pub struct Candlewick {
    pub(crate) clients: HashMap<ExchangeId, Arc<dyn ConnectivityClient>>,
    pub(crate) spot: Option<Arc<dyn SpotPriceSource>>,
    pub(crate) cfg: DownloadConfig,
}

/// Builder for constructing a `Candlewick` orchestrator with custom configuration.
pub struct CandlewickBuilder {
    clients: HashMap<ExchangeId, Arc<dyn ConnectivityClient>>,
    spot: Option<Arc<dyn SpotPriceSource>>,
    cfg: DownloadConfig,
}

impl Default for CandlewickBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CandlewickBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Behavior:
    /// - Starts with no clients; register at least one via [`Self::with_client`].
    /// - Without a spot source the conversion chain ends after the inverse pair.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            spot: None,
            cfg: DownloadConfig::default(),
        }
    }

    /// Register the connectivity client serving `exchange`.
    ///
    /// Registering the same exchange twice replaces the earlier client.
    #[must_use]
    pub fn with_client(mut self, exchange: ExchangeId, client: Arc<dyn ConnectivityClient>) -> Self {
        self.clients.insert(exchange, client);
        self
    }

    /// Register the external spot-price source used as the last conversion step.
    #[must_use]
    pub fn spot_source(mut self, source: Arc<dyn SpotPriceSource>) -> Self {
        self.spot = Some(source);
        self
    }

    /// Delay inserted between consecutive page requests.
    #[must_use]
    pub const fn page_delay(mut self, delay: Duration) -> Self {
        self.cfg.page_delay = delay;
        self
    }

    /// Backoff between spot-price retries.
    ///
    /// Higher jitter spreads retries from concurrent downloads at the cost of
    /// less predictable latency.
    #[must_use]
    pub const fn spot_backoff(mut self, cfg: BackoffConfig) -> Self {
        self.cfg.spot_backoff = cfg;
        self
    }

    /// Bound the number of spot-price attempts. Unbounded by default.
    #[must_use]
    pub const fn spot_max_attempts(mut self, attempts: u32) -> Self {
        self.cfg.spot_max_attempts = Some(attempts);
        self
    }

    /// How far a basis point may sit from a candle and still price it.
    #[must_use]
    pub const fn basis_tolerance(mut self, tolerance: BasisTolerance) -> Self {
        self.cfg.basis_tolerance = tolerance;
        self
    }

    /// Give synthesized empty buckets zero volume instead of a missing value.
    #[must_use]
    pub const fn zero_fill_empty_volume(mut self, yes: bool) -> Self {
        self.cfg.zero_fill_empty_volume = yes;
        self
    }

    /// Replace the per-column aggregation rules used when resampling.
    #[must_use]
    pub const fn resample_rules(mut self, rules: ResampleRules) -> Self {
        self.cfg.resample_rules = rules;
        self
    }

    /// Replace the whole configuration at once.
    #[must_use]
    pub fn config(mut self, cfg: DownloadConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the `Candlewick` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no clients have been registered via [`Self::with_client`].
    pub fn build(self) -> Result<Candlewick, OhlcvError> {
        if self.clients.is_empty() {
            return Err(OhlcvError::InvalidArg(
                "no clients registered; add at least one via with_client(...)".to_string(),
            ));
        }
        Ok(Candlewick {
            clients: self.clients,
            spot: self.spot,
            cfg: self.cfg,
        })
    }
}

/// Attribute a client failure to the client that produced it.
pub fn tag_err(connector: &str, e: OhlcvError) -> OhlcvError {
    match e {
        e @ OhlcvError::Connector { .. } => e,
        other => OhlcvError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

impl Candlewick {
    /// Start building a new `Candlewick` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use candlewick::{Candlewick, ExchangeId};
    ///
    /// let cw = Candlewick::builder()
    ///     .with_client(ExchangeId::Upbit, Arc::new(upbit_client))
    ///     .spot_source(Arc::new(candlewick_coingecko::CoinGeckoSpot::new()))
    ///     .page_delay(std::time::Duration::from_millis(250))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> CandlewickBuilder {
        CandlewickBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DownloadConfig {
        &self.cfg
    }

    pub(crate) fn client(&self, exchange: ExchangeId) -> Result<Arc<dyn ConnectivityClient>, OhlcvError> {
        self.clients
            .get(&exchange)
            .cloned()
            .ok_or_else(|| OhlcvError::ClientNotRegistered {
                exchange: exchange.as_str().to_string(),
            })
    }
}
