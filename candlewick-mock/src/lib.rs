//! Mock exchange client and spot source for CI-safe tests and examples.
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use candlewick_core::connector::{ConnectivityClient, SpotPriceSource};
use candlewick_core::{CandleRow, Granularity, OhlcvError};

/// Canned candle series and helpers to build more.
pub mod fixtures;

/// One recorded `fetch_candles` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    /// Pair requested.
    pub pair: String,
    /// Granularity label requested.
    pub granularity: &'static str,
    /// Page cursor.
    pub since: DateTime<Utc>,
    /// Page size requested.
    pub limit: usize,
}

#[derive(Default)]
struct InternalState {
    series: HashMap<String, Vec<CandleRow>>,
    failures: HashMap<String, OhlcvError>,
    markets: Option<Vec<String>>,
    markets_failure: Option<OhlcvError>,
    fetch_calls: Vec<FetchCall>,
    market_loads: usize,
}

/// In-memory exchange serving fixture candles page by page.
///
/// A page holds the stored rows with `open_time >= since`, in time order,
/// truncated to `limit`. Unknown pairs return an empty page, the way a real
/// exchange answers for a window with no history.
pub struct MockExchange {
    name: &'static str,
    state: Mutex<InternalState>,
}

impl MockExchange {
    /// Create an exchange with no series.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(InternalState::default()),
        }
    }

    /// Store a candle series for `pair`. Rows are sorted by open time.
    #[must_use]
    pub fn with_series(mut self, pair: &str, mut rows: Vec<CandleRow>) -> Self {
        rows.sort_by_key(|r| r.open_time);
        self.state.get_mut().series.insert(pair.to_string(), rows);
        self
    }

    /// Make every `fetch_candles` call for `pair` fail with `err`.
    #[must_use]
    pub fn failing(mut self, pair: &str, err: OhlcvError) -> Self {
        self.state.get_mut().failures.insert(pair.to_string(), err);
        self
    }

    /// Override the market listing. By default the stored pairs are listed.
    #[must_use]
    pub fn with_markets<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.get_mut().markets = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    /// Make `load_markets` fail with `err`.
    #[must_use]
    pub fn failing_markets(mut self, err: OhlcvError) -> Self {
        self.state.get_mut().markets_failure = Some(err);
        self
    }

    /// Every `fetch_candles` call received so far, in order.
    pub async fn fetch_calls(&self) -> Vec<FetchCall> {
        self.state.lock().await.fetch_calls.clone()
    }

    /// Pairs requested so far, in call order, one entry per page.
    pub async fn fetched_pairs(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .fetch_calls
            .iter()
            .map(|c| c.pair.clone())
            .collect()
    }

    /// Number of `load_markets` calls received so far.
    pub async fn market_loads(&self) -> usize {
        self.state.lock().await.market_loads
    }
}

#[async_trait]
impl ConnectivityClient for MockExchange {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load_markets(&self) -> Result<Vec<String>, OhlcvError> {
        let mut guard = self.state.lock().await;
        guard.market_loads += 1;
        if let Some(err) = &guard.markets_failure {
            return Err(err.clone());
        }
        if let Some(markets) = &guard.markets {
            return Ok(markets.clone());
        }
        let mut listed: Vec<String> = guard.series.keys().cloned().collect();
        listed.sort();
        Ok(listed)
    }

    async fn fetch_candles(
        &self,
        pair: &str,
        granularity: Granularity,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CandleRow>, OhlcvError> {
        let mut guard = self.state.lock().await;
        guard.fetch_calls.push(FetchCall {
            pair: pair.to_string(),
            granularity: granularity.label,
            since,
            limit,
        });
        if let Some(err) = guard.failures.get(pair) {
            return Err(err.clone());
        }
        Ok(guard.series.get(pair).map_or_else(Vec::new, |rows| {
            rows.iter()
                .filter(|r| r.open_time >= since)
                .take(limit)
                .copied()
                .collect()
        }))
    }
}

/// Spot source replaying a fixed sequence of answers.
///
/// Once the script runs out, the last answer repeats.
pub struct ScriptedSpot {
    state: Mutex<SpotScript>,
}

struct SpotScript {
    pending: VecDeque<Result<f64, OhlcvError>>,
    last: Option<Result<f64, OhlcvError>>,
    calls: usize,
}

impl ScriptedSpot {
    /// Build from answers given in call order.
    #[must_use]
    pub fn new(script: Vec<Result<f64, OhlcvError>>) -> Self {
        Self {
            state: Mutex::new(SpotScript {
                pending: script.into(),
                last: None,
                calls: 0,
            }),
        }
    }

    /// Always answer with `usdt_price_in_quote`.
    #[must_use]
    pub fn fixed(usdt_price_in_quote: f64) -> Self {
        Self::new(vec![Ok(usdt_price_in_quote)])
    }

    /// Number of lookups received so far.
    pub async fn calls(&self) -> usize {
        self.state.lock().await.calls
    }
}

#[async_trait]
impl SpotPriceSource for ScriptedSpot {
    fn name(&self) -> &'static str {
        "candlewick-mock-spot"
    }

    async fn usdt_price_in(&self, _quote: &str) -> Result<f64, OhlcvError> {
        let mut guard = self.state.lock().await;
        guard.calls += 1;
        if let Some(next) = guard.pending.pop_front() {
            guard.last = Some(next.clone());
            return next;
        }
        guard
            .last
            .clone()
            .unwrap_or_else(|| Err(OhlcvError::Other("spot script is empty".into())))
    }
}
