use std::time::Duration;

use chrono::{DateTime, Utc};

use candlewick_core::connector::ConnectivityClient;
use candlewick_core::{
    ExchangeCapability, Granularity, OhlcvError, PairSymbol, QuoteBasis, direct_usdt_pair,
    inverse_usdt_pair,
};

use super::backoff::jitter_wait;
use crate::Candlewick;

/// Conversion step that derives a basis from an exchange market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarketStep {
    Direct,
    Inverse,
}

impl MarketStep {
    fn pair(self, quote: &str) -> String {
        match self {
            Self::Direct => direct_usdt_pair(quote),
            Self::Inverse => inverse_usdt_pair(quote),
        }
    }
}

/// Inputs to one basis resolution.
pub(crate) struct BasisRequest<'a> {
    pub client: &'a dyn ConnectivityClient,
    pub cap: &'a ExchangeCapability,
    pub markets: &'a [String],
    /// Requested pair; only its quote currency is converted.
    pub pair: &'a PairSymbol,
    pub granularity: Granularity,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Open times of the primary rows that must each receive a price.
    pub row_times: &'a [DateTime<Utc>],
}

impl Candlewick {
    /// Resolve the USDT basis for a quote currency.
    ///
    /// Tried in order, first success wins: USDT identity, `{QUOTE}/USDT`,
    /// `USDT/{QUOTE}` inverted, then the external spot source. Market steps
    /// fail over when the pair is not listed, the client errors, the series is
    /// empty, or a primary row has no basis point within the configured
    /// tolerance; each such failure is returned as a warning.
    ///
    /// # Errors
    /// Returns `QuoteConversionUnavailable` when the spot step fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candlewick::basis::resolve_basis",
            skip(self, req),
            fields(exchange = req.cap.id.as_str(), quote = req.pair.quote()),
        )
    )]
    pub(crate) async fn resolve_basis(
        &self,
        req: BasisRequest<'_>,
    ) -> Result<(QuoteBasis, Vec<OhlcvError>), OhlcvError> {
        if req.pair.is_usdt_quoted() {
            return Ok((QuoteBasis::identity(), Vec::new()));
        }

        let quote = req.pair.quote();
        let max_distance = self
            .cfg
            .basis_tolerance
            .max_distance_seconds(req.granularity.seconds);
        let mut warnings: Vec<OhlcvError> = Vec::new();

        for step in [MarketStep::Direct, MarketStep::Inverse] {
            let pair = step.pair(quote);
            if !req.markets.is_empty() && !req.markets.iter().any(|m| *m == pair) {
                warnings.push(OhlcvError::Data(format!("{pair} is not listed")));
                continue;
            }
            let rows = match self
                .fetch_window(req.client, req.cap, &pair, req.granularity, req.start, req.end)
                .await
            {
                Ok(rows) => rows,
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(pair = %pair, error = %e, "conversion market failed");
                    warnings.push(e);
                    continue;
                }
            };
            let basis = match step {
                MarketStep::Direct => QuoteBasis::direct(&pair, &rows),
                MarketStep::Inverse => QuoteBasis::inverse(&pair, &rows),
            };
            if basis.is_empty() {
                warnings.push(OhlcvError::Data(format!("{pair} has no candles in window")));
                continue;
            }
            if let Some(ts) = basis.first_uncovered(req.row_times, max_distance) {
                warnings.push(OhlcvError::Data(format!(
                    "{pair} has no price within tolerance of {ts}"
                )));
                continue;
            }
            return Ok((basis, warnings));
        }

        let basis = self.spot_basis(quote).await?;
        #[cfg(feature = "tracing")]
        tracing::warn!(
            quote,
            source = ?basis.source,
            "degraded conversion: using current spot price for the whole window"
        );
        Ok((basis, warnings))
    }

    /// Query the external spot source, retrying transient failures with backoff.
    async fn spot_basis(&self, quote: &str) -> Result<QuoteBasis, OhlcvError> {
        let Some(source) = &self.spot else {
            return Err(OhlcvError::conversion_unavailable(
                quote,
                "no USDT market and no spot price source registered",
            ));
        };

        let backoff = self.cfg.spot_backoff;
        let mut attempt: u32 = 0;
        loop {
            match source.usdt_price_in(quote).await {
                Ok(px) if px.is_finite() && px > 0.0 => return Ok(QuoteBasis::spot(px)),
                Ok(px) => {
                    return Err(OhlcvError::conversion_unavailable(
                        quote,
                        format!("{} returned unusable price {px}", source.name()),
                    ));
                }
                Err(e) if e.is_retryable() => {
                    attempt = attempt.saturating_add(1);
                    if self.cfg.spot_max_attempts.is_some_and(|max| attempt >= max) {
                        return Err(OhlcvError::conversion_unavailable(
                            quote,
                            format!("{} failed after {attempt} attempts: {e}", source.name()),
                        ));
                    }
                    let wait = jitter_wait(
                        backoff.base_delay_ms(attempt - 1),
                        u32::from(backoff.jitter_percent),
                    );
                    #[cfg(feature = "tracing")]
                    tracing::warn!(attempt, wait_ms = wait, error = %e, "spot price retry");
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                }
                Err(e) => {
                    return Err(OhlcvError::conversion_unavailable(quote, e.to_string()));
                }
            }
        }
    }
}
