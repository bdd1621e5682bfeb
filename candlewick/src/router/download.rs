use chrono::{DateTime, Utc};

use candlewick_core::{
    DownloadReport, ExchangeCapability, OhlcvError, PairSymbol, RowIdentity, normalize, resample,
};

use super::basis::BasisRequest;
use super::util::parse_instant;
use crate::Candlewick;
use crate::core::tag_err;

/// Builder for a single OHLCV download.
///
/// Inputs are stored as given and validated in [`DownloadBuilder::run`], before
/// any network call.
pub struct DownloadBuilder<'a> {
    pub(crate) cw: &'a Candlewick,
    pub(crate) exchange: Option<String>,
    pub(crate) pair: Option<String>,
    pub(crate) period: Option<(String, String)>,
    pub(crate) input_granularity: Option<String>,
    pub(crate) output_granularity_seconds: Option<i64>,
}

impl<'a> DownloadBuilder<'a> {
    /// Create a new builder bound to a `Candlewick` instance.
    #[must_use]
    pub const fn new(cw: &'a Candlewick) -> Self {
        Self {
            cw,
            exchange: None,
            pair: None,
            period: None,
            input_granularity: None,
            output_granularity_seconds: None,
        }
    }

    /// Exchange identifier, e.g. `"upbit"`.
    #[must_use]
    pub fn exchange(mut self, exchange: &str) -> Self {
        self.exchange = Some(exchange.to_string());
        self
    }

    /// Pair as `BASE/QUOTE` or `BASE/QUOTE:SETTLE`.
    #[must_use]
    pub fn pair(mut self, pair: &str) -> Self {
        self.pair = Some(pair.to_string());
        self
    }

    /// Inclusive window `[start, end]` as timestamp strings.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS±HH:MM`, naive date-times (UTC)
    /// and bare dates.
    #[must_use]
    pub fn period(mut self, start: &str, end: &str) -> Self {
        self.period = Some((start.to_string(), end.to_string()));
        self
    }

    /// Native candle width to request from the exchange, e.g. `"1h"`.
    #[must_use]
    pub fn input_granularity(mut self, label: &str) -> Self {
        self.input_granularity = Some(label.to_string());
        self
    }

    /// Output bucket width in seconds. Defaults to the input granularity.
    #[must_use]
    pub const fn output_granularity_seconds(mut self, seconds: i64) -> Self {
        self.output_granularity_seconds = Some(seconds);
        self
    }

    /// Execute the download.
    ///
    /// Behavior:
    /// - Validates exchange, granularities, pair and window before any client call.
    /// - Loads the market listing once, then pages the primary pair.
    /// - Resolves the USDT basis through the fallback chain, normalizes every
    ///   candle and resamples into epoch-aligned buckets.
    /// - Non-fatal conversion failures land in `warnings`; a spot-based basis is
    ///   reported through `conversion` and `is_degraded()`.
    ///
    /// # Errors
    /// Validation errors, `ClientNotRegistered`, client failures on the primary
    /// pair, `NoDataForPeriod` and `QuoteConversionUnavailable`.
    pub async fn run(self) -> Result<DownloadReport, OhlcvError> {
        let exchange = required(self.exchange, "exchange")?;
        let pair = required(self.pair, "pair")?;
        let (start, end) = required(self.period, "period")?;
        let input = required(self.input_granularity, "input granularity")?;
        self.cw
            .download_ohlcv(
                &exchange,
                &pair,
                &start,
                &end,
                &input,
                self.output_granularity_seconds,
            )
            .await
    }
}

fn required<T>(value: Option<T>, what: &str) -> Result<T, OhlcvError> {
    value.ok_or_else(|| OhlcvError::InvalidArg(format!("{what} is required for download")))
}

struct ValidatedRequest {
    cap: &'static ExchangeCapability,
    granularity: candlewick_core::Granularity,
    output_seconds: i64,
    pair: PairSymbol,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn validate(
    exchange: &str,
    pair: &str,
    period_start: &str,
    period_end: &str,
    input_granularity: &str,
    output_granularity_seconds: Option<i64>,
) -> Result<ValidatedRequest, OhlcvError> {
    let (cap, granularity, output_seconds) =
        ExchangeCapability::validate(exchange, input_granularity, output_granularity_seconds)?;
    let pair = PairSymbol::parse(pair)?;
    let start = parse_instant(period_start)?;
    let end = parse_instant(period_end)?;
    if end < start {
        return Err(OhlcvError::InvalidArg(format!(
            "period end {end} is before start {start}"
        )));
    }
    Ok(ValidatedRequest {
        cap,
        granularity,
        output_seconds,
        pair,
        start,
        end,
    })
}

impl Candlewick {
    /// Start building a download.
    #[must_use]
    pub const fn download(&self) -> DownloadBuilder<'_> {
        DownloadBuilder::new(self)
    }

    /// Download, normalize to USDT and resample one pair over a window.
    ///
    /// `output_granularity_seconds` defaults to the input granularity when
    /// `None`. See [`DownloadBuilder::run`] for the full behavior.
    ///
    /// # Errors
    /// See [`DownloadBuilder::run`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candlewick::download::download_ohlcv",
            skip_all,
            fields(exchange = exchange, pair = pair, input = input_granularity),
        )
    )]
    pub async fn download_ohlcv(
        &self,
        exchange: &str,
        pair: &str,
        period_start: &str,
        period_end: &str,
        input_granularity: &str,
        output_granularity_seconds: Option<i64>,
    ) -> Result<DownloadReport, OhlcvError> {
        let req = validate(
            exchange,
            pair,
            period_start,
            period_end,
            input_granularity,
            output_granularity_seconds,
        )?;
        let client = self.client(req.cap.id)?;

        let markets = client
            .load_markets()
            .await
            .map_err(|e| tag_err(client.name(), e))?;

        let rows = self
            .fetch_traded(
                client.as_ref(),
                req.cap,
                req.pair.as_str(),
                req.granularity,
                req.start,
                req.end,
            )
            .await?;

        let row_times: Vec<DateTime<Utc>> = rows.iter().map(|r| r.open_time).collect();
        let (basis, warnings) = self
            .resolve_basis(BasisRequest {
                client: client.as_ref(),
                cap: req.cap,
                markets: &markets,
                pair: &req.pair,
                granularity: req.granularity,
                start: req.start,
                end: req.end,
                row_times: &row_times,
            })
            .await?;

        let identity = RowIdentity {
            exchange_name: req.cap.display_name.to_string(),
            pair: req.pair.as_str().to_string(),
            base: req.pair.base().to_string(),
            quote: req.pair.quote().to_string(),
        };
        let max_distance = self
            .cfg
            .basis_tolerance
            .max_distance_seconds(req.granularity.seconds);
        let normalized = normalize(&rows, &identity, &basis, max_distance)?;
        let buckets = resample(
            &normalized,
            req.output_seconds,
            &identity,
            &self.cfg.resample_rules,
            self.cfg.zero_fill_empty_volume,
        )?;

        let report = DownloadReport {
            rows: buckets,
            conversion: basis.source,
            warnings,
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            rows = report.rows.len(),
            missing = report.missing_rows(),
            degraded = report.is_degraded(),
            "download complete"
        );

        Ok(report)
    }
}
