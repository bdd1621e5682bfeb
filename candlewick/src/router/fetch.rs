use chrono::{DateTime, TimeDelta, Utc};

use candlewick_core::connector::ConnectivityClient;
use candlewick_core::{
    CandleRow, ExchangeCapability, Granularity, OhlcvError, clip_and_dedup, total_volume,
};

use crate::Candlewick;
use crate::core::tag_err;

impl Candlewick {
    /// Page through `[start, end]` for one pair and return clipped, deduplicated rows.
    ///
    /// The cursor advances by `max_points_per_page * granularity` after each
    /// page. Paging stops on an empty page, once the last row passes `end`, or
    /// once the cursor itself passes `end`. Client errors are fatal.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candlewick::fetch::fetch_window",
            skip_all,
            fields(exchange = cap.id.as_str(), pair = pair, granularity = granularity.label),
        )
    )]
    pub(crate) async fn fetch_window(
        &self,
        client: &dyn ConnectivityClient,
        cap: &ExchangeCapability,
        pair: &str,
        granularity: Granularity,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CandleRow>, OhlcvError> {
        let limit = cap.max_points_per_page;
        let page_span = i64::try_from(limit)
            .ok()
            .and_then(|n| n.checked_mul(granularity.seconds))
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| OhlcvError::InvalidArg(format!("page span overflow for {pair}")))?;

        let mut collected: Vec<CandleRow> = Vec::new();
        let mut cursor = start;
        let mut first = true;
        loop {
            if !first && !self.cfg.page_delay.is_zero() {
                tokio::time::sleep(self.cfg.page_delay).await;
            }
            first = false;

            let page = client
                .fetch_candles(pair, granularity, cursor, limit)
                .await
                .map_err(|e| tag_err(client.name(), e))?;

            #[cfg(feature = "tracing")]
            tracing::debug!(since = %cursor, rows = page.len(), "fetched page");

            let Some(last) = page.iter().map(|r| r.open_time).max() else {
                #[cfg(feature = "tracing")]
                tracing::debug!("stop: empty page");
                break;
            };
            collected.extend(page);
            if last > end {
                #[cfg(feature = "tracing")]
                tracing::debug!(last = %last, "stop: page passed window end");
                break;
            }
            match cursor.checked_add_signed(page_span) {
                Some(next) if next <= end => cursor = next,
                _ => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("stop: cursor passed window end");
                    break;
                }
            }
        }

        Ok(clip_and_dedup(collected, start, end))
    }

    /// Fetch the primary pair and require that it actually traded in the window.
    ///
    /// # Errors
    /// Returns `NoDataForPeriod` if the clipped series has zero total base volume.
    pub(crate) async fn fetch_traded(
        &self,
        client: &dyn ConnectivityClient,
        cap: &ExchangeCapability,
        pair: &str,
        granularity: Granularity,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CandleRow>, OhlcvError> {
        let rows = self
            .fetch_window(client, cap, pair, granularity, start, end)
            .await?;
        if total_volume(&rows) <= 0.0 {
            return Err(OhlcvError::NoDataForPeriod {
                pair: pair.to_string(),
            });
        }
        Ok(rows)
    }
}
