//! Report envelopes produced by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::OhlcvError;
use crate::rows::OutputBucket;

/// Where the USDT conversion basis of a download came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BasisSource {
    /// Quote is USDT; the basis is the constant 1.
    Identity,
    /// Time series from the `{QUOTE}/USDT` market.
    Direct {
        /// Pair that supplied the series.
        pair: String,
    },
    /// Inverted time series from the `USDT/{QUOTE}` market.
    Inverse {
        /// Pair that supplied the series.
        pair: String,
    },
    /// Current external spot price used as a constant for the whole window.
    Spot {
        /// USDT value of one unit of quote currency at request time.
        quote_price_in_usdt: f64,
    },
}

impl BasisSource {
    /// True when the basis is a single current price rather than a time series.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Spot { .. })
    }
}

/// Result of a single download call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadReport {
    /// Resampled rows ordered by bucket start.
    pub rows: Vec<OutputBucket>,
    /// Conversion basis applied to every row.
    pub conversion: BasisSource,
    /// Non-fatal issues encountered along the conversion fallback chain.
    pub warnings: Vec<OhlcvError>,
}

impl DownloadReport {
    /// True when the USDT columns rest on a spot price instead of a time series.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.conversion.is_degraded()
    }

    /// Number of rows with at least one missing numeric column.
    #[must_use]
    pub fn missing_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.has_missing()).count()
    }
}
