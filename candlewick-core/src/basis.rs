//! USDT conversion basis: a price series plus the provenance of that series.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::timeseries::lookup::nearest;
use crate::{BasisSource, CandleRow};

/// USDT price of one unit of quote currency, over time or as a constant.
#[derive(Debug, Clone, PartialEq)]
pub enum BasisSeries {
    /// Same price for every instant.
    Constant(f64),
    /// Price keyed by candle open time.
    Timeline(BTreeMap<DateTime<Utc>, f64>),
}

/// Conversion basis handed from the resolver to normalization.
///
/// A plain value: later conversion stages consume it (or the rows it
/// produced) without reaching into the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteBasis {
    /// Where the series came from.
    pub source: BasisSource,
    /// The series itself.
    pub series: BasisSeries,
}

impl QuoteBasis {
    /// Basis for USDT-quoted pairs: constant 1.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            source: BasisSource::Identity,
            series: BasisSeries::Constant(1.0),
        }
    }

    /// Basis built from `{QUOTE}/USDT` candles: each candle's average price.
    #[must_use]
    pub fn direct(pair: impl Into<String>, candles: &[CandleRow]) -> Self {
        Self {
            source: BasisSource::Direct { pair: pair.into() },
            series: BasisSeries::Timeline(
                candles
                    .iter()
                    .map(|c| (c.open_time, c.average_price()))
                    .collect(),
            ),
        }
    }

    /// Basis built from `USDT/{QUOTE}` candles: the reciprocal of each
    /// candle's average price. Non-positive averages are skipped.
    #[must_use]
    pub fn inverse(pair: impl Into<String>, candles: &[CandleRow]) -> Self {
        Self {
            source: BasisSource::Inverse { pair: pair.into() },
            series: BasisSeries::Timeline(
                candles
                    .iter()
                    .filter(|c| c.average_price() > 0.0)
                    .map(|c| (c.open_time, 1.0 / c.average_price()))
                    .collect(),
            ),
        }
    }

    /// Degraded basis from a single current spot price of USDT in the quote.
    #[must_use]
    pub fn spot(usdt_price_in_quote: f64) -> Self {
        let quote_price_in_usdt = 1.0 / usdt_price_in_quote;
        Self {
            source: BasisSource::Spot {
                quote_price_in_usdt,
            },
            series: BasisSeries::Constant(quote_price_in_usdt),
        }
    }

    /// True when the series holds no usable point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.series {
            BasisSeries::Constant(_) => false,
            BasisSeries::Timeline(m) => m.is_empty(),
        }
    }

    /// Conversion price for an instant, via nearest-timestamp matching.
    #[must_use]
    pub fn price_at(&self, ts: DateTime<Utc>, max_distance_seconds: Option<i64>) -> Option<f64> {
        match &self.series {
            BasisSeries::Constant(v) => Some(*v),
            BasisSeries::Timeline(m) => nearest(m, ts, max_distance_seconds).map(|(_, v)| v),
        }
    }

    /// First instant that has no basis point within the tolerance, if any.
    #[must_use]
    pub fn first_uncovered(
        &self,
        timestamps: &[DateTime<Utc>],
        max_distance_seconds: Option<i64>,
    ) -> Option<DateTime<Utc>> {
        timestamps
            .iter()
            .copied()
            .find(|ts| self.price_at(*ts, max_distance_seconds).is_none())
    }
}
