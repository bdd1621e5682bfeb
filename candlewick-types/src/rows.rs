//! Row types flowing through the pipeline, from raw exchange candles to the
//! final resampled buckets, plus the per-column aggregation table.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw exchange-reported candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleRow {
    /// Candle open instant (UTC).
    pub open_time: DateTime<Utc>,
    /// Open price in quote currency.
    pub open: f64,
    /// High price in quote currency.
    pub high: f64,
    /// Low price in quote currency.
    pub low: f64,
    /// Close price in quote currency.
    pub close: f64,
    /// Traded quantity in base currency.
    pub volume_base: f64,
}

impl CandleRow {
    /// Midpoint of the candle range, `(high + low) / 2`.
    #[must_use]
    pub fn average_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

/// Identity columns carried by every row of one download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIdentity {
    /// Display name of the exchange.
    pub exchange_name: String,
    /// Pair as requested, including any settle suffix.
    pub pair: String,
    /// Base currency symbol.
    pub base: String,
    /// Quote currency symbol (settle suffix stripped).
    pub quote: String,
}

/// A candle enriched with identity fields and USDT-denominated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// Display name of the exchange.
    pub exchange_name: String,
    /// Pair as requested, including any settle suffix.
    pub pair: String,
    /// Base currency symbol.
    pub base: String,
    /// Quote currency symbol (settle suffix stripped).
    pub quote: String,
    /// Candle open instant (UTC).
    pub open_time: DateTime<Utc>,
    /// `(high + low) / 2` in quote currency.
    pub average_price: f64,
    /// Open price in quote currency.
    pub open: f64,
    /// Close price in quote currency.
    pub close: f64,
    /// High price in quote currency.
    pub high: f64,
    /// Low price in quote currency.
    pub low: f64,
    /// Traded quantity in base currency.
    pub volume_base: f64,
    /// Price of one unit of quote currency in USDT.
    pub quote_price_in_usdt: f64,
    /// `average_price * quote_price_in_usdt`.
    pub average_price_usdt: f64,
    /// `open * quote_price_in_usdt`.
    pub open_usdt: f64,
    /// `close * quote_price_in_usdt`.
    pub close_usdt: f64,
    /// `high * quote_price_in_usdt`.
    pub high_usdt: f64,
    /// `low * quote_price_in_usdt`.
    pub low_usdt: f64,
    /// `volume_base * average_price_usdt`.
    pub volume_usdt: f64,
}

/// One row of the final result.
///
/// Field order is the serialized column order and must stay stable.
/// Missing numeric values are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputBucket {
    /// Display name of the exchange.
    pub exchange_name: String,
    /// Pair as requested.
    pub pair: String,
    /// Base currency symbol.
    pub base: String,
    /// Quote currency symbol.
    pub quote: String,
    /// Mean of the contributing rows' `average_price`.
    pub average_price: Option<f64>,
    /// First open in the bucket.
    pub open: Option<f64>,
    /// Last close in the bucket.
    pub close: Option<f64>,
    /// Highest high in the bucket.
    pub high: Option<f64>,
    /// Lowest low in the bucket.
    pub low: Option<f64>,
    /// Summed base volume.
    pub volume_base: Option<f64>,
    /// Mean conversion basis over the bucket.
    #[serde(rename = "quote_currency_price_usdt")]
    pub quote_price_in_usdt: Option<f64>,
    /// Mean of the contributing rows' `average_price_usdt`.
    pub average_price_usdt: Option<f64>,
    /// First USDT open in the bucket.
    pub open_usdt: Option<f64>,
    /// Last USDT close in the bucket.
    pub close_usdt: Option<f64>,
    /// Highest USDT high in the bucket.
    pub high_usdt: Option<f64>,
    /// Lowest USDT low in the bucket.
    pub low_usdt: Option<f64>,
    /// Summed USDT volume.
    pub volume_usdt: Option<f64>,
    /// Bucket start as a naive UTC wall-clock instant.
    pub timestamp: NaiveDateTime,
}

impl OutputBucket {
    /// Serialized column names, in order.
    pub const COLUMNS: [&'static str; 18] = [
        "exchange_name",
        "pair",
        "base",
        "quote",
        "average_price",
        "open",
        "close",
        "high",
        "low",
        "volume_base",
        "quote_currency_price_usdt",
        "average_price_usdt",
        "open_usdt",
        "close_usdt",
        "high_usdt",
        "low_usdt",
        "volume_usdt",
        "timestamp",
    ];

    /// True when any numeric column is missing.
    #[must_use]
    pub fn has_missing(&self) -> bool {
        NumericColumn::ALL.iter().any(|c| c.get(self).is_none())
    }
}

/// Numeric columns shared by `NormalizedRow` and `OutputBucket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    /// `average_price`
    AveragePrice,
    /// `open`
    Open,
    /// `close`
    Close,
    /// `high`
    High,
    /// `low`
    Low,
    /// `volume_base`
    VolumeBase,
    /// `quote_currency_price_usdt`
    QuotePriceInUsdt,
    /// `average_price_usdt`
    AveragePriceUsdt,
    /// `open_usdt`
    OpenUsdt,
    /// `close_usdt`
    CloseUsdt,
    /// `high_usdt`
    HighUsdt,
    /// `low_usdt`
    LowUsdt,
    /// `volume_usdt`
    VolumeUsdt,
}

impl NumericColumn {
    /// Every numeric column in output order.
    pub const ALL: [Self; 13] = [
        Self::AveragePrice,
        Self::Open,
        Self::Close,
        Self::High,
        Self::Low,
        Self::VolumeBase,
        Self::QuotePriceInUsdt,
        Self::AveragePriceUsdt,
        Self::OpenUsdt,
        Self::CloseUsdt,
        Self::HighUsdt,
        Self::LowUsdt,
        Self::VolumeUsdt,
    ];

    /// Read this column from a normalized row.
    #[must_use]
    pub const fn value(self, row: &NormalizedRow) -> f64 {
        match self {
            Self::AveragePrice => row.average_price,
            Self::Open => row.open,
            Self::Close => row.close,
            Self::High => row.high,
            Self::Low => row.low,
            Self::VolumeBase => row.volume_base,
            Self::QuotePriceInUsdt => row.quote_price_in_usdt,
            Self::AveragePriceUsdt => row.average_price_usdt,
            Self::OpenUsdt => row.open_usdt,
            Self::CloseUsdt => row.close_usdt,
            Self::HighUsdt => row.high_usdt,
            Self::LowUsdt => row.low_usdt,
            Self::VolumeUsdt => row.volume_usdt,
        }
    }

    /// Read this column from an output bucket.
    #[must_use]
    pub const fn get(self, bucket: &OutputBucket) -> Option<f64> {
        match self {
            Self::AveragePrice => bucket.average_price,
            Self::Open => bucket.open,
            Self::Close => bucket.close,
            Self::High => bucket.high,
            Self::Low => bucket.low,
            Self::VolumeBase => bucket.volume_base,
            Self::QuotePriceInUsdt => bucket.quote_price_in_usdt,
            Self::AveragePriceUsdt => bucket.average_price_usdt,
            Self::OpenUsdt => bucket.open_usdt,
            Self::CloseUsdt => bucket.close_usdt,
            Self::HighUsdt => bucket.high_usdt,
            Self::LowUsdt => bucket.low_usdt,
            Self::VolumeUsdt => bucket.volume_usdt,
        }
    }

    /// Write this column on an output bucket.
    pub const fn set(self, bucket: &mut OutputBucket, value: Option<f64>) {
        match self {
            Self::AveragePrice => bucket.average_price = value,
            Self::Open => bucket.open = value,
            Self::Close => bucket.close = value,
            Self::High => bucket.high = value,
            Self::Low => bucket.low = value,
            Self::VolumeBase => bucket.volume_base = value,
            Self::QuotePriceInUsdt => bucket.quote_price_in_usdt = value,
            Self::AveragePriceUsdt => bucket.average_price_usdt = value,
            Self::OpenUsdt => bucket.open_usdt = value,
            Self::CloseUsdt => bucket.close_usdt = value,
            Self::HighUsdt => bucket.high_usdt = value,
            Self::LowUsdt => bucket.low_usdt = value,
            Self::VolumeUsdt => bucket.volume_usdt = value,
        }
    }

    /// True for the two volume columns.
    #[must_use]
    pub const fn is_volume(self) -> bool {
        matches!(self, Self::VolumeBase | Self::VolumeUsdt)
    }
}

/// Aggregation applied to one numeric column within a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    /// Earliest value.
    First,
    /// Latest value.
    Last,
    /// Largest value.
    Max,
    /// Smallest value.
    Min,
    /// Arithmetic mean.
    Mean,
    /// Sum of values; missing when nothing contributed.
    Sum,
}

impl Aggregation {
    /// Aggregate values given in time order. Returns `None` for an empty slice.
    #[must_use]
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        let (&first, rest) = values.split_first()?;
        Some(match self {
            Self::First => first,
            Self::Last => values.last().copied().unwrap_or(first),
            Self::Max => rest.iter().copied().fold(first, f64::max),
            Self::Min => rest.iter().copied().fold(first, f64::min),
            #[allow(clippy::cast_precision_loss)]
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Self::Sum => values.iter().sum(),
        })
    }
}

/// Per-column aggregation table handed to the resampler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResampleRules {
    rules: [Aggregation; 13],
}

impl Default for ResampleRules {
    fn default() -> Self {
        use Aggregation::{First, Last, Max, Mean, Min, Sum};
        // Indexed in NumericColumn::ALL order.
        Self {
            rules: [
                Mean, First, Last, Max, Min, Sum, Mean, Mean, First, Last, Max, Min, Sum,
            ],
        }
    }
}

impl ResampleRules {
    /// Aggregation for a column.
    #[must_use]
    pub const fn get(&self, column: NumericColumn) -> Aggregation {
        self.rules[column as usize]
    }

    /// Override the aggregation for a column.
    #[must_use]
    pub const fn with(mut self, column: NumericColumn, aggregation: Aggregation) -> Self {
        self.rules[column as usize] = aggregation;
        self
    }
}
