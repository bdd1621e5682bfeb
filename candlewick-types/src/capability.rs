use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::OhlcvError;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// A candle width label paired with its duration in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Granularity {
    /// Provider-facing label, e.g. `"1h"`.
    pub label: &'static str,
    /// Width of one candle in seconds.
    pub seconds: i64,
}

/// Every granularity label understood by the workspace.
///
/// Months are approximated as 30 days, so `1M` and `30d` share a width.
pub const GRANULARITIES: &[Granularity] = &[
    Granularity { label: "1s", seconds: 1 },
    Granularity { label: "1m", seconds: MINUTE },
    Granularity { label: "5m", seconds: 5 * MINUTE },
    Granularity { label: "15m", seconds: 15 * MINUTE },
    Granularity { label: "30m", seconds: 30 * MINUTE },
    Granularity { label: "1h", seconds: HOUR },
    Granularity { label: "1d", seconds: DAY },
    Granularity { label: "1w", seconds: 7 * DAY },
    Granularity { label: "1M", seconds: 30 * DAY },
    Granularity { label: "30d", seconds: 30 * DAY },
];

impl Granularity {
    /// Resolve a label against the global table.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        GRANULARITIES.iter().copied().find(|g| g.label == label)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// Exchanges with a known capability record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ExchangeId {
    /// Binance spot/futures.
    Binance,
    /// Upbit.
    Upbit,
    /// Bithumb.
    Bithumb,
    /// Coinbase.
    Coinbase,
    /// Huobi.
    Huobi,
    /// OKX.
    Okx,
    /// Gate.io.
    Gate,
    /// Bybit.
    Bybit,
    /// KuCoin.
    Kucoin,
    /// MEXC.
    Mexc,
    /// Bitget.
    Bitget,
}

/// Static capability data for one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeCapability {
    /// Exchange the record describes.
    pub id: ExchangeId,
    /// Human-readable name written into every output row.
    pub display_name: &'static str,
    /// Maximum number of candles one page request returns.
    pub max_points_per_page: usize,
    /// Granularity labels this exchange serves natively.
    pub granularities: &'static [&'static str],
}

const ALL_BUT_SECONDS: &[&str] = &["1m", "5m", "15m", "30m", "1h", "1d", "1w", "1M"];
const WITH_SECONDS: &[&str] = &["1s", "1m", "5m", "15m", "30m", "1h", "1d", "1w", "1M"];

const CAPABILITIES: &[ExchangeCapability] = &[
    ExchangeCapability {
        id: ExchangeId::Binance,
        display_name: "Binance",
        max_points_per_page: 500,
        granularities: WITH_SECONDS,
    },
    ExchangeCapability {
        id: ExchangeId::Upbit,
        display_name: "Upbit",
        max_points_per_page: 200,
        granularities: &["1m", "5m", "15m", "30m", "1h", "1d"],
    },
    ExchangeCapability {
        id: ExchangeId::Bithumb,
        display_name: "Bithumb",
        max_points_per_page: 500,
        granularities: &["30m", "1h"],
    },
    ExchangeCapability {
        id: ExchangeId::Coinbase,
        display_name: "Coinbase",
        max_points_per_page: 100,
        granularities: &["1m", "5m", "15m", "1h", "1d"],
    },
    ExchangeCapability {
        id: ExchangeId::Huobi,
        display_name: "Huobi",
        max_points_per_page: 100,
        granularities: ALL_BUT_SECONDS,
    },
    ExchangeCapability {
        id: ExchangeId::Okx,
        display_name: "OKX",
        max_points_per_page: 100,
        granularities: WITH_SECONDS,
    },
    ExchangeCapability {
        id: ExchangeId::Gate,
        display_name: "Gate.io",
        max_points_per_page: 500,
        granularities: &["5m", "15m", "30m", "1h", "1d", "1w", "30d"],
    },
    ExchangeCapability {
        id: ExchangeId::Bybit,
        display_name: "Bybit",
        max_points_per_page: 150,
        granularities: ALL_BUT_SECONDS,
    },
    ExchangeCapability {
        id: ExchangeId::Kucoin,
        display_name: "Kucoin",
        max_points_per_page: 1000,
        granularities: ALL_BUT_SECONDS,
    },
    ExchangeCapability {
        id: ExchangeId::Mexc,
        display_name: "MEXC",
        max_points_per_page: 100,
        granularities: &["1m", "5m", "30m", "15m", "1h", "1d", "1M"],
    },
    ExchangeCapability {
        id: ExchangeId::Bitget,
        display_name: "Bitget",
        max_points_per_page: 200,
        granularities: ALL_BUT_SECONDS,
    },
];

impl ExchangeId {
    /// All exchanges in the capability table.
    pub const ALL: &'static [Self] = &[
        Self::Binance,
        Self::Upbit,
        Self::Bithumb,
        Self::Coinbase,
        Self::Huobi,
        Self::Okx,
        Self::Gate,
        Self::Bybit,
        Self::Kucoin,
        Self::Mexc,
        Self::Bitget,
    ];

    /// Stable lowercase identifier used by callers and registries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Upbit => "upbit",
            Self::Bithumb => "bithumb",
            Self::Coinbase => "coinbase",
            Self::Huobi => "huobi",
            Self::Okx => "okx",
            Self::Gate => "gate",
            Self::Bybit => "bybit",
            Self::Kucoin => "kucoin",
            Self::Mexc => "mexc",
            Self::Bitget => "bitget",
        }
    }

    /// Static capability record for this exchange.
    #[must_use]
    pub const fn capability(self) -> &'static ExchangeCapability {
        // CAPABILITIES is declared in variant order.
        &CAPABILITIES[self as usize]
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeId {
    type Err = OhlcvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| OhlcvError::unsupported_exchange(s))
    }
}

impl ExchangeCapability {
    /// Look up the capability record for an exchange identifier.
    ///
    /// # Errors
    /// Returns `UnsupportedExchange` if the identifier is unknown.
    pub fn lookup(exchange: &str) -> Result<&'static Self, OhlcvError> {
        exchange.parse::<ExchangeId>().map(ExchangeId::capability)
    }

    /// Supported granularities with their widths in seconds.
    pub fn supported_granularities(&self) -> impl Iterator<Item = Granularity> + '_ {
        self.granularities
            .iter()
            .filter_map(|label| Granularity::from_label(label))
    }

    /// Resolve a granularity label this exchange serves natively.
    ///
    /// # Errors
    /// Returns `UnsupportedGranularity` if the label is not in this exchange's set.
    pub fn granularity(&self, label: &str) -> Result<Granularity, OhlcvError> {
        self.supported_granularities()
            .find(|g| g.label == label)
            .ok_or_else(|| OhlcvError::UnsupportedGranularity {
                exchange: self.id.as_str().to_string(),
                granularity: label.to_string(),
            })
    }

    /// Validate a download request against the table before any network call.
    ///
    /// Checks run in order: exchange, input granularity, then that the
    /// output bucket is at least as wide as the input candle. A missing output
    /// width defaults to the input width. Returns the record, the input
    /// granularity and the resolved output width.
    ///
    /// # Errors
    /// Returns `UnsupportedExchange`, `UnsupportedGranularity`, or
    /// `InvalidGranularityOrdering`.
    pub fn validate(
        exchange: &str,
        input_granularity: &str,
        output_granularity_seconds: Option<i64>,
    ) -> Result<(&'static Self, Granularity, i64), OhlcvError> {
        let cap = Self::lookup(exchange)?;
        let input = cap.granularity(input_granularity)?;
        let output = output_granularity_seconds.unwrap_or(input.seconds);
        if output < input.seconds {
            return Err(OhlcvError::InvalidGranularityOrdering {
                input_seconds: input.seconds,
                output_seconds: output,
            });
        }
        Ok((cap, input, output))
    }
}
