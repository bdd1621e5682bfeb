use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the candlewick workspace.
///
/// Input validation failures surface before any network activity. Terminal
/// pipeline failures (`NoDataForPeriod`, `QuoteConversionUnavailable`) abort
/// the call; transport failures are tagged so the spot-price fallback can
/// decide whether to retry.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OhlcvError {
    /// The exchange identifier is not present in the capability table.
    #[error("unsupported exchange: {exchange}")]
    UnsupportedExchange {
        /// Identifier that was requested (e.g. "binance").
        exchange: String,
    },

    /// The exchange does not serve the requested input granularity.
    #[error("granularity {granularity} is not supported by {exchange}")]
    UnsupportedGranularity {
        /// Exchange identifier.
        exchange: String,
        /// Granularity label that was requested (e.g. "4h").
        granularity: String,
    },

    /// The output granularity is finer than the input granularity.
    #[error(
        "output granularity ({output_seconds}s) must be equal or larger than input granularity ({input_seconds}s)"
    )]
    InvalidGranularityOrdering {
        /// Input candle width in seconds.
        input_seconds: i64,
        /// Requested output bucket width in seconds.
        output_seconds: i64,
    },

    /// The pair has zero aggregate base volume in the requested window.
    #[error("no volume data for this time period: {pair}")]
    NoDataForPeriod {
        /// Pair that was fetched.
        pair: String,
    },

    /// Direct, inverse and external spot conversion all failed.
    #[error("no USDT conversion available for {quote}: {reason}")]
    QuoteConversionUnavailable {
        /// Quote currency that could not be converted.
        quote: String,
        /// Why the terminal step failed.
        reason: String,
    },

    /// The exchange is known but no connectivity client was registered for it.
    #[error("no connectivity client registered for {exchange}")]
    ClientNotRegistered {
        /// Exchange identifier.
        exchange: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A connectivity client returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector (exchange) name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An HTTP endpoint answered with a non-success status.
    #[error("http status {status}")]
    HttpStatus {
        /// Status code returned by the endpoint.
        status: u16,
    },

    /// The HTTP request could not be completed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Issues with the returned data (missing fields, malformed payloads).
    #[error("data issue: {0}")]
    Data(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl OhlcvError {
    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `UnsupportedExchange` error.
    pub fn unsupported_exchange(exchange: impl Into<String>) -> Self {
        Self::UnsupportedExchange {
            exchange: exchange.into(),
        }
    }

    /// Helper: build a `QuoteConversionUnavailable` error.
    pub fn conversion_unavailable(quote: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QuoteConversionUnavailable {
            quote: quote.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for transient HTTP failures worth retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpStatus { .. } | Self::Transport(_))
    }
}
