//! Re-export of the shared data model from `candlewick-types`.
// Consolidated re-exports so downstream crates can depend on `candlewick-core` only

pub use candlewick_types::{
    Aggregation, BackoffConfig, BasisSource, BasisTolerance, CandleRow, DownloadConfig,
    DownloadReport, ExchangeCapability, ExchangeId, GRANULARITIES, Granularity, NormalizedRow,
    NumericColumn, OhlcvError, OutputBucket, ResampleRules, RowIdentity,
};
