//! Candlewick data model, exchange capability table, configuration and error
//! taxonomy shared by every crate in the workspace.
#![warn(missing_docs)]

mod capability;
mod config;
mod error;
mod reports;
mod rows;

pub use capability::{ExchangeCapability, ExchangeId, GRANULARITIES, Granularity};
pub use config::{BackoffConfig, BasisTolerance, DownloadConfig};
pub use error::OhlcvError;
pub use reports::{BasisSource, DownloadReport};
pub use rows::{
    Aggregation, CandleRow, NormalizedRow, NumericColumn, OutputBucket, ResampleRules,
    RowIdentity,
};
