//! candlewick-core
//!
//! Connector traits and time-series utilities shared across the candlewick
//! workspace.
//!
//! - `types`: the data model, capability table and error taxonomy.
//! - `connector`: the `ConnectivityClient` and `SpotPriceSource` traits.
//! - `pair`: pair symbol parsing and USDT market naming.
//! - `basis`: the USDT conversion basis handed to normalization.
//! - `timeseries`: window clipping, nearest lookup, normalization and resampling.
//!
//! Everything here is synchronous except the connector traits, which are
//! `async_trait` objects driven by the orchestrator on a Tokio runtime.
#![warn(missing_docs)]

/// USDT conversion basis and its provenance.
pub mod basis;
/// Exchange connectivity and spot-price traits.
pub mod connector;
/// Pair symbol parsing.
pub mod pair;
/// Time-series utilities for clipping, lookup, normalization and resampling.
pub mod timeseries;
pub mod types;

pub use basis::{BasisSeries, QuoteBasis};
pub use connector::{ConnectivityClient, SpotPriceSource};
pub use pair::{PairSymbol, USDT, direct_usdt_pair, inverse_usdt_pair, symbol_has_base};
pub use timeseries::lookup::nearest;
pub use timeseries::normalize::normalize;
pub use timeseries::resample::{bucket_start, resample};
pub use timeseries::window::{clip_and_dedup, total_volume};
pub use types::*;
