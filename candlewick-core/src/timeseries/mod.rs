//! Time-series utilities shared by the fetcher and the orchestrator.
//!
//! Modules include:
//! - `window`: clip paginated candles to the requested window and dedup them
//! - `lookup`: nearest-timestamp search over a basis price series
//! - `normalize`: enrich candles with identity and USDT columns
//! - `resample`: bucket normalized rows into the output granularity
/// Nearest-timestamp lookup over sorted price series.
pub mod lookup;
/// Row enrichment with USDT-denominated columns.
pub mod normalize;
/// Fixed-width, epoch-aligned resampling with per-column aggregation.
pub mod resample;
/// Window clipping and timestamp de-duplication.
pub mod window;
