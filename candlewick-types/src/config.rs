//! Configuration types shared across the orchestrator and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::rows::ResampleRules;

/// Backoff configuration for retrying the external spot-price lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Minimum backoff delay in milliseconds.
    pub min_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor to increase delay after each failure (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 5_000,
            max_backoff_ms: 5_000,
            factor: 1,
            jitter_percent: 0,
        }
    }
}

impl BackoffConfig {
    /// Base delay (before jitter) for the given zero-based retry attempt.
    #[must_use]
    pub fn base_delay_ms(&self, attempt: u32) -> u64 {
        let factor = u64::from(self.factor.max(1));
        let mut delay = self.min_backoff_ms;
        for _ in 0..attempt {
            delay = delay.saturating_mul(factor);
            if delay >= self.max_backoff_ms {
                return self.max_backoff_ms.max(self.min_backoff_ms);
            }
        }
        delay.min(self.max_backoff_ms.max(self.min_backoff_ms))
    }
}

/// How far a basis-series timestamp may sit from a row timestamp and still
/// be used as that row's conversion price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BasisTolerance {
    /// Accept the nearest point however far away it is.
    Unbounded,
    /// Accept points within `n` input candles of the row.
    Candles(u32),
    /// Accept points within a fixed duration of the row.
    Fixed(Duration),
}

impl Default for BasisTolerance {
    fn default() -> Self {
        Self::Unbounded
    }
}

impl BasisTolerance {
    /// Maximum accepted distance in seconds for the given input granularity.
    /// `None` means unbounded.
    #[must_use]
    pub fn max_distance_seconds(self, granularity_seconds: i64) -> Option<i64> {
        match self {
            Self::Unbounded => None,
            Self::Candles(n) => Some(granularity_seconds.saturating_mul(i64::from(n))),
            Self::Fixed(d) => Some(i64::try_from(d.as_secs()).unwrap_or(i64::MAX)),
        }
    }
}

/// Global configuration for the `Candlewick` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Delay between consecutive page requests to stay under provider rate limits.
    pub page_delay: Duration,
    /// Backoff applied between spot-price retries.
    pub spot_backoff: BackoffConfig,
    /// Maximum spot-price attempts; `None` retries until success.
    pub spot_max_attempts: Option<u32>,
    /// Nearest-timestamp tolerance when matching basis prices to rows.
    /// Unbounded by default; a bound makes a gapped quote market fall through
    /// to the next conversion step.
    pub basis_tolerance: BasisTolerance,
    /// Give synthesized empty buckets zero volume instead of a missing value.
    pub zero_fill_empty_volume: bool,
    /// Per-column aggregation rules used by the resampler.
    pub resample_rules: ResampleRules,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_millis(500),
            spot_backoff: BackoffConfig::default(),
            spot_max_attempts: None,
            basis_tolerance: BasisTolerance::default(),
            zero_fill_empty_volume: false,
            resample_rules: ResampleRules::default(),
        }
    }
}
