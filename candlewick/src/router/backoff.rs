use rand::Rng;

/// Delay before the next spot-price retry: `base_ms` plus a random share of
/// up to `jitter_percent` of it, in milliseconds. Saturates instead of
/// overflowing.
pub fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    let span = (base_ms.saturating_mul(u64::from(jitter_percent)) / 100).max(1);
    base_ms.saturating_add(rand::rng().random_range(0..span))
}
