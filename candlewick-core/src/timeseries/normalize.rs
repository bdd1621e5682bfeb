use crate::basis::QuoteBasis;
use crate::{CandleRow, NormalizedRow, OhlcvError, RowIdentity};

/// Enrich candles with identity columns and USDT-denominated values.
///
/// Every OHLC and average field is multiplied by the row's basis price;
/// `volume_usdt = volume_base * average_price_usdt`.
///
/// # Errors
/// Returns `Err(OhlcvError::Data)` if a candle has no basis price within
/// `max_distance_seconds`.
pub fn normalize(
    candles: &[CandleRow],
    identity: &RowIdentity,
    basis: &QuoteBasis,
    max_distance_seconds: Option<i64>,
) -> Result<Vec<NormalizedRow>, OhlcvError> {
    candles
        .iter()
        .map(|c| {
            let rate = basis.price_at(c.open_time, max_distance_seconds).ok_or_else(|| {
                OhlcvError::Data(format!(
                    "no {} basis price near {}",
                    identity.quote, c.open_time
                ))
            })?;
            let average_price = c.average_price();
            let average_price_usdt = average_price * rate;
            Ok(NormalizedRow {
                exchange_name: identity.exchange_name.clone(),
                pair: identity.pair.clone(),
                base: identity.base.clone(),
                quote: identity.quote.clone(),
                open_time: c.open_time,
                average_price,
                open: c.open,
                close: c.close,
                high: c.high,
                low: c.low,
                volume_base: c.volume_base,
                quote_price_in_usdt: rate,
                average_price_usdt,
                open_usdt: c.open * rate,
                close_usdt: c.close * rate,
                high_usdt: c.high * rate,
                low_usdt: c.low * rate,
                volume_usdt: c.volume_base * average_price_usdt,
            })
        })
        .collect()
}
