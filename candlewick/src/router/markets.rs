use candlewick_core::{ExchangeCapability, OhlcvError, symbol_has_base};

use crate::Candlewick;
use crate::core::tag_err;

impl Candlewick {
    /// List the exchange's symbols that trade `base` as their base currency.
    ///
    /// Multiplier listings (symbols containing `1000`) match when their base
    /// contains the token, so short tokens may over-match there.
    ///
    /// # Errors
    /// `UnsupportedExchange`, `ClientNotRegistered`, or the client's
    /// `load_markets` failure.
    pub async fn find_pairs(&self, exchange: &str, base: &str) -> Result<Vec<String>, OhlcvError> {
        let cap = ExchangeCapability::lookup(exchange)?;
        let client = self.client(cap.id)?;
        let markets = client
            .load_markets()
            .await
            .map_err(|e| tag_err(client.name(), e))?;
        Ok(markets
            .into_iter()
            .filter(|symbol| symbol_has_base(symbol, base))
            .collect())
    }
}
