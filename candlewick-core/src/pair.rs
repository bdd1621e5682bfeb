//! Pair symbol parsing and market-listing filters.

use crate::OhlcvError;

/// Quote currency every row is converted into.
pub const USDT: &str = "USDT";

/// A parsed `BASE/QUOTE` or `BASE/QUOTE:SETTLE` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSymbol {
    raw: String,
    base: String,
    quote: String,
}

impl PairSymbol {
    /// Parse a pair string. The `:SETTLE` suffix of derivative pairs is kept in
    /// the raw symbol but stripped from the quote currency.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the symbol has no `/` or an empty side.
    pub fn parse(raw: &str) -> Result<Self, OhlcvError> {
        let (base, rest) = raw
            .split_once('/')
            .ok_or_else(|| OhlcvError::InvalidArg(format!("pair '{raw}' is not BASE/QUOTE")))?;
        let quote = rest.split_once(':').map_or(rest, |(q, _)| q);
        if base.is_empty() || quote.is_empty() {
            return Err(OhlcvError::InvalidArg(format!(
                "pair '{raw}' has an empty base or quote"
            )));
        }
        Ok(Self {
            raw: raw.to_string(),
            base: base.to_string(),
            quote: quote.to_string(),
        })
    }

    /// Symbol exactly as requested.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Base currency.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Quote currency, settle suffix stripped.
    #[must_use]
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// True when the quote is already USDT.
    #[must_use]
    pub fn is_usdt_quoted(&self) -> bool {
        self.quote == USDT
    }
}

/// `{quote}/USDT`, the market pricing the quote directly in USDT.
#[must_use]
pub fn direct_usdt_pair(quote: &str) -> String {
    format!("{quote}/{USDT}")
}

/// `USDT/{quote}`, the market pricing USDT in the quote currency.
#[must_use]
pub fn inverse_usdt_pair(quote: &str) -> String {
    format!("{USDT}/{quote}")
}

/// True when a listed `symbol` trades `base_token` as its base currency.
///
/// Multiplier listings such as `1000PEPE/USDT:USDT` match when their base
/// contains the token, which can over-match short tokens.
#[must_use]
pub fn symbol_has_base(symbol: &str, base_token: &str) -> bool {
    let base = symbol.split_once('/').map_or(symbol, |(b, _)| b);
    if symbol.contains("1000") {
        base.contains(base_token)
    } else {
        base == base_token
    }
}
