//! Currency-quote normalization.
//!
//! Some currency instruments are quoted upstream as "USD per foreign unit"
//! (EUR/USD) while the display convention is "foreign units per USD". The
//! set of affected symbols is configuration, not inference: the upstream
//! quoting direction cannot be reliably derived from symbol names.

use std::collections::HashSet;

use crate::{Symbol, ValidationError};

/// Environment override: comma-separated symbols replacing the built-in set.
pub const INVERT_SYMBOLS_ENV: &str = "PULSE_INVERT_SYMBOLS";

const DEFAULT_INVERTED: [&str; 3] = ["EURUSD=X", "GBPUSD=X", "AUDUSD=X"];

/// Symbols whose quoted prices must be reciprocated for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InversionSet {
    symbols: HashSet<Symbol>,
}

impl Default for InversionSet {
    fn default() -> Self {
        let symbols = DEFAULT_INVERTED
            .iter()
            .map(|raw| Symbol::parse(raw).expect("built-in inversion symbols are valid"))
            .collect();
        Self { symbols }
    }
}

impl InversionSet {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Empty set: no instrument gets inverted.
    pub fn none() -> Self {
        Self {
            symbols: HashSet::new(),
        }
    }

    /// Built-in set, overridable via the `PULSE_INVERT_SYMBOLS` environment
    /// variable (comma-separated ticker list).
    pub fn from_env() -> Result<Self, ValidationError> {
        match std::env::var(INVERT_SYMBOLS_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                let symbols = raw
                    .split(',')
                    .map(Symbol::parse)
                    .collect::<Result<HashSet<_>, _>>()?;
                Ok(Self { symbols })
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Reciprocal of a quoted price; exactly-zero values pass through
/// un-inverted rather than producing an error.
pub fn invert_price(value: f64) -> f64 {
    if value == 0.0 {
        value
    } else {
        value.recip()
    }
}

/// Rewrite a display name from the `X/USD` convention to `USD/X`.
///
/// Names without the `/USD` suffix are returned unchanged.
pub fn rewrite_inverted_name(name: &str) -> String {
    match name.strip_suffix("/USD") {
        Some(base) if !base.is_empty() => format!("USD/{base}"),
        _ => name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_contains_built_in_pairs() {
        let set = InversionSet::default();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&Symbol::parse("EURUSD=X").expect("valid")));
        assert!(!set.contains(&Symbol::parse("JPY=X").expect("valid")));
    }

    #[test]
    fn inverts_nonzero_prices() {
        assert!((invert_price(1.25) - 0.8).abs() < 1e-12);
        assert!((invert_price(0.5) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_price_passes_through_uninverted() {
        assert_eq!(invert_price(0.0), 0.0);
    }

    #[test]
    fn rewrites_usd_suffix_names() {
        assert_eq!(rewrite_inverted_name("EUR/USD"), "USD/EUR");
        assert_eq!(rewrite_inverted_name("Euro/USD"), "USD/Euro");
    }

    #[test]
    fn leaves_other_names_untouched() {
        assert_eq!(rewrite_inverted_name("USD/JPY"), "USD/JPY");
        assert_eq!(rewrite_inverted_name("Gold"), "Gold");
        assert_eq!(rewrite_inverted_name("/USD"), "/USD");
    }

    #[test]
    fn explicit_set_overrides_default() {
        let set = InversionSet::new([Symbol::parse("NZDUSD=X").expect("valid")]);
        assert!(set.contains(&Symbol::parse("NZDUSD=X").expect("valid")));
        assert!(!set.contains(&Symbol::parse("EURUSD=X").expect("valid")));
    }
}
