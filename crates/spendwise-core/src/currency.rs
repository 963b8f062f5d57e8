//! Currency conversion for display
//!
//! Amounts are stored in a single base currency and converted when shown.
//! Rates come from an injected [`RateLookup`]; when it has no answer the
//! configured fallback table is used.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::CurrencyConfig;
use crate::error::Result;

/// Source of live exchange rates
pub trait RateLookup: Send + Sync {
    /// Units of `target` per one unit of `base`, or None if unknown
    fn rate(&self, base: &str, target: &str) -> Result<Option<Decimal>>;
}

/// Fixed rates from one base currency
#[derive(Debug, Clone, Default)]
pub struct StaticRates {
    base: String,
    rates: BTreeMap<String, Decimal>,
}

impl StaticRates {
    pub fn new(base: impl Into<String>, rates: BTreeMap<String, Decimal>) -> Self {
        Self {
            base: normalize_code(&base.into()),
            rates: rates
                .into_iter()
                .map(|(code, rate)| (normalize_code(&code), rate))
                .collect(),
        }
    }
}

impl RateLookup for StaticRates {
    fn rate(&self, base: &str, target: &str) -> Result<Option<Decimal>> {
        if normalize_code(base) != self.base {
            return Ok(None);
        }
        Ok(self.rates.get(&normalize_code(target)).copied())
    }
}

/// Converts base-currency amounts into a target currency
#[derive(Clone)]
pub struct CurrencyConverter {
    base: String,
    fallback_rates: BTreeMap<String, Decimal>,
    lookup: Option<Arc<dyn RateLookup>>,
}

impl std::fmt::Debug for CurrencyConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyConverter")
            .field("base", &self.base)
            .field("fallback_rates", &self.fallback_rates)
            .field("has_lookup", &self.lookup.is_some())
            .finish()
    }
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::from_config(&CurrencyConfig::default())
    }
}

impl CurrencyConverter {
    /// Converter using only the configured fallback table
    pub fn from_config(config: &CurrencyConfig) -> Self {
        Self {
            base: normalize_code(&config.base),
            fallback_rates: config.fallback_rates.clone(),
            lookup: None,
        }
    }

    /// Consult `lookup` before the fallback table
    pub fn with_lookup(mut self, lookup: Arc<dyn RateLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Units of `target` per one unit of the base currency
    ///
    /// Same currency is 1. A lookup error is logged and treated as a miss;
    /// an unknown currency converts at 1.
    pub fn rate(&self, target: &str) -> Decimal {
        let target = normalize_code(target);
        if target == self.base {
            return Decimal::ONE;
        }

        if let Some(lookup) = &self.lookup {
            match lookup.rate(&self.base, &target) {
                Ok(Some(rate)) => return rate,
                Ok(None) => {}
                Err(e) => {
                    warn!(base = %self.base, target = %target, error = %e, "Rate lookup failed, using fallback");
                }
            }
        }

        match self.fallback_rates.get(&target) {
            Some(rate) => *rate,
            None => {
                debug!(base = %self.base, target = %target, "No rate known, converting at 1");
                Decimal::ONE
            }
        }
    }

    /// Convert a base-currency amount, rounded to 2 decimals
    ///
    /// Saturates at the bounds of `Decimal`.
    pub fn convert(&self, amount: Decimal, target: &str) -> Decimal {
        amount.saturating_mul(self.rate(target)).round_dp(2)
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Display symbol for a currency code (`$` when unknown)
pub fn currency_symbol(code: &str) -> &'static str {
    match normalize_code(code).as_str() {
        "USD" => "$",
        "INR" => "₹",
        "GBP" => "£",
        "EUR" => "€",
        "JPY" => "¥",
        _ => "$",
    }
}

/// Format an amount with its currency symbol, e.g. "₹1250.50"
pub fn format_money(amount: Decimal, code: &str) -> String {
    format!("{}{:.2}", currency_symbol(code), amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    struct BrokenLookup;

    impl RateLookup for BrokenLookup {
        fn rate(&self, _base: &str, _target: &str) -> Result<Option<Decimal>> {
            Err(Error::DataUnavailable("rate service down".to_string()))
        }
    }

    #[test]
    fn test_same_currency_is_identity() {
        let converter = CurrencyConverter::default();
        assert_eq!(converter.convert(dec!(123.456), "inr"), dec!(123.46));
    }

    #[test]
    fn test_fallback_rates() {
        let converter = CurrencyConverter::default();
        assert_eq!(converter.convert(dec!(1000), "USD"), dec!(12.00));
        assert_eq!(converter.convert(dec!(1000), "JPY"), dec!(1750));
        assert_eq!(converter.rate("XYZ"), Decimal::ONE);
    }

    #[test]
    fn test_convert_saturates() {
        let converter = CurrencyConverter::default();
        assert_eq!(converter.convert(Decimal::MAX, "JPY"), Decimal::MAX);
        assert_eq!(converter.convert(Decimal::MIN, "JPY"), Decimal::MIN);
    }

    #[test]
    fn test_lookup_takes_precedence() {
        let mut rates = BTreeMap::new();
        rates.insert("usd".to_string(), dec!(0.0125));
        let converter = CurrencyConverter::default()
            .with_lookup(Arc::new(StaticRates::new("INR", rates)));

        assert_eq!(converter.rate("USD"), dec!(0.0125));
        // Not in the lookup, falls back to the table
        assert_eq!(converter.rate("EUR"), dec!(0.011));
    }

    #[test]
    fn test_lookup_error_falls_back() {
        let converter = CurrencyConverter::default().with_lookup(Arc::new(BrokenLookup));
        assert_eq!(converter.rate("GBP"), dec!(0.0095));
    }

    #[test]
    fn test_static_rates_other_base() {
        let rates = StaticRates::new("USD", BTreeMap::from([("EUR".to_string(), dec!(0.9))]));
        assert_eq!(rates.rate("INR", "EUR").unwrap(), None);
        assert_eq!(rates.rate("usd", "eur").unwrap(), Some(dec!(0.9)));
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(currency_symbol("INR"), "₹");
        assert_eq!(currency_symbol("gbp"), "£");
        assert_eq!(currency_symbol("CHF"), "$");
        assert_eq!(format_money(dec!(12.5), "EUR"), "€12.50");
    }
}
