//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON floats and are displayed as pre-formatted
//! labels such as `"$79.99"`. Summaries persisted before numeric amounts were
//! carried only have the label, so [`parse_price_label`] recovers an amount
//! from it.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Everything that is not a digit, a dot or a minus sign.
static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]+").expect("Invalid regex"));

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price from a catalog float, rounded to cents.
    ///
    /// Returns `None` for non-finite values.
    #[must_use]
    pub fn from_f64(amount: f64) -> Option<Self> {
        Decimal::from_f64(amount).map(|amount| Self::new(amount.round_dp(2), CurrencyCode::USD))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

/// Extract a numeric amount from a pre-formatted price label.
///
/// Every character other than ASCII digits, `.` and `-` is stripped and the
/// remainder parsed as a decimal. A remainder that does not parse (empty,
/// `"-"`, several dots) yields zero. Comma decimal separators are stripped,
/// so `"12,50 €"` reads as `1250`.
#[must_use]
pub fn parse_price_label(label: &str) -> Decimal {
    let stripped = NON_NUMERIC.replace_all(label, "");
    Decimal::from_str(&stripped).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_label() {
        assert_eq!(parse_price_label("$79.99"), Decimal::new(7999, 2));
        assert_eq!(parse_price_label("$1,299.00"), Decimal::new(129_900, 2));
        assert_eq!(parse_price_label("-$5.50"), Decimal::new(-550, 2));
    }

    #[test]
    fn test_parse_unparseable_label_is_zero() {
        assert_eq!(parse_price_label(""), Decimal::ZERO);
        assert_eq!(parse_price_label("free"), Decimal::ZERO);
        assert_eq!(parse_price_label("1.2.3"), Decimal::ZERO);
    }

    #[test]
    fn test_comma_decimal_is_misread() {
        assert_eq!(parse_price_label("12,50 €"), Decimal::new(1250, 0));
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let price = Price::from_f64(9.99).unwrap();
        assert_eq!(price.display(), "$9.99");
        let price = Price::new(Decimal::new(5, 0), CurrencyCode::EUR);
        assert_eq!(price.to_string(), "€5.00");
    }

    #[test]
    fn test_from_f64_rejects_nan() {
        assert!(Price::from_f64(f64::NAN).is_none());
    }
}
