//! EUR amounts using decimal arithmetic.
//!
//! The store sells in a single currency, so `Money` carries no currency code.
//! Display formatting follows the Portuguese (pt-PT) conventions a browser
//! uses for `toLocaleString("pt-PT", { style: "currency", currency: "EUR" })`.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// No-break space used by pt-PT between digit groups and before the symbol.
const NBSP: char = '\u{a0}';

/// pt-PT only groups thousands once the integer part has this many digits.
const MIN_GROUPING_DIGITS: usize = 5;

/// An amount of euros.
///
/// # Example
///
/// ```rust
/// # use wine_store_core::Money;
/// # use rust_decimal::Decimal;
/// let price = Money::new(Decimal::new(1250, 2));
/// assert_eq!(price.format_eur(), "12,50\u{a0}€");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero euros.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// ISO 4217 code of the store currency.
    pub const CURRENCY_CODE: &'static str = "EUR";

    /// Create an amount from a decimal number of euros.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal amount in euros.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format for display with pt-PT conventions, e.g. `12,00 €` or
    /// `12 345,67 €` (both spaces are U+00A0).
    ///
    /// Amounts are rounded to cents, halves away from zero.
    #[must_use]
    pub fn format_eur(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let mut out = String::with_capacity(digits.len() + 8);
        if negative {
            out.push('-');
        }
        out.push_str(&group_thousands(int_part));
        out.push(',');
        out.push_str(frac_part);
        out.push(NBSP);
        out.push('€');
        out
    }
}

fn group_thousands(int_part: &str) -> String {
    if int_part.len() < MIN_GROUPING_DIGITS {
        return int_part.to_string();
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let lead = int_part.len() % 3;
    for (i, ch) in int_part.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push(NBSP);
        }
        grouped.push(ch);
    }
    grouped
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_eur())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Clamp an overflowed result to the bound on the side it overflowed.
const fn saturate(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}

/// Saturates at `Decimal::MAX` / `Decimal::MIN` instead of overflowing.
impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(
            self.0
                .checked_add(rhs.0)
                .unwrap_or_else(|| saturate(self.0.is_sign_negative())),
        )
    }
}

/// Saturates at `Decimal::MAX` / `Decimal::MIN` instead of overflowing.
impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, qty: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(qty))
                .unwrap_or_else(|| saturate(self.0.is_sign_negative())),
        )
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur(s: &str) -> String {
        s.replace(' ', "\u{a0}")
    }

    #[test]
    fn test_format_eur_basic() {
        assert_eq!(Money::ZERO.format_eur(), eur("0,00 €"));
        assert_eq!(Money::from_cents(1200).format_eur(), eur("12,00 €"));
        assert_eq!(Money::from_cents(550).format_eur(), eur("5,50 €"));
        assert_eq!(Money::new(Decimal::new(255, 1)).format_eur(), eur("25,50 €"));
    }

    #[test]
    fn test_format_eur_grouping_starts_at_five_digits() {
        assert_eq!(Money::from_cents(123_450).format_eur(), eur("1234,50 €"));
        assert_eq!(Money::from_cents(1_234_567).format_eur(), eur("12 345,67 €"));
        assert_eq!(
            Money::from_cents(123_456_789).format_eur(),
            eur("1 234 567,89 €")
        );
    }

    #[test]
    fn test_format_eur_rounds_half_away_from_zero() {
        assert_eq!(Money::new(Decimal::new(12_345, 3)).format_eur(), eur("12,35 €"));
        assert_eq!(Money::new(Decimal::new(-12_345, 3)).format_eur(), eur("-12,35 €"));
        assert_eq!(Money::new(Decimal::new(-1, 3)).format_eur(), eur("0,00 €"));
    }

    #[test]
    fn test_arithmetic() {
        let total: Money = [Money::from_cents(1000) * 2, Money::from_cents(550) * 1]
            .into_iter()
            .sum();
        assert_eq!(total, Money::new(Decimal::new(255, 1)));
        assert_eq!(Vec::<Money>::new().into_iter().sum::<Money>(), Money::ZERO);
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max * 2, max);
        assert_eq!(max * u32::MAX, max);
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!([max, max, max].into_iter().sum::<Money>(), max);

        let min = Money::new(Decimal::MIN);
        assert_eq!(min * 3, min);
        assert_eq!(min + Money::from_cents(-1), min);
    }

    #[test]
    fn test_format_eur_at_decimal_max() {
        let text = Money::new(Decimal::MAX).format_eur();
        assert!(text.starts_with("79\u{a0}228\u{a0}162"));
        assert!(text.ends_with(",00\u{a0}€"));
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_number: Money = serde_json::from_str("5.5").unwrap();
        let from_string: Money = serde_json::from_str("\"5.5\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Money::from_cents(550));
    }
}
