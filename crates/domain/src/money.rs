//! Money value object.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fraction digits every amount is normalized to.
const SCALE: u32 = 2;

/// Errors raised by money construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount is not a number, is negative, or overflowed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency is not a 3-letter code.
    #[error("Invalid currency: '{0}' is not a 3-letter ISO code")]
    InvalidCurrency(String),

    /// A binary operation mixed two currencies.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    /// A subtraction would go below zero.
    #[error("Subtraction would result in a negative amount: {minuend} - {subtrahend}")]
    NegativeResult {
        minuend: Decimal,
        subtrahend: Decimal,
    },
}

/// A non-negative decimal amount bound to a currency.
///
/// Amounts are rounded half away from zero to two decimal places on
/// construction and after every operation, so intermediate precision never
/// survives. Money is immutable; every operation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyRepr")]
pub struct Money {
    amount: Decimal,
    currency: String,
}

#[derive(Deserialize)]
struct MoneyRepr {
    amount: Decimal,
    currency: String,
}

impl TryFrom<MoneyRepr> for Money {
    type Error = MoneyError;

    fn try_from(repr: MoneyRepr) -> Result<Self, Self::Error> {
        Money::from_decimal(repr.amount, &repr.currency)
    }
}

impl Money {
    /// Parses a money amount such as `"10.50"` in the given currency.
    pub fn new(amount: &str, currency: &str) -> Result<Self, MoneyError> {
        let parsed = Decimal::from_str(amount.trim())
            .map_err(|_| MoneyError::InvalidAmount(format!("'{amount}' is not numeric")))?;
        Self::from_decimal(parsed, currency)
    }

    /// Creates a money amount from a decimal value.
    pub fn from_decimal(amount: Decimal, currency: &str) -> Result<Self, MoneyError> {
        let currency = normalize_currency(currency)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::InvalidAmount(format!(
                "{amount} is negative"
            )));
        }
        Ok(Self {
            amount: normalize(amount)?,
            currency,
        })
    }

    /// Returns zero in the given currency.
    pub fn zero(currency: &str) -> Result<Self, MoneyError> {
        Self::from_decimal(Decimal::ZERO, currency)
    }

    /// Returns zero in this amount's currency.
    pub fn zeroed(&self) -> Money {
        Money {
            amount: Decimal::new(0, SCALE),
            currency: self.currency.clone(),
        }
    }

    /// Returns the amount, always scaled to two fraction digits.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the upper-case currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Adds another amount in the same currency.
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| MoneyError::InvalidAmount("addition overflowed".to_string()))?;
        self.with_amount(sum)
    }

    /// Subtracts another amount in the same currency.
    ///
    /// Fails with [`MoneyError::NegativeResult`] instead of going below zero.
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        if other.amount > self.amount {
            return Err(MoneyError::NegativeResult {
                minuend: self.amount,
                subtrahend: other.amount,
            });
        }
        self.with_amount(self.amount - other.amount)
    }

    /// Multiplies the amount by a quantity.
    pub fn multiply(&self, quantity: u32) -> Result<Money, MoneyError> {
        let product = self
            .amount
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| MoneyError::InvalidAmount("multiplication overflowed".to_string()))?;
        self.with_amount(product)
    }

    /// Returns true if this amount is strictly greater than `other`.
    pub fn greater_than(&self, other: &Money) -> Result<bool, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount > other.amount)
    }

    /// Returns true if this amount is strictly less than `other`.
    pub fn less_than(&self, other: &Money) -> Result<bool, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount < other.amount)
    }

    fn with_amount(&self, amount: Decimal) -> Result<Money, MoneyError> {
        Ok(Money {
            amount: normalize(amount)?,
            currency: self.currency.clone(),
        })
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Rounds to two fraction digits. `rescale` leaves the scale short when the
/// integer part leaves no room for two more digits, so such amounts fail.
fn normalize(amount: Decimal) -> Result<Decimal, MoneyError> {
    let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(SCALE);
    if rounded.scale() != SCALE {
        return Err(MoneyError::InvalidAmount(format!(
            "{amount} has too many digits to keep two decimal places"
        )));
    }
    Ok(rounded)
}

fn normalize_currency(currency: &str) -> Result<String, MoneyError> {
    let code = currency.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(MoneyError::InvalidCurrency(currency.to_string()));
    }
    Ok(code.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur(amount: &str) -> Money {
        Money::new(amount, "EUR").unwrap()
    }

    #[test]
    fn test_amount_is_normalized_to_two_places() {
        assert_eq!(eur("10.5").amount().to_string(), "10.50");
        assert_eq!(eur("7").amount().to_string(), "7.00");
        assert_eq!(eur("0").amount().to_string(), "0.00");
        assert_eq!(eur("1.005").amount().to_string(), "1.01");
        assert_eq!(eur("1.004").amount().to_string(), "1.00");
    }

    #[test]
    fn test_add() {
        let total = eur("10.50").add(&eur("5.25")).unwrap();
        assert_eq!(total.amount().to_string(), "15.75");
        assert_eq!(total.currency(), "EUR");
    }

    #[test]
    fn test_subtract_below_zero_fails() {
        let result = eur("10.50").subtract(&eur("20.00"));
        assert!(matches!(result, Err(MoneyError::NegativeResult { .. })));

        let rest = eur("20.00").subtract(&eur("10.50")).unwrap();
        assert_eq!(rest.amount(), dec!(9.50));
        assert!(eur("3.10").subtract(&eur("3.10")).unwrap().is_zero());
    }

    #[test]
    fn test_currency_mismatch() {
        let eur = Money::new("1.00", "EUR").unwrap();
        let usd = Money::new("1.00", "USD").unwrap();

        assert!(matches!(
            eur.add(&usd),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            eur.subtract(&usd),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            eur.greater_than(&usd),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            eur.less_than(&usd),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_multiply() {
        assert_eq!(eur("10.00").multiply(3).unwrap().amount(), dec!(30.00));
        assert!(eur("10.00").multiply(0).unwrap().is_zero());
        assert_eq!(eur("0.33").multiply(3).unwrap().amount().to_string(), "0.99");
    }

    #[test]
    fn test_comparisons() {
        assert!(eur("2.00").greater_than(&eur("1.99")).unwrap());
        assert!(!eur("2.00").greater_than(&eur("2.00")).unwrap());
        assert!(eur("1.99").less_than(&eur("2.00")).unwrap());
        assert_eq!(eur("2.5"), eur("2.50"));
        assert_ne!(eur("2.50"), Money::new("2.50", "USD").unwrap());
    }

    #[test]
    fn test_invalid_amounts() {
        assert!(matches!(
            Money::new("abc", "EUR"),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(
            Money::new("-0.01", "EUR"),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(
            Money::new("", "EUR"),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_amount_without_room_for_two_places_is_rejected() {
        for amount in [
            "79228162514264337593543950335",
            "1000000000000000000000000000",
        ] {
            assert!(matches!(
                Money::new(amount, "EUR"),
                Err(MoneyError::InvalidAmount(_))
            ));
        }

        let largest = eur("100000000000000000000000000");
        assert_eq!(largest.amount().scale(), 2);
        assert!(matches!(
            largest.multiply(10),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(
            largest.add(&largest).and_then(|m| m.multiply(5)),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_invalid_currencies() {
        for code in ["", "EU", "EURO", "E1R"] {
            assert!(matches!(
                Money::new("1.00", code),
                Err(MoneyError::InvalidCurrency(_))
            ));
        }
    }

    #[test]
    fn test_currency_is_upper_cased() {
        assert_eq!(Money::new("1.00", "usd").unwrap().currency(), "USD");
    }

    #[test]
    fn test_zero() {
        let zero = Money::zero("EUR").unwrap();
        assert!(zero.is_zero());
        assert_eq!(eur("4.20").zeroed(), zero);
        assert_eq!(zero.to_string(), "0.00 EUR");
    }

    #[test]
    fn test_serialization_revalidates() {
        let money = eur("12.30");
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, r#"{"amount":"12.30","currency":"EUR"}"#);
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money);

        let negative = r#"{"amount":"-1.00","currency":"EUR"}"#;
        assert!(serde_json::from_str::<Money>(negative).is_err());
    }
}
