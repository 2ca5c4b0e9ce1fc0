use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Threshold under which a balance or a pairwise debt counts as settled.
///
/// Shared by every "is this zero" decision: pairwise netting, the removal
/// check, custom split sums and the conservation check.
pub const SETTLEMENT_TOLERANCE: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

/// Largest amount the ledger accepts, for a single record and for the sum of
/// every amount in a snapshot. Keeps all balance arithmetic far from the
/// `Decimal` range.
pub const MAX_AMOUNT: Money =
    Money(Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0));

/// Max number of fractional digits accepted when parsing user input.
const MAX_FRACTION_DIGITS: usize = 4;

/// Signed money amount backed by a fixed-point decimal.
///
/// Use this type for **all** monetary values in the ledger (expense amounts,
/// split shares, payments, balances) to avoid binary floating-point drift.
///
/// The value is signed:
/// - positive = receivable / amount owed to someone
/// - negative = payable / overpayment
///
/// # Examples
///
/// ```rust
/// use ledger::Money;
///
/// let amount: Money = "12,5".parse().unwrap();
/// assert_eq!(amount, Money::from_cents(1250));
/// assert_eq!(amount.to_string(), "12.50");
/// assert!("12.34567".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates an amount from integer cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    #[must_use]
    pub fn abs(self) -> Money {
        Money(self.0.abs())
    }

    /// Returns `true` if the amount is within [`SETTLEMENT_TOLERANCE`] of zero.
    #[must_use]
    pub fn is_settled(self) -> bool {
        self.abs() <= SETTLEMENT_TOLERANCE
    }

    /// Rounds to cents, ties to even.
    #[must_use]
    pub fn round_cents(self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Divides the amount into `parts` equal shares, rounded to cents.
    ///
    /// Returns `None` when `parts` is 0.
    #[must_use]
    pub fn share_of(self, parts: usize) -> Option<Money> {
        let parts = u64::try_from(parts).ok().filter(|p| *p > 0)?;
        self.0
            .checked_div(Decimal::from(parts))
            .map(|share| Money(share).round_cents())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self.round_cents().0;
        rounded.rescale(2);
        write!(f, "{rounded}")
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl TryFrom<f64> for Money {
    type Error = LedgerError;

    /// Converts a float coming from an untyped source, keeping at most
    /// four fractional digits. `NaN` and infinities are rejected.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(LedgerError::InvalidAmount(format!(
                "non-finite amount: {value}"
            )));
        }
        let decimal = Decimal::try_from(value)
            .map_err(|_| LedgerError::InvalidAmount(format!("amount out of range: {value}")))?;
        Ok(Money(decimal.round_dp(MAX_FRACTION_DIGITS as u32).normalize()))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 4 fractional digits (rejects `12.34567`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || LedgerError::InvalidAmount("empty amount".to_string());
        let invalid = || LedgerError::InvalidAmount(format!("invalid amount: {s}"));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim().replace(',', ".");
        if rest.is_empty() {
            return Err(empty());
        }

        let (units, fraction) = match rest.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (rest.as_str(), ""),
        };

        if units.is_empty() || !units.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(LedgerError::InvalidAmount("too many decimals".to_string()));
        }

        let normalized = if fraction.is_empty() {
            units.to_string()
        } else {
            format!("{units}.{fraction}")
        };
        let value = Decimal::from_str(&normalized)
            .map_err(|_| LedgerError::InvalidAmount("amount too large".to_string()))?;

        Ok(Money(if negative { -value } else { value }))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Money::ZERO.to_string(), "0.00");
        assert_eq!(Money::from_cents(1).to_string(), "0.01");
        assert_eq!(Money::new(dec!(5)).to_string(), "5.00");
        assert_eq!(Money::new(dec!(-10.5)).to_string(), "-10.50");
        assert_eq!(Money::new(dec!(33.3333)).to_string(), "33.33");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap(), Money::from_cents(1000));
        assert_eq!("10.5".parse::<Money>().unwrap(), Money::from_cents(1050));
        assert_eq!("10,50".parse::<Money>().unwrap(), Money::from_cents(1050));
        assert_eq!("-0.01".parse::<Money>().unwrap(), Money::from_cents(-1));
        assert_eq!("+1.00".parse::<Money>().unwrap(), Money::from_cents(100));
        assert_eq!("  0.009 ".parse::<Money>().unwrap(), Money::new(dec!(0.009)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
        assert_eq!(
            "12.34567".parse::<Money>(),
            Err(LedgerError::InvalidAmount("too many decimals".to_string()))
        );
    }

    #[test]
    fn float_conversion_rejects_non_finite() {
        assert!(Money::try_from(f64::NAN).is_err());
        assert!(Money::try_from(f64::INFINITY).is_err());
        assert_eq!(Money::try_from(12.5).unwrap(), Money::new(dec!(12.5)));
    }

    #[test]
    fn tolerance_boundary() {
        assert!(Money::new(dec!(0.01)).is_settled());
        assert!(Money::new(dec!(-0.009)).is_settled());
        assert!(!Money::new(dec!(0.011)).is_settled());
        assert!(!Money::new(dec!(-0.011)).is_settled());
    }

    #[test]
    fn max_amount_is_one_quadrillion() {
        assert_eq!(MAX_AMOUNT, Money::new(dec!(1000000000000000)));
        assert_eq!(MAX_AMOUNT.to_string(), "1000000000000000.00");
    }

    #[test]
    fn checked_add_detects_overflow() {
        let huge = Money::new(Decimal::MAX);
        assert_eq!(huge.checked_add(Money::new(dec!(1))), None);
        assert_eq!(
            MAX_AMOUNT.checked_add(MAX_AMOUNT),
            Some(Money::new(dec!(2000000000000000)))
        );
    }

    #[test]
    fn equal_shares_round_to_cents() {
        assert_eq!(Money::from_cents(10000).share_of(3), Some(Money::from_cents(3333)));
        assert_eq!(Money::from_cents(100).share_of(0), None);
        // 0.05 / 2 = 0.025 -> ties to even
        assert_eq!(Money::from_cents(5).share_of(2), Some(Money::from_cents(2)));
    }
}
