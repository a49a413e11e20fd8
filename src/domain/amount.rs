use std::{cmp::Ordering, fmt, str::FromStr};

/// A validated monetary amount: finite and non-negative.
///
/// Balances, tier bounds and deposit limits are all amounts. Because NaN and
/// the infinities are excluded at construction, amounts are totally ordered.
///
/// # Examples
///
/// ```
/// use savings_config::Amount;
///
/// let amount = Amount::new(50_000.0).unwrap();
/// assert_eq!(amount.successor(), Some(Amount::new(50_001.0).unwrap()));
/// assert!(Amount::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Amount(f64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0.0);

    /// The unit step between the upper bound of one tier and the lower bound
    /// of the next.
    pub const ONE: Self = Self(1.0);

    /// Creates a new amount.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAmountError`] if the value is negative, NaN or
    /// infinite.
    pub fn new(value: f64) -> Result<Self, InvalidAmountError> {
        validate(value)
            .map(Self)
            .ok_or_else(|| InvalidAmountError(value.to_string()))
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Adds two amounts, returning `None` if the result is not finite.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        validate(self.0 + other.0).map(Self)
    }

    /// The lower bound of the range that starts immediately after this one.
    ///
    /// Returns `None` once the amount is too large for a unit step to change
    /// it, since the successor would then equal the amount itself.
    #[must_use]
    pub fn successor(self) -> Option<Self> {
        self.checked_add(Self::ONE).filter(|next| *next > self)
    }
}

impl Eq for Amount {}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<f64> for Amount {
    type Error = InvalidAmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = InvalidAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<f64>()
            .map_err(|_| InvalidAmountError(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a value is not a finite, non-negative number.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid amount '{0}': must be a finite, non-negative number")]
pub struct InvalidAmountError(String);

/// An interest or fee rate, expressed as a percentage.
///
/// Rates are unconstrained beyond being finite and non-negative; a rate above
/// 100 % is unusual but representable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate(f64);

impl Rate {
    /// A rate of zero percent.
    pub const ZERO: Self = Self(0.0);

    /// Creates a new rate from a percentage value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRateError`] if the percentage is negative, NaN or
    /// infinite.
    pub fn new(percentage: f64) -> Result<Self, InvalidRateError> {
        validate(percentage)
            .map(Self)
            .ok_or_else(|| InvalidRateError(percentage.to_string()))
    }

    /// Returns the rate as a percentage.
    #[must_use]
    pub const fn percentage(self) -> f64 {
        self.0
    }
}

impl Eq for Rate {}

impl Ord for Rate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Rate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Rate {
    type Err = InvalidRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|_| InvalidRateError(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Error returned when a rate is not a finite, non-negative percentage.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid rate '{0}': must be a finite, non-negative percentage")]
pub struct InvalidRateError(String);

/// Normalizes negative zero so that equality and ordering agree.
fn validate(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value + 0.0)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0.0; "zero")]
    #[test_case(1.5; "fractional")]
    #[test_case(1e12; "large")]
    fn valid_amounts(value: f64) {
        assert_eq!(Amount::new(value).unwrap().get(), value);
    }

    #[test_case(-0.01; "negative")]
    #[test_case(f64::NAN; "nan")]
    #[test_case(f64::INFINITY; "infinity")]
    fn invalid_amounts(value: f64) {
        assert!(Amount::new(value).is_err());
        assert!(Rate::new(value).is_err());
    }

    #[test]
    fn negative_zero_is_zero() {
        let amount = Amount::new(-0.0).unwrap();
        assert_eq!(amount, Amount::ZERO);
        assert_eq!(amount.cmp(&Amount::ZERO), Ordering::Equal);
    }

    #[test]
    fn successor_adds_one() {
        let amount = Amount::new(100_000.0).unwrap();
        assert_eq!(amount.successor().unwrap().get(), 100_001.0);
    }

    #[test]
    fn successor_overflow_is_none() {
        let amount = Amount::new(f64::MAX).unwrap();
        assert!(amount.checked_add(amount).is_none());
    }

    #[test_case(9_007_199_254_740_992.0; "two to the 53")]
    #[test_case(1e20; "far beyond unit precision")]
    fn successor_without_unit_precision_is_none(value: f64) {
        assert_eq!(Amount::new(value).unwrap().successor(), None);
    }

    #[test]
    fn successor_below_unit_precision_limit() {
        let amount = Amount::new(9_007_199_254_740_990.0).unwrap();
        assert_eq!(amount.successor().unwrap().get(), 9_007_199_254_740_991.0);
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("2500".parse::<Amount>().unwrap().get(), 2500.0);
        assert!("abc".parse::<Amount>().is_err());
        assert!("-3".parse::<Amount>().is_err());

        assert_eq!("2.5%".parse::<Rate>().unwrap().percentage(), 2.5);
        assert_eq!("0".parse::<Rate>().unwrap(), Rate::ZERO);
    }

    #[test]
    fn display() {
        assert_eq!(Amount::new(50_000.0).unwrap().to_string(), "50000");
        assert_eq!(Rate::new(2.0).unwrap().to_string(), "2%");
    }

    #[test]
    fn error_display() {
        let error = Amount::new(-5.0).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid amount '-5': must be a finite, non-negative number"
        );
    }
}
