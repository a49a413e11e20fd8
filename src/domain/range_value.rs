use std::{fmt, str::FromStr};

use crate::domain::amount::{Amount, InvalidAmountError};

/// The upper bound of a balance range.
///
/// A bound is either a finite amount or open (unbounded). The variant order
/// matters: the derived ordering places [`RangeValue::Open`] above every
/// finite bound.
///
/// # Examples
///
/// ```
/// use savings_config::{Amount, RangeValue};
///
/// let finite = RangeValue::Finite(Amount::new(1_000_000.0).unwrap());
/// assert!(RangeValue::Open > finite);
/// assert_eq!(finite.successor(), Some(Amount::new(1_000_001.0).unwrap()));
/// assert_eq!(RangeValue::Open.successor(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RangeValue {
    /// A finite, inclusive bound.
    Finite(Amount),
    /// No upper bound.
    Open,
}

impl RangeValue {
    /// Creates a finite bound.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAmountError`] if the amount is negative or not finite.
    pub fn finite(amount: f64) -> Result<Self, InvalidAmountError> {
        Amount::new(amount).map(Self::Finite)
    }

    /// Whether this bound is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// The finite amount, if any.
    #[must_use]
    pub const fn amount(self) -> Option<Amount> {
        match self {
            Self::Finite(amount) => Some(amount),
            Self::Open => None,
        }
    }

    /// The lower bound of the range that follows this one.
    ///
    /// Returns `None` for an open bound, or if the successor would overflow.
    #[must_use]
    pub fn successor(self) -> Option<Amount> {
        self.amount().and_then(Amount::successor)
    }

    /// Whether a value lies at or below this bound.
    #[must_use]
    pub fn admits(self, value: Amount) -> bool {
        match self {
            Self::Finite(bound) => value <= bound,
            Self::Open => true,
        }
    }
}

impl From<Amount> for RangeValue {
    fn from(amount: Amount) -> Self {
        Self::Finite(amount)
    }
}

impl fmt::Display for RangeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Finite(amount) => write!(f, "{amount}"),
            Self::Open => f.write_str("open"),
        }
    }
}

impl FromStr for RangeValue {
    type Err = InvalidAmountError;

    /// Parses `open` (case-insensitive) as the open bound, and anything else as
    /// a finite amount.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("open") {
            Ok(Self::Open)
        } else {
            s.parse().map(Self::Finite)
        }
    }
}
