use chrono::NaiveDate;

use crate::domain::{Amount, RangeValue, Rate};

/// A contiguous balance range mapped to a single interest rate.
///
/// Tiers are plain data. The partition rules that relate neighbouring tiers
/// are enforced by [`TierSet`](crate::TierSet), which owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestTier {
    /// Persisted identifier, absent for tiers created in this session.
    pub id: Option<u64>,
    /// Inclusive lower bound of the range.
    pub min_balance: Amount,
    /// Inclusive upper bound of the range.
    pub max_balance: RangeValue,
    /// Interest rate applied to balances in this range.
    pub rate_percentage: Rate,
    /// Date from which the rate applies.
    pub effective_date: NaiveDate,
    /// Whether the tier is currently active.
    pub is_active: bool,
    /// Free-text description shown alongside the tier.
    pub description: String,
}

impl InterestTier {
    /// Creates a new, active, open-ended tier starting at `min_balance`.
    #[must_use]
    pub const fn open_ended(min_balance: Amount, rate: Rate, effective_date: NaiveDate) -> Self {
        Self {
            id: None,
            min_balance,
            max_balance: RangeValue::Open,
            rate_percentage: rate,
            effective_date,
            is_active: true,
            description: String::new(),
        }
    }

    /// Whether the balance lies within this tier's range.
    #[must_use]
    pub fn contains(&self, balance: Amount) -> bool {
        self.min_balance <= balance && self.max_balance.admits(balance)
    }
}

/// An edit to one of the fields of a tier that are not part of the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEdit {
    /// Set the date from which the rate applies.
    EffectiveDate(NaiveDate),
    /// Activate or deactivate the tier.
    Active(bool),
    /// Replace the description.
    Description(String),
}

impl DetailEdit {
    pub(crate) fn apply_to(self, tier: &mut InterestTier) {
        match self {
            Self::EffectiveDate(date) => tier.effective_date = date,
            Self::Active(active) => tier.is_active = active,
            Self::Description(description) => tier.description = description,
        }
    }
}
