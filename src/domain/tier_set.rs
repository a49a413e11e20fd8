//! The tiered interest-rate partition.
//!
//! A [`TierSet`] partitions the non-negative balances into contiguous,
//! non-overlapping ranges, each mapped to one interest rate. The last range is
//! open-ended, so every balance at or above the first tier's minimum maps to
//! exactly one tier.
//!
//! Every operation returns a new, validated set. Validation is centralized in
//! one place, so an operation either yields a set satisfying all invariants or
//! is rejected with an [`InvariantViolation`] and leaves the original
//! untouched.

use chrono::NaiveDate;
use nonempty::NonEmpty;

use crate::domain::{Amount, DetailEdit, InterestTier, InvariantViolation, RangeValue, Rate};

/// An edit to one of the fields that determine a tier's range or rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryEdit {
    /// Set the lower bound. Only the first tier's lower bound is editable.
    MinBalance(Amount),
    /// Set the upper bound, cascading into the next tier's lower bound.
    MaxBalance(RangeValue),
    /// Set the interest rate.
    RatePercentage(Rate),
}

/// An ordered, contiguous set of interest tiers.
///
/// Invariants, checked after every operation:
///
/// 1. the set is never empty;
/// 2. exactly one tier, the last, has an open upper bound;
/// 3. each tier starts one unit above the previous tier's upper bound;
/// 4. no tier ends below its own lower bound.
///
/// The first tier conventionally starts at zero, but this is not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSet {
    tiers: NonEmpty<InterestTier>,
}

impl TierSet {
    /// Creates a set containing a single open-ended tier starting at zero.
    #[must_use]
    pub fn single(rate: Rate, effective_date: NaiveDate) -> Self {
        Self {
            tiers: NonEmpty::new(InterestTier::open_ended(Amount::ZERO, rate, effective_date)),
        }
    }

    /// Hydrates a set from loaded tiers.
    ///
    /// Tiers are ordered by their lower bound before validation.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantViolation`] if the list is empty or the tiers do
    /// not form a valid partition.
    pub fn new(mut tiers: Vec<InterestTier>) -> Result<Self, InvariantViolation> {
        tiers.sort_by_key(|tier| tier.min_balance);
        Self::from_checked(tiers)
    }

    /// The number of tiers. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Returns the tier at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&InterestTier> {
        self.tiers.get(index)
    }

    /// The first (lowest) tier.
    #[must_use]
    pub fn first(&self) -> &InterestTier {
        self.tiers.first()
    }

    /// The last, open-ended tier.
    #[must_use]
    pub fn last(&self) -> &InterestTier {
        self.tiers.last()
    }

    /// Iterates the tiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &InterestTier> + '_ {
        self.tiers.iter()
    }

    /// The tier a balance falls into.
    ///
    /// Returns `None` for a balance below the first tier's lower bound. A
    /// fractional balance between one tier's upper bound and the next tier's
    /// lower bound belongs to the lower tier.
    #[must_use]
    pub fn tier_for_balance(&self, balance: Amount) -> Option<&InterestTier> {
        self.position_for_balance(balance)
            .and_then(|index| self.get(index))
    }

    /// The index of the tier a balance falls into.
    ///
    /// See [`tier_for_balance`](Self::tier_for_balance).
    #[must_use]
    pub fn position_for_balance(&self, balance: Amount) -> Option<usize> {
        self.tiers
            .iter()
            .take_while(|tier| tier.min_balance <= balance)
            .count()
            .checked_sub(1)
    }

    /// Appends a new open-ended tier.
    ///
    /// The current last tier is closed at `min_balance + gap`, and the new
    /// tier starts one unit above it, inheriting the previous tier's rate.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::ZeroGap`] for a zero gap, or
    /// [`InvariantViolation::Overflow`] if the new bounds cannot be represented.
    pub fn add_tier(&self, gap: Amount, today: NaiveDate) -> Result<Self, InvariantViolation> {
        if gap == Amount::ZERO {
            return Err(InvariantViolation::ZeroGap);
        }

        let index = self.len() - 1;
        let previous = self.last();

        let max = match previous.max_balance {
            RangeValue::Open => previous
                .min_balance
                .checked_add(gap)
                .ok_or(InvariantViolation::Overflow { index })?,
            RangeValue::Finite(max) => max,
        };
        let min = max
            .successor()
            .ok_or(InvariantViolation::Overflow { index })?;
        let new_tier = InterestTier::open_ended(min, previous.rate_percentage, today);

        let mut tiers = self.to_vec();
        tiers[index].max_balance = RangeValue::Finite(max);
        tiers.push(new_tier);

        Self::from_checked(tiers)
    }

    /// Removes the tier at `index`.
    ///
    /// Removing the last tier makes its predecessor open-ended. Removing an
    /// interior tier extends its successor down to meet the predecessor, so the
    /// partition stays contiguous. Removing the first tier leaves the new first
    /// tier's lower bound as it was.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::LastRemainingTier`] if only one tier is
    /// left, or [`InvariantViolation::IndexOutOfRange`] for a bad index.
    pub fn remove_tier(&self, index: usize) -> Result<Self, InvariantViolation> {
        self.check_index(index)?;
        if self.len() == 1 {
            return Err(InvariantViolation::LastRemainingTier);
        }

        let mut tiers = self.to_vec();
        tiers.remove(index);

        if index == tiers.len() {
            if let Some(last) = tiers.last_mut() {
                last.max_balance = RangeValue::Open;
            }
        } else if let Some(predecessor) = index.checked_sub(1) {
            if let RangeValue::Finite(max) = tiers[predecessor].max_balance {
                cascade(&mut tiers, predecessor, max)?;
            }
        }

        Self::from_checked(tiers)
    }

    /// Updates the range or rate of the tier at `index`.
    ///
    /// A finite upper bound cascades into the next tier's lower bound. The open
    /// bound may only be assigned to the last tier, which already holds it.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantViolation`] if the edit targets a field that is
    /// not editable on this tier, or would leave the set invalid.
    pub fn update_boundary(
        &self,
        index: usize,
        edit: BoundaryEdit,
    ) -> Result<Self, InvariantViolation> {
        self.check_index(index)?;
        let last = self.len() - 1;

        match edit {
            BoundaryEdit::MinBalance(_) if index != 0 => {
                Err(InvariantViolation::DerivedMinimum { index })
            }
            BoundaryEdit::MinBalance(min) => {
                let mut tiers = self.to_vec();
                tiers[0].min_balance = min;
                Self::from_checked(tiers)
            }
            BoundaryEdit::MaxBalance(RangeValue::Open) if index != last => {
                Err(InvariantViolation::OpenBoundNotLast { index })
            }
            BoundaryEdit::MaxBalance(RangeValue::Open) => Ok(self.clone()),
            BoundaryEdit::MaxBalance(RangeValue::Finite(_)) if index == last => {
                Err(InvariantViolation::LastTierMustBeOpen { index })
            }
            BoundaryEdit::MaxBalance(RangeValue::Finite(max)) => repair_boundary(self, index, max),
            BoundaryEdit::RatePercentage(rate) => {
                let mut tiers = self.to_vec();
                tiers[index].rate_percentage = rate;
                Self::from_checked(tiers)
            }
        }
    }

    /// Updates the date, status or description of the tier at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::IndexOutOfRange`] for a bad index.
    pub fn update_detail(&self, index: usize, edit: DetailEdit) -> Result<Self, InvariantViolation> {
        self.check_index(index)?;
        let mut tiers = self.to_vec();
        edit.apply_to(&mut tiers[index]);
        Self::from_checked(tiers)
    }

    fn check_index(&self, index: usize) -> Result<(), InvariantViolation> {
        if index < self.len() {
            Ok(())
        } else {
            Err(InvariantViolation::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    fn to_vec(&self) -> Vec<InterestTier> {
        self.tiers.clone().into()
    }

    fn from_checked(tiers: Vec<InterestTier>) -> Result<Self, InvariantViolation> {
        check_partition(&tiers)?;
        NonEmpty::from_vec(tiers)
            .map(|tiers| Self { tiers })
            .ok_or(InvariantViolation::NoTiers)
    }
}

/// Sets the upper bound of the tier at `index` to `new_max` and moves the next
/// tier's lower bound to follow it.
///
/// This is the cascade behind upper-bound edits and interior removals, exposed
/// as a pure function so it can be applied and inspected independently.
///
/// # Errors
///
/// Returns an [`InvariantViolation`] if the index is out of range, if the tier
/// is the last one (which must stay open), or if either affected tier would
/// end up inverted.
pub fn repair_boundary(
    tier_set: &TierSet,
    index: usize,
    new_max: Amount,
) -> Result<TierSet, InvariantViolation> {
    let mut tiers = tier_set.to_vec();
    cascade(&mut tiers, index, new_max)?;
    TierSet::from_checked(tiers)
}

fn cascade(
    tiers: &mut [InterestTier],
    index: usize,
    new_max: Amount,
) -> Result<(), InvariantViolation> {
    let len = tiers.len();
    let tier = tiers
        .get_mut(index)
        .ok_or(InvariantViolation::IndexOutOfRange { index, len })?;
    tier.max_balance = RangeValue::Finite(new_max);

    if let Some(next) = tiers.get_mut(index + 1) {
        next.min_balance = new_max
            .successor()
            .ok_or(InvariantViolation::Overflow { index })?;
    }

    Ok(())
}

fn check_partition(tiers: &[InterestTier]) -> Result<(), InvariantViolation> {
    let Some(last) = tiers.len().checked_sub(1) else {
        return Err(InvariantViolation::NoTiers);
    };

    for (index, tier) in tiers.iter().enumerate() {
        let max = match tier.max_balance {
            RangeValue::Open if index == last => continue,
            RangeValue::Open => return Err(InvariantViolation::OpenBoundNotLast { index }),
            RangeValue::Finite(_) if index == last => {
                return Err(InvariantViolation::LastTierMustBeOpen { index });
            }
            RangeValue::Finite(max) => max,
        };

        if max < tier.min_balance {
            return Err(InvariantViolation::InvertedRange {
                index,
                min: tier.min_balance,
                max,
            });
        }

        let expected = max
            .successor()
            .ok_or(InvariantViolation::Overflow { index })?;
        let next = &tiers[index + 1];
        if next.min_balance != expected {
            return Err(InvariantViolation::Discontiguous {
                index: index + 1,
                expected,
                found: next.min_balance,
            });
        }
    }

    Ok(())
}
