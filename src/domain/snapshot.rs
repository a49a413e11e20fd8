use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::domain::{
    Amount, BoundaryEdit, DetailEdit, DocumentSet, DocumentTypeId, ExclusiveMembership,
    InvariantViolation, Rate, TierSet,
};

/// Scalar settings of a savings product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductSettings {
    /// The smallest accepted deposit.
    pub min_deposit_amount: Amount,
    /// The largest accepted deposit, if limited.
    pub max_deposit_amount: Option<Amount>,
    /// Fee charged on withdrawals, if any.
    pub withdrawal_fee_percentage: Option<Rate>,
    /// Whether interest accrues on balances.
    pub accrue_interest: bool,
    /// Fields of the product record that are carried through unchanged.
    pub other: Map<String, Value>,
}

impl ProductSettings {
    fn check(&self) -> Result<(), InvariantViolation> {
        match self.max_deposit_amount {
            Some(max) if max < self.min_deposit_amount => Err(InvariantViolation::DepositLimits {
                min: self.min_deposit_amount,
                max,
            }),
            _ => Ok(()),
        }
    }
}

/// The complete configuration of a savings product, persisted as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationSnapshot {
    settings: ProductSettings,
    tiers: TierSet,
    documents: ExclusiveMembership,
}

/// A single user edit to a [`ConfigurationSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Append a tier after the open-ended one.
    AddTier {
        /// Width given to the tier that stops being open-ended.
        gap: Amount,
        /// Effective date of the new tier.
        today: NaiveDate,
    },
    /// Remove a tier.
    RemoveTier {
        /// Index of the tier to remove.
        index: usize,
    },
    /// Change a tier's range or rate.
    UpdateBoundary {
        /// Index of the tier.
        index: usize,
        /// The change.
        edit: BoundaryEdit,
    },
    /// Change a tier's date, status or description.
    UpdateDetail {
        /// Index of the tier.
        index: usize,
        /// The change.
        edit: DetailEdit,
    },
    /// Flip a document type in one of the document sets.
    ToggleDocument {
        /// The document type.
        id: DocumentTypeId,
        /// The set to toggle it in.
        set: DocumentSet,
    },
    /// Replace the scalar settings.
    UpdateSettings(ProductSettings),
}

impl ConfigurationSnapshot {
    /// Assembles a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::DepositLimits`] if the settings are
    /// inconsistent.
    pub fn new(
        settings: ProductSettings,
        tiers: TierSet,
        documents: ExclusiveMembership,
    ) -> Result<Self, InvariantViolation> {
        settings.check()?;
        Ok(Self {
            settings,
            tiers,
            documents,
        })
    }

    /// A new product: default settings, a single open-ended tier at 0 % and
    /// no document requirements.
    #[must_use]
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            settings: ProductSettings::default(),
            tiers: TierSet::single(Rate::ZERO, today),
            documents: ExclusiveMembership::default(),
        }
    }

    /// The scalar settings.
    #[must_use]
    pub const fn settings(&self) -> &ProductSettings {
        &self.settings
    }

    /// The interest tiers.
    #[must_use]
    pub const fn tiers(&self) -> &TierSet {
        &self.tiers
    }

    /// The document-requirement sets.
    #[must_use]
    pub const fn documents(&self) -> &ExclusiveMembership {
        &self.documents
    }

    /// Replaces the document-requirement sets.
    #[must_use]
    pub fn with_documents(self, documents: ExclusiveMembership) -> Self {
        Self { documents, ..self }
    }

    /// Applies an edit, returning the edited snapshot.
    ///
    /// # Errors
    ///
    /// Returns the [`InvariantViolation`] that caused the edit to be rejected.
    pub fn apply(&self, edit: Edit) -> Result<Self, InvariantViolation> {
        let tiers = match edit {
            Edit::AddTier { gap, today } => self.tiers.add_tier(gap, today)?,
            Edit::RemoveTier { index } => self.tiers.remove_tier(index)?,
            Edit::UpdateBoundary { index, edit } => self.tiers.update_boundary(index, edit)?,
            Edit::UpdateDetail { index, edit } => self.tiers.update_detail(index, edit)?,
            Edit::ToggleDocument { id, set } => {
                return Ok(self.clone().with_documents(self.documents.toggle(id, set)?));
            }
            Edit::UpdateSettings(settings) => {
                return Self::new(settings, self.tiers.clone(), self.documents.clone());
            }
        };

        Ok(Self {
            tiers,
            ..self.clone()
        })
    }
}
