use thiserror::Error;

use crate::domain::{Amount, DocumentSet, DocumentTypeId};

/// An edit that was rejected because it would break an invariant of the
/// configuration.
///
/// Rejected edits never partially apply: the value the edit was attempted on
/// is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A tier set must contain at least one tier.
    #[error("a tier set must contain at least one tier")]
    NoTiers,

    /// The only remaining tier cannot be removed.
    #[error("cannot remove the only remaining tier")]
    LastRemainingTier,

    /// The tier index does not exist.
    #[error("tier index {index} is out of range (tier count is {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of tiers.
        len: usize,
    },

    /// Only the last tier may have an open upper bound.
    #[error("tier {index} cannot be open-ended: only the last tier may be")]
    OpenBoundNotLast {
        /// Index of the offending tier.
        index: usize,
    },

    /// The last tier must keep an open upper bound.
    #[error("tier {index} is the last tier and must remain open-ended")]
    LastTierMustBeOpen {
        /// Index of the last tier.
        index: usize,
    },

    /// The minimum balance of every tier but the first is derived from its
    /// predecessor.
    #[error("the minimum balance of tier {index} is derived from the previous tier")]
    DerivedMinimum {
        /// Index of the tier.
        index: usize,
    },

    /// A tier would end below its own starting balance.
    #[error("tier {index} would end at {max} before it starts at {min}")]
    InvertedRange {
        /// Index of the offending tier.
        index: usize,
        /// The tier's lower bound.
        min: Amount,
        /// The tier's upper bound.
        max: Amount,
    },

    /// Adjacent tiers overlap or leave a gap.
    #[error("tier {index} starts at {found}, expected {expected} to follow the previous tier")]
    Discontiguous {
        /// Index of the offending tier.
        index: usize,
        /// The lower bound required for contiguity.
        expected: Amount,
        /// The lower bound actually present.
        found: Amount,
    },

    /// A new tier needs a gap greater than zero to close the previous one.
    #[error("the gap for a new tier must be greater than zero")]
    ZeroGap,

    /// A boundary computation left the representable range.
    #[error("the boundary of tier {index} overflows")]
    Overflow {
        /// Index of the tier whose boundary overflowed.
        index: usize,
    },

    /// A document type cannot be in both the required and alternative sets.
    #[error("document type {id} is already {set}")]
    InOppositeSet {
        /// The document type.
        id: DocumentTypeId,
        /// The set the document type already belongs to.
        set: DocumentSet,
    },

    /// The document type is not part of the configured universe.
    #[error("document type {0} is not a known document type")]
    UnknownDocumentType(DocumentTypeId),

    /// The minimum deposit exceeds the maximum deposit.
    #[error("minimum deposit {min} exceeds maximum deposit {max}")]
    DepositLimits {
        /// The minimum deposit.
        min: Amount,
        /// The maximum deposit.
        max: Amount,
    },
}
