//! Savings Product Configuration
//!
//! Interest tiers, deposit settings and KYC document requirements of a savings
//! product, edited as one validated snapshot.

pub mod domain;
pub use domain::{
    Amount, ConfigurationSnapshot, DocumentSet, DocumentTypeId, Edit, EditSession, EditorConfig,
    InterestTier, InvariantViolation, RangeValue, Rate, TierSet,
};

pub mod wire;

/// Filesystem storage of a product configuration.
pub mod storage;
pub use storage::Workspace;
