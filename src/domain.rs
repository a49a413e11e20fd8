//! Domain models for savings product configuration.
//!
//! This module contains the core domain types: validated amounts and bounds,
//! interest tiers and the partition they form, the exclusive document sets,
//! and the snapshot that aggregates them.

mod amount;
pub use amount::{Amount, InvalidAmountError, InvalidRateError, Rate};

mod range_value;
pub use range_value::RangeValue;

mod tier;
pub use tier::{DetailEdit, InterestTier};

pub mod tier_set;
pub use tier_set::{BoundaryEdit, TierSet, repair_boundary};

pub mod membership;
pub use membership::{DocumentSet, DocumentTypeId, ExclusiveMembership};

mod snapshot;
pub use snapshot::{ConfigurationSnapshot, Edit, ProductSettings};

pub mod session;
pub use session::EditSession;

mod violation;
pub use violation::InvariantViolation;

mod config;
pub use config::{EditorConfig, ZeroGapError};
