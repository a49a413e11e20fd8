//! Mutually exclusive document-requirement sets.
//!
//! A KYC document type may be *required*, or accepted as an *alternative*, but
//! never both.

use std::{collections::BTreeSet, fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::InvariantViolation;

/// Identifier of a KYC document type, as issued by the document-type registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentTypeId(u64);

impl DocumentTypeId {
    /// Creates an identifier from its numeric value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for DocumentTypeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for DocumentTypeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for DocumentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two document sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSet {
    /// Documents every applicant must provide.
    Required,
    /// Documents accepted in place of a required one.
    Alternative,
}

impl DocumentSet {
    /// The other set.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Required => Self::Alternative,
            Self::Alternative => Self::Required,
        }
    }
}

impl fmt::Display for DocumentSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::Alternative => f.write_str("alternative"),
        }
    }
}

/// A pair of disjoint document-type sets.
///
/// Every operation returns a new value; the disjointness guard lives in
/// [`ExclusiveMembership::toggle`] and is exposed to renderers through
/// [`ExclusiveMembership::can_toggle`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExclusiveMembership {
    /// Known document types. `None` accepts any identifier.
    universe: Option<BTreeSet<DocumentTypeId>>,
    required: BTreeSet<DocumentTypeId>,
    alternative: BTreeSet<DocumentTypeId>,
}

impl ExclusiveMembership {
    /// Creates a membership from the two sets.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::InOppositeSet`] if an identifier appears
    /// in both sets.
    pub fn new(
        required: impl IntoIterator<Item = DocumentTypeId>,
        alternative: impl IntoIterator<Item = DocumentTypeId>,
    ) -> Result<Self, InvariantViolation> {
        let required: BTreeSet<_> = required.into_iter().collect();
        let alternative: BTreeSet<_> = alternative.into_iter().collect();

        if let Some(&id) = required.intersection(&alternative).next() {
            return Err(InvariantViolation::InOppositeSet {
                id,
                set: DocumentSet::Required,
            });
        }

        Ok(Self {
            universe: None,
            required,
            alternative,
        })
    }

    /// Restricts the membership to a fixed universe of document types.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::UnknownDocumentType`] if either set
    /// already contains an identifier outside the universe.
    pub fn with_universe(
        self,
        universe: impl IntoIterator<Item = DocumentTypeId>,
    ) -> Result<Self, InvariantViolation> {
        let universe: BTreeSet<_> = universe.into_iter().collect();

        if let Some(&id) = self
            .required
            .iter()
            .chain(&self.alternative)
            .find(|id| !universe.contains(id))
        {
            return Err(InvariantViolation::UnknownDocumentType(id));
        }

        Ok(Self {
            universe: Some(universe),
            ..self
        })
    }

    /// The document types every applicant must provide.
    pub fn required(&self) -> impl Iterator<Item = DocumentTypeId> + '_ {
        self.required.iter().copied()
    }

    /// The document types accepted as alternatives.
    pub fn alternative(&self) -> impl Iterator<Item = DocumentTypeId> + '_ {
        self.alternative.iter().copied()
    }

    /// Whether `id` belongs to `set`.
    #[must_use]
    pub fn contains(&self, id: DocumentTypeId, set: DocumentSet) -> bool {
        self.set(set).contains(&id)
    }

    /// The set `id` belongs to, if any.
    #[must_use]
    pub fn membership_of(&self, id: DocumentTypeId) -> Option<DocumentSet> {
        [DocumentSet::Required, DocumentSet::Alternative]
            .into_iter()
            .find(|&set| self.contains(id, set))
    }

    /// Whether toggling `id` in `target` would be accepted.
    ///
    /// Renderers use this to disable controls; it is the same check
    /// [`toggle`](Self::toggle) performs.
    #[must_use]
    pub fn can_toggle(&self, id: DocumentTypeId, target: DocumentSet) -> bool {
        self.check_toggle(id, target).is_ok()
    }

    /// Flips the membership of `id` in `target`.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::InOppositeSet`] if `id` belongs to the
    /// other set, or [`InvariantViolation::UnknownDocumentType`] if a universe
    /// is configured and does not contain `id`.
    pub fn toggle(&self, id: DocumentTypeId, target: DocumentSet) -> Result<Self, InvariantViolation> {
        self.check_toggle(id, target)?;

        let mut next = self.clone();
        let set = next.set_mut(target);
        if !set.remove(&id) {
            set.insert(id);
        }
        Ok(next)
    }

    fn check_toggle(&self, id: DocumentTypeId, target: DocumentSet) -> Result<(), InvariantViolation> {
        let opposite = target.opposite();
        if self.contains(id, opposite) {
            return Err(InvariantViolation::InOppositeSet { id, set: opposite });
        }

        if let Some(universe) = &self.universe {
            if !universe.contains(&id) {
                return Err(InvariantViolation::UnknownDocumentType(id));
            }
        }

        Ok(())
    }

    const fn set(&self, set: DocumentSet) -> &BTreeSet<DocumentTypeId> {
        match set {
            DocumentSet::Required => &self.required,
            DocumentSet::Alternative => &self.alternative,
        }
    }

    const fn set_mut(&mut self, set: DocumentSet) -> &mut BTreeSet<DocumentTypeId> {
        match set {
            DocumentSet::Required => &mut self.required,
            DocumentSet::Alternative => &mut self.alternative,
        }
    }
}
