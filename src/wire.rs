//! Wire representation exchanged with the persistence service.
//!
//! In memory, an open upper bound is the [`RangeValue::Open`] variant. On the
//! wire it is `null`. Every number arriving from the wire is validated on the
//! way in; a single malformed value rejects the whole load rather than being
//! coerced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{
    Amount, ConfigurationSnapshot, DocumentTypeId, ExclusiveMembership, InterestTier,
    InvariantViolation, ProductSettings, RangeValue, Rate, TierSet,
};

/// Converts an upper bound to its wire value: `null` for open, the amount
/// otherwise.
#[must_use]
pub fn to_wire(value: RangeValue) -> Option<f64> {
    value.amount().map(Amount::get)
}

/// Converts a wire value to an upper bound: `null` is open, a number is a
/// finite bound.
///
/// # Errors
///
/// Returns [`MalformedWireValue`] for a negative or non-finite number.
pub fn from_wire(raw: Option<f64>) -> Result<RangeValue, MalformedWireValue> {
    raw.map_or(Ok(RangeValue::Open), |value| {
        amount_from_wire("maxBalance", value).map(RangeValue::Finite)
    })
}

/// A number on the wire that cannot be represented in the domain.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("malformed wire value for '{field}': {value}")]
pub struct MalformedWireValue {
    /// The wire field that held the value.
    pub field: &'static str,
    /// The offending value.
    pub value: f64,
}

/// Errors that can occur while decoding a loaded configuration.
#[derive(Debug, Error)]
pub enum WireError {
    /// A field held a value outside its domain.
    #[error(transparent)]
    Malformed(#[from] MalformedWireValue),

    /// The loaded configuration does not satisfy the domain invariants.
    #[error("loaded configuration is invalid: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// An interest tier as exchanged with the persistence service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTier {
    /// Persisted identifier, omitted for new tiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Inclusive lower bound.
    pub min_balance: f64,
    /// Inclusive upper bound; `null` or absent for the open-ended tier.
    #[serde(default)]
    pub max_balance: Option<f64>,
    /// Interest rate, as a percentage.
    pub rate_percentage: f64,
    /// Date from which the rate applies, as `YYYY-MM-DD`.
    pub effective_date: NaiveDate,
    /// Whether the tier is active.
    pub is_active: bool,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// The product record as exchanged with the persistence service.
///
/// Only the fields the editor works with are typed; everything else is
/// carried through in [`WireProduct::other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    /// The smallest accepted deposit.
    pub min_deposit_amount: f64,
    /// The largest accepted deposit, if limited.
    #[serde(default)]
    pub max_deposit_amount: Option<f64>,
    /// Fee charged on withdrawals, as a percentage.
    #[serde(default)]
    pub withdrawal_fee_percentage: Option<f64>,
    /// Whether interest accrues on balances.
    #[serde(default)]
    pub accrue_interest: bool,
    /// Document types every applicant must provide.
    #[serde(default)]
    pub required_kyc_document_type_ids: Vec<DocumentTypeId>,
    /// Document types accepted as alternatives.
    #[serde(default)]
    pub alternative_kyc_document_type_ids: Vec<DocumentTypeId>,
    /// Remaining fields, preserved verbatim.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Everything handed to the persistence service on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    /// The product record.
    pub product: WireProduct,
    /// The interest tiers, in ascending order.
    pub tiers: Vec<WireTier>,
}

impl From<&InterestTier> for WireTier {
    fn from(tier: &InterestTier) -> Self {
        Self {
            id: tier.id,
            min_balance: tier.min_balance.get(),
            max_balance: to_wire(tier.max_balance),
            rate_percentage: tier.rate_percentage.percentage(),
            effective_date: tier.effective_date,
            is_active: tier.is_active,
            description: tier.description.clone(),
        }
    }
}

impl TryFrom<WireTier> for InterestTier {
    type Error = MalformedWireValue;

    fn try_from(tier: WireTier) -> Result<Self, Self::Error> {
        Ok(Self {
            id: tier.id,
            min_balance: amount_from_wire("minBalance", tier.min_balance)?,
            max_balance: from_wire(tier.max_balance)?,
            rate_percentage: rate_from_wire("ratePercentage", tier.rate_percentage)?,
            effective_date: tier.effective_date,
            is_active: tier.is_active,
            description: tier.description,
        })
    }
}

/// Decodes a loaded product record and tier list into a snapshot.
///
/// An empty tier list (a product that has never had tiers) decodes as a single
/// open-ended tier at zero percent, effective `today`.
///
/// # Errors
///
/// Returns a [`WireError`] if any value is malformed or the result violates an
/// invariant.
pub fn decode(
    product: WireProduct,
    tiers: Vec<WireTier>,
    today: NaiveDate,
) -> Result<ConfigurationSnapshot, WireError> {
    let tiers = if tiers.is_empty() {
        TierSet::single(Rate::ZERO, today)
    } else {
        let tiers = tiers
            .into_iter()
            .map(InterestTier::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        TierSet::new(tiers)?
    };

    let documents = ExclusiveMembership::new(
        product.required_kyc_document_type_ids,
        product.alternative_kyc_document_type_ids,
    )?;

    let settings = ProductSettings {
        min_deposit_amount: amount_from_wire("minDepositAmount", product.min_deposit_amount)?,
        max_deposit_amount: product
            .max_deposit_amount
            .map(|value| amount_from_wire("maxDepositAmount", value))
            .transpose()?,
        withdrawal_fee_percentage: product
            .withdrawal_fee_percentage
            .map(|value| rate_from_wire("withdrawalFeePercentage", value))
            .transpose()?,
        accrue_interest: product.accrue_interest,
        other: product.other,
    };

    Ok(ConfigurationSnapshot::new(settings, tiers, documents)?)
}

/// Encodes a snapshot into the payload handed to the persistence service.
#[must_use]
pub fn encode(snapshot: &ConfigurationSnapshot) -> SavePayload {
    let settings = snapshot.settings();
    let documents = snapshot.documents();

    let product = WireProduct {
        min_deposit_amount: settings.min_deposit_amount.get(),
        max_deposit_amount: settings.max_deposit_amount.map(Amount::get),
        withdrawal_fee_percentage: settings.withdrawal_fee_percentage.map(Rate::percentage),
        accrue_interest: settings.accrue_interest,
        required_kyc_document_type_ids: documents.required().collect(),
        alternative_kyc_document_type_ids: documents.alternative().collect(),
        other: settings.other.clone(),
    };

    SavePayload {
        product,
        tiers: snapshot.tiers().iter().map(WireTier::from).collect(),
    }
}

/// A save rejected by the persistence service's own validation.
///
/// The message is shown as-is; it is not attributed to individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    /// The message returned by the service.
    pub message: String,
}

/// Interprets the persistence service's response to a save request.
///
/// A failed response carries its message either as the `message` field of a
/// JSON body or as the raw body text.
///
/// # Errors
///
/// Returns a [`ValidationFailure`] holding the service's message when
/// `success` is false.
pub fn interpret_save_response(success: bool, body: &str) -> Result<(), ValidationFailure> {
    if success {
        return Ok(());
    }

    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    let message = if message.is_empty() {
        "the save request was rejected".to_string()
    } else {
        message
    };

    Err(ValidationFailure { message })
}

fn amount_from_wire(field: &'static str, value: f64) -> Result<Amount, MalformedWireValue> {
    Amount::new(value).map_err(|_| MalformedWireValue { field, value })
}

fn rate_from_wire(field: &'static str, value: f64) -> Result<Rate, MalformedWireValue> {
    Rate::new(value).map_err(|_| MalformedWireValue { field, value })
}
