//! End-to-end editing of a product configuration through the public API.

#![allow(missing_docs)]

use chrono::NaiveDate;
use savings_config::{
    Amount, ConfigurationSnapshot, DocumentSet, DocumentTypeId, Edit, EditSession,
    InvariantViolation, RangeValue, Rate, Workspace,
    domain::{BoundaryEdit, ExclusiveMembership},
    wire::{self, WireTier},
};
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

fn amount(value: f64) -> Amount {
    Amount::new(value).unwrap()
}

/// Ranges and rates of every tier, for comparing against expected layouts.
fn layout(snapshot: &ConfigurationSnapshot) -> Vec<(f64, Option<f64>, f64)> {
    snapshot
        .tiers()
        .iter()
        .map(|tier| {
            (
                tier.min_balance.get(),
                tier.max_balance.amount().map(Amount::get),
                tier.rate_percentage.percentage(),
            )
        })
        .collect()
}

fn session_at_two_percent() -> EditSession {
    let snapshot = ConfigurationSnapshot::initial(today())
        .apply(Edit::UpdateBoundary {
            index: 0,
            edit: BoundaryEdit::RatePercentage(Rate::new(2.0).unwrap()),
        })
        .unwrap();
    EditSession::new(snapshot)
}

#[test]
fn add_then_widen_first_tier() {
    let mut session = session_at_two_percent();

    session
        .apply(Edit::AddTier {
            gap: amount(50_000.0),
            today: today(),
        })
        .unwrap();
    assert_eq!(
        layout(session.current()),
        vec![(0.0, Some(50_000.0), 2.0), (50_001.0, None, 2.0)]
    );

    session
        .apply(Edit::UpdateBoundary {
            index: 0,
            edit: BoundaryEdit::MaxBalance(RangeValue::finite(100_000.0).unwrap()),
        })
        .unwrap();
    assert_eq!(
        layout(session.current()),
        vec![(0.0, Some(100_000.0), 2.0), (100_001.0, None, 2.0)]
    );
}

#[test]
fn toggle_into_opposite_set_is_refused() {
    let id = DocumentTypeId::new(7);
    let documents = ExclusiveMembership::default()
        .toggle(id, DocumentSet::Required)
        .unwrap();

    assert!(!documents.can_toggle(id, DocumentSet::Alternative));
    assert!(documents.toggle(id, DocumentSet::Alternative).is_err());
    assert_eq!(documents.required().collect::<Vec<_>>(), vec![id]);
    assert_eq!(documents.alternative().count(), 0);
}

#[test]
fn open_bound_is_null_on_the_wire() {
    assert_eq!(wire::to_wire(RangeValue::Open), None);
    assert_eq!(wire::from_wire(None).unwrap(), RangeValue::Open);

    let snapshot = ConfigurationSnapshot::initial(today());
    let payload = wire::encode(&snapshot);
    let json = serde_json::to_value(&payload.tiers).unwrap();
    assert_eq!(json[0]["maxBalance"], serde_json::Value::Null);
}

#[test]
fn removing_last_tier_reopens_its_predecessor() {
    let mut session = session_at_two_percent();
    session
        .apply(Edit::AddTier {
            gap: amount(50_000.0),
            today: today(),
        })
        .unwrap();

    session.apply(Edit::RemoveTier { index: 1 }).unwrap();

    assert_eq!(layout(session.current()), vec![(0.0, None, 2.0)]);
    assert_eq!(
        session.apply(Edit::RemoveTier { index: 0 }),
        Err(InvariantViolation::LastRemainingTier)
    );
}

#[test]
fn removing_interior_tier_rejoins_neighbours() {
    let mut session = session_at_two_percent();
    for _ in 0..3 {
        session
            .apply(Edit::AddTier {
                gap: amount(1000.0),
                today: today(),
            })
            .unwrap();
    }
    // [0, 1000] [1001, 2001] [2002, 3002] [3003, open]

    session.apply(Edit::RemoveTier { index: 1 }).unwrap();

    assert_eq!(
        layout(session.current()),
        vec![
            (0.0, Some(1000.0), 2.0),
            (1001.0, Some(3002.0), 2.0),
            (3003.0, None, 2.0),
        ]
    );
}

#[test]
fn undo_restores_previous_snapshot() {
    let mut session = session_at_two_percent();
    let before = session.current().clone();

    session
        .apply(Edit::AddTier {
            gap: amount(50_000.0),
            today: today(),
        })
        .unwrap();
    assert!(session.undo());

    assert_eq!(session.current(), &before);
    assert!(!session.is_dirty());
}

#[test]
fn workspace_round_trip_preserves_unknown_fields() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    std::fs::write(
        root.join("product.json"),
        r#"{
            "productName": "Easy Saver",
            "minDepositAmount": 100,
            "maxDepositAmount": null,
            "accrueInterest": true,
            "requiredKycDocumentTypeIds": [1, 2],
            "alternativeKycDocumentTypeIds": [3]
        }"#,
    )
    .unwrap();
    let tiers = vec![
        WireTier {
            id: Some(11),
            min_balance: 0.0,
            max_balance: Some(10_000.0),
            rate_percentage: 1.0,
            effective_date: today(),
            is_active: true,
            description: "Starter".to_string(),
        },
        WireTier {
            id: Some(12),
            min_balance: 10_001.0,
            max_balance: None,
            rate_percentage: 1.5,
            effective_date: today(),
            is_active: true,
            description: String::new(),
        },
    ];
    std::fs::write(
        root.join("tiers.json"),
        serde_json::to_string(&tiers).unwrap(),
    )
    .unwrap();

    let workspace = Workspace::new(root.to_path_buf());
    let mut session = EditSession::new(workspace.load(today()).unwrap());
    session
        .apply(Edit::ToggleDocument {
            id: DocumentTypeId::new(2),
            set: DocumentSet::Required,
        })
        .unwrap();
    workspace.save(session.current()).unwrap();

    let product: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(root.join("product.json")).unwrap())
            .unwrap();
    assert_eq!(product["productName"], "Easy Saver");
    assert_eq!(product["requiredKycDocumentTypeIds"], serde_json::json!([1]));

    let reloaded = workspace.load(today()).unwrap();
    assert_eq!(&reloaded, session.current());
    assert_eq!(reloaded.tiers().first().id, Some(11));
}
