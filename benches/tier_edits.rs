//! This bench test simulates editing the boundary of the first tier in a large
//! tier set, which moves the lower bound of its successor, and loading the
//! same set back from a workspace.

#![allow(missing_docs)]

use chrono::NaiveDate;
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use savings_config::{
    Amount, ConfigurationSnapshot, Edit, RangeValue, Workspace, domain::BoundaryEdit,
};
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

/// Builds a snapshot with many contiguous tiers
fn many_tiers(count: usize) -> ConfigurationSnapshot {
    let gap = Amount::new(1000.0).unwrap();
    (1..count).fold(ConfigurationSnapshot::initial(today()), |snapshot, _| {
        snapshot
            .apply(Edit::AddTier {
                gap,
                today: today(),
            })
            .unwrap()
    })
}

fn edit_boundary(c: &mut Criterion) {
    let snapshot = many_tiers(500);
    let edit = Edit::UpdateBoundary {
        index: 0,
        edit: BoundaryEdit::MaxBalance(RangeValue::finite(500.0).unwrap()),
    };

    c.bench_function("edit first boundary", |b| {
        b.iter(|| snapshot.apply(edit.clone()).unwrap());
    });

    c.bench_function("remove interior tier", |b| {
        b.iter(|| snapshot.apply(Edit::RemoveTier { index: 250 }).unwrap());
    });
}

fn load_workspace(c: &mut Criterion) {
    c.bench_function("load workspace", |b| {
        b.iter_batched(
            || {
                let tmp_dir = TempDir::new().unwrap();
                Workspace::new(tmp_dir.path().to_path_buf())
                    .save(&many_tiers(500))
                    .unwrap();
                tmp_dir
            },
            |tmp_dir| {
                Workspace::new(tmp_dir.path().to_path_buf())
                    .load(today())
                    .unwrap();
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, edit_boundary, load_workspace);
criterion_main!(benches);
