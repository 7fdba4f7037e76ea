// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgersweep::classifier::Classifier;
use ledgersweep::error::{StoreError, StoreResult};
use ledgersweep::models::{ClassificationRule, FinancialMovement};
use ledgersweep::store::{MemoryStore, MovementStore};
use ledgersweep::sweep::{Remaining, SweepOptions, classify_unassigned, clean_concepts, run_sweep};
use rust_decimal::Decimal;

fn mv(id: i64, day: u32, concept: &str, property_id: Option<i64>) -> FinancialMovement {
    FinancialMovement {
        id,
        concept: concept.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
        amount: Decimal::new(65000, 2),
        property_id,
        tenant_name: None,
    }
}

fn rule(id: i64, keyword: &str, property_id: i64, tenant: Option<&str>) -> ClassificationRule {
    ClassificationRule {
        id,
        property_id,
        keyword: keyword.into(),
        category: None,
        subcategory: None,
        tenant_name: tenant.map(str::to_string),
        is_active: true,
    }
}

fn store() -> MemoryStore {
    MemoryStore::new(
        vec![
            mv(1, 1, "ALQUILER MARIA Pulsa para ver detalle del movimiento", None),
            mv(2, 2, "PAGO HIPOTECA SANTANDER SEPTIEMBRE", None),
            mv(3, 3, "RECIBO IBI AYUNTAMIENTO JEREZ DE LA FRONTERA 2025", None),
            mv(4, 4, "ALQUILER LOCAL\nPulsa para ver detalle del movimiento", Some(8)),
        ],
        vec![
            rule(1, "ALQUILER MARIA", 1, Some("Maria")),
            rule(2, "HIPOTECA", 3, None),
            rule(3, "IBI", 5, None),
            rule(4, "ALQUILER LOCAL", 9, None),
        ],
    )
}

fn all() -> SweepOptions {
    SweepOptions {
        limit: None,
        dry_run: false,
        verify: true,
    }
}

#[test]
fn sweep_cleans_then_assigns() {
    let mut s = store();
    let report = run_sweep(&mut s, &Classifier::default(), &all()).unwrap();

    assert_eq!(report.clean.scanned, 2);
    assert_eq!(report.clean.cleaned, 2);
    assert_eq!(report.classify.scanned, 3);
    assert_eq!(report.classify.rules, 4);
    assert_eq!(report.classify.assigned, 2);
    assert_eq!(report.classify.below_threshold, 1);
    assert_eq!(
        report.remaining,
        Some(Remaining {
            unclean: 0,
            unassigned: 1
        })
    );

    let m1 = s.movement(1).unwrap();
    assert_eq!(m1.concept, "ALQUILER MARIA");
    assert_eq!(m1.property_id, Some(1));
    assert_eq!(m1.tenant_name.as_deref(), Some("Maria"));
    assert_eq!(s.movement(2).unwrap().property_id, Some(3));
    assert_eq!(s.movement(3).unwrap().property_id, None);
}

#[test]
fn existing_assignment_is_never_replaced() {
    let mut s = store();
    run_sweep(&mut s, &Classifier::default(), &all()).unwrap();
    let m4 = s.movement(4).unwrap();
    assert_eq!(m4.concept, "ALQUILER LOCAL");
    assert_eq!(m4.property_id, Some(8));
}

#[test]
fn rerun_is_a_no_op() {
    let mut s = store();
    run_sweep(&mut s, &Classifier::default(), &all()).unwrap();
    let writes = s.writes();
    let snapshot = s.movements.clone();

    let again = run_sweep(&mut s, &Classifier::default(), &all()).unwrap();
    assert_eq!(again.clean.scanned, 0);
    assert_eq!(again.classify.assigned, 0);
    assert_eq!(s.writes(), writes);
    assert_eq!(s.movements, snapshot);
}

#[test]
fn dry_run_writes_nothing() {
    let mut s = store();
    let before = s.movements.clone();
    let opts = SweepOptions {
        dry_run: true,
        ..all()
    };
    let report = run_sweep(&mut s, &Classifier::default(), &opts).unwrap();
    assert!(report.dry_run);
    assert_eq!(report.clean.cleaned, 2);
    assert_eq!(report.classify.assigned, 2);
    assert_eq!(s.writes(), 0);
    assert_eq!(s.movements, before);
}

#[test]
fn limit_takes_newest_first() {
    let mut s = store();
    let opts = SweepOptions {
        limit: Some(1),
        ..SweepOptions::default()
    };
    let report = classify_unassigned(&mut s, &Classifier::default(), &opts).unwrap();
    assert_eq!(report.scanned, 1);
    // Newest unassigned movement is #3, which stays below threshold.
    assert_eq!(report.below_threshold, 1);
    assert_eq!(report.assigned, 0);
}

#[test]
fn write_failure_skips_movement_and_continues() {
    let mut s = store();
    s.fail_writes_for(2);
    let report = classify_unassigned(&mut s, &Classifier::default(), &all()).unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.assigned, 1);
    assert_eq!(s.movement(1).unwrap().property_id, Some(1));
    assert_eq!(s.movement(2).unwrap().property_id, None);

    let mut s = store();
    s.fail_writes_for(1);
    let clean = clean_concepts(&mut s, &all()).unwrap();
    assert_eq!(clean.failed, 1);
    assert_eq!(clean.cleaned, 1);
    assert_eq!(s.movement(4).unwrap().concept, "ALQUILER LOCAL");
}

struct Flaky {
    inner: MemoryStore,
    rules_down: bool,
    stale_writes: bool,
}

impl Flaky {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            rules_down: false,
            stale_writes: false,
        }
    }
}

impl MovementStore for Flaky {
    fn fetch_movements_with_marker(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>> {
        self.inner.fetch_movements_with_marker(limit)
    }

    fn fetch_unassigned_movements(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>> {
        self.inner.fetch_unassigned_movements(limit)
    }

    fn fetch_active_rules(&self) -> StoreResult<Vec<ClassificationRule>> {
        if self.rules_down {
            return Err(StoreError::Status {
                status: 503,
                url: "http://backend/classification-rules".into(),
            });
        }
        self.inner.fetch_active_rules()
    }

    fn update_movement_concept(&mut self, id: i64, concept: &str) -> StoreResult<usize> {
        if self.stale_writes {
            return Ok(0);
        }
        self.inner.update_movement_concept(id, concept)
    }

    fn update_movement_assignment(
        &mut self,
        id: i64,
        property_id: i64,
        tenant_name: Option<&str>,
    ) -> StoreResult<usize> {
        if self.stale_writes {
            return Ok(0);
        }
        self.inner.update_movement_assignment(id, property_id, tenant_name)
    }
}

#[test]
fn writes_touching_no_rows_count_as_failed() {
    let mut s = Flaky::new(store());
    s.stale_writes = true;
    let report = run_sweep(&mut s, &Classifier::default(), &all()).unwrap();
    assert_eq!(report.clean.cleaned, 0);
    assert_eq!(report.clean.failed, 2);
    assert_eq!(report.classify.assigned, 0);
    assert_eq!(report.classify.failed, 2);
    assert_eq!(s.inner.writes(), 0);
}

#[test]
fn rule_read_failure_aborts_classification() {
    let mut s = Flaky::new(store());
    s.rules_down = true;
    let err = classify_unassigned(&mut s, &Classifier::default(), &all()).unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 503, .. }));
    assert_eq!(s.inner.writes(), 0);

    // The cleanup stage has already run by the time the rule fetch fails.
    let mut s = Flaky::new(store());
    s.rules_down = true;
    assert!(run_sweep(&mut s, &Classifier::default(), &all()).is_err());
    assert_eq!(s.inner.writes(), 2);
}

#[test]
fn marker_concepts_classify_on_their_clean_text() {
    let mut s = MemoryStore::new(
        vec![mv(1, 1, "RENTA Pulsa para ver detalle del movimiento", None)],
        vec![rule(1, "RENTA", 2, None)],
    );
    let report = classify_unassigned(&mut s, &Classifier::default(), &all()).unwrap();
    assert_eq!(report.assigned, 1);
    // Only the assignment is persisted here; the concept belongs to the cleanup stage.
    let m = s.movement(1).unwrap();
    assert_eq!(m.property_id, Some(2));
    assert!(m.concept.contains("Pulsa"));
}

#[test]
fn trailing_blank_lines_do_not_keep_a_concept_unclean() {
    let mut s = MemoryStore::new(
        vec![mv(1, 1, "TRANSFERENCIA RECIBIDA Pulsa para ver detalle del movimiento\n\n", None)],
        vec![],
    );
    let report = run_sweep(&mut s, &Classifier::default(), &all()).unwrap();
    assert_eq!(report.clean.cleaned, 1);
    assert_eq!(report.clean.unchanged, 0);
    assert_eq!(report.remaining.unwrap().unclean, 0);
    assert_eq!(s.movement(1).unwrap().concept, "TRANSFERENCIA RECIBIDA");
}
