// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Batch driver: clean concepts, then classify unassigned movements.
//!
//! Read failures abort the stage and propagate. A failed or no-op write only
//! skips that movement.

use crate::classifier::{Classification, Classifier};
use crate::error::StoreResult;
use crate::normalizer::normalize_concept;
use crate::store::MovementStore;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    /// Bound on movements fetched per stage; `None` means all.
    pub limit: Option<usize>,
    pub dry_run: bool,
    /// Count what is still unclean/unassigned afterwards.
    pub verify: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub scanned: usize,
    pub cleaned: usize,
    pub unchanged: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifyReport {
    pub scanned: usize,
    pub rules: usize,
    pub assigned: usize,
    pub below_threshold: usize,
    pub unmatched: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Remaining {
    pub unclean: usize,
    pub unassigned: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    pub dry_run: bool,
    pub clean: CleanReport,
    pub classify: ClassifyReport,
    pub remaining: Option<Remaining>,
}

pub fn clean_concepts<S>(store: &mut S, opts: &SweepOptions) -> StoreResult<CleanReport>
where
    S: MovementStore + ?Sized,
{
    let movements = store.fetch_movements_with_marker(opts.limit)?;
    let mut report = CleanReport {
        scanned: movements.len(),
        ..CleanReport::default()
    };
    for m in &movements {
        let cleaned = normalize_concept(&m.concept);
        if cleaned == m.concept {
            report.unchanged += 1;
            continue;
        }
        debug!(movement = m.id, from = %m.concept, to = %cleaned, "clean concept");
        if opts.dry_run {
            report.cleaned += 1;
            continue;
        }
        match store.update_movement_concept(m.id, &cleaned) {
            Ok(0) => {
                warn!(movement = m.id, "concept update affected no rows");
                report.failed += 1;
            }
            Ok(_) => report.cleaned += 1,
            Err(e) => {
                warn!(movement = m.id, error = %e, "concept update failed; skipping");
                report.failed += 1;
            }
        }
    }
    info!(
        scanned = report.scanned,
        cleaned = report.cleaned,
        failed = report.failed,
        dry_run = opts.dry_run,
        "concept cleanup done"
    );
    Ok(report)
}

pub fn classify_unassigned<S>(
    store: &mut S,
    classifier: &Classifier,
    opts: &SweepOptions,
) -> StoreResult<ClassifyReport>
where
    S: MovementStore + ?Sized,
{
    let movements = store.fetch_unassigned_movements(opts.limit)?;
    let rules = store.fetch_active_rules()?;
    let mut report = ClassifyReport {
        scanned: movements.len(),
        rules: rules.len(),
        ..ClassifyReport::default()
    };
    for mut m in movements {
        // Score against the clean concept even if its cleanup write was skipped.
        m.concept = normalize_concept(&m.concept);
        match classifier.classify(&mut m, &rules) {
            Classification::Assigned { property_id, .. } => {
                if opts.dry_run {
                    report.assigned += 1;
                    continue;
                }
                match store.update_movement_assignment(
                    m.id,
                    property_id,
                    m.tenant_name.as_deref(),
                ) {
                    Ok(0) => {
                        warn!(movement = m.id, "assignment affected no rows");
                        report.failed += 1;
                    }
                    Ok(_) => report.assigned += 1,
                    Err(e) => {
                        warn!(movement = m.id, error = %e, "assignment failed; skipping");
                        report.failed += 1;
                    }
                }
            }
            Classification::BelowThreshold { .. } => report.below_threshold += 1,
            Classification::NoMatch => report.unmatched += 1,
            // The fetch only returns unassigned movements.
            Classification::AlreadyAssigned => {}
        }
    }
    info!(
        scanned = report.scanned,
        rules = report.rules,
        assigned = report.assigned,
        failed = report.failed,
        dry_run = opts.dry_run,
        "classification done"
    );
    Ok(report)
}

pub fn run_sweep<S>(
    store: &mut S,
    classifier: &Classifier,
    opts: &SweepOptions,
) -> StoreResult<SweepReport>
where
    S: MovementStore + ?Sized,
{
    let clean = clean_concepts(store, opts)?;
    let classify = classify_unassigned(store, classifier, opts)?;
    let remaining = if opts.verify {
        Some(remaining(store)?)
    } else {
        None
    };
    Ok(SweepReport {
        dry_run: opts.dry_run,
        clean,
        classify,
        remaining,
    })
}

pub fn remaining<S>(store: &S) -> StoreResult<Remaining>
where
    S: MovementStore + ?Sized,
{
    Ok(Remaining {
        unclean: store.count_movements_with_marker()?,
        unassigned: store.count_unassigned_movements()?,
    })
}
