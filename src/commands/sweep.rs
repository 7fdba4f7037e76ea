// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classifier::Classifier;
use crate::store::MovementStore;
use crate::sweep::{self, ClassifyReport, CleanReport, Remaining, SweepOptions, SweepReport};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub fn options(sub: &clap::ArgMatches, default_limit: usize) -> SweepOptions {
    let limit = if sub.get_flag("all") {
        None
    } else {
        Some(sub.get_one::<usize>("limit").copied().unwrap_or(default_limit))
    };
    SweepOptions {
        limit,
        dry_run: sub.get_flag("dry_run"),
        verify: false,
    }
}

/// [`options`] plus `--verify`, which only `sweep` defines.
pub fn sweep_options(sub: &clap::ArgMatches, default_limit: usize) -> SweepOptions {
    SweepOptions {
        verify: sub.get_flag("verify"),
        ..options(sub, default_limit)
    }
}

pub fn clean(
    store: &mut dyn MovementStore,
    sub: &clap::ArgMatches,
    default_limit: usize,
) -> Result<CleanReport> {
    let opts = options(sub, default_limit);
    let report = sweep::clean_concepts(store, &opts).context("Concept cleanup aborted")?;
    if !maybe_print_json(sub.get_flag("json"), &report)? {
        println!("{}", clean_table(&report));
        print_dry_run_note(opts.dry_run);
    }
    Ok(report)
}

pub fn classify(
    store: &mut dyn MovementStore,
    sub: &clap::ArgMatches,
    default_limit: usize,
) -> Result<ClassifyReport> {
    let opts = options(sub, default_limit);
    let report = sweep::classify_unassigned(store, &Classifier::default(), &opts)
        .context("Classification aborted")?;
    if !maybe_print_json(sub.get_flag("json"), &report)? {
        println!("{}", classify_table(&report));
        print_dry_run_note(opts.dry_run);
    }
    Ok(report)
}

pub fn run(
    store: &mut dyn MovementStore,
    sub: &clap::ArgMatches,
    default_limit: usize,
) -> Result<SweepReport> {
    let opts = sweep_options(sub, default_limit);
    let report =
        sweep::run_sweep(store, &Classifier::default(), &opts).context("Sweep aborted")?;
    if !maybe_print_json(sub.get_flag("json"), &report)? {
        println!("{}", clean_table(&report.clean));
        println!("{}", classify_table(&report.classify));
        if let Some(rem) = &report.remaining {
            println!("{}", remaining_table(rem));
        }
        print_dry_run_note(opts.dry_run);
    }
    Ok(report)
}

fn print_dry_run_note(dry_run: bool) {
    if dry_run {
        println!("Dry run: nothing was written.");
    }
}

fn clean_table(r: &CleanReport) -> comfy_table::Table {
    pretty_table(
        &["Concepts", "Scanned", "Cleaned", "Unchanged", "Failed"],
        vec![vec![
            "clean".into(),
            r.scanned.to_string(),
            r.cleaned.to_string(),
            r.unchanged.to_string(),
            r.failed.to_string(),
        ]],
    )
}

fn classify_table(r: &ClassifyReport) -> comfy_table::Table {
    pretty_table(
        &[
            "Movements",
            "Scanned",
            "Rules",
            "Assigned",
            "Below threshold",
            "No match",
            "Failed",
        ],
        vec![vec![
            "classify".into(),
            r.scanned.to_string(),
            r.rules.to_string(),
            r.assigned.to_string(),
            r.below_threshold.to_string(),
            r.unmatched.to_string(),
            r.failed.to_string(),
        ]],
    )
}

pub(crate) fn remaining_table(r: &Remaining) -> comfy_table::Table {
    pretty_table(
        &["Remaining", "Count"],
        vec![
            vec!["unclean concepts".into(), r.unclean.to_string()],
            vec!["unassigned movements".into(), r.unassigned.to_string()],
        ],
    )
}
