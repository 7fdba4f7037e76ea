// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::sweep::remaining_table;
use crate::store::MovementStore;
use crate::sweep::{Remaining, remaining};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub remaining: Remaining,
    pub issues: Vec<(String, String)>,
}

pub fn handle(
    store: &dyn MovementStore,
    local: Option<&Connection>,
    m: &clap::ArgMatches,
) -> Result<()> {
    let report = diagnose(store, local)?;
    if !maybe_print_json(m.get_flag("json"), &report)? {
        println!("{}", remaining_table(&report.remaining));
        if report.issues.is_empty() {
            println!("doctor: no rule issues found");
        } else {
            let rows = report
                .issues
                .iter()
                .map(|(k, v)| vec![k.clone(), v.clone()])
                .collect();
            println!("{}", pretty_table(&["Issue", "Detail"], rows));
        }
    }
    Ok(())
}

pub fn diagnose(store: &dyn MovementStore, local: Option<&Connection>) -> Result<DoctorReport> {
    let remaining = remaining(store)?;
    let mut issues = Vec::new();

    if let Some(conn) = local {
        // 1) Active rules that can never match
        let mut stmt = conn.prepare(
            "SELECT id FROM classification_rules WHERE is_active = 1 AND TRIM(keyword) = '' ORDER BY id",
        )?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            issues.push(("blank_keyword".into(), format!("rule {}", id)));
        }

        // 2) Same keyword pointing at different properties; only the first one can win
        let mut stmt2 = conn.prepare(
            "SELECT UPPER(TRIM(keyword)), COUNT(DISTINCT property_id) FROM classification_rules \
             WHERE is_active = 1 GROUP BY UPPER(TRIM(keyword)) HAVING COUNT(DISTINCT property_id) > 1",
        )?;
        let mut cur2 = stmt2.query([])?;
        while let Some(r) = cur2.next()? {
            let kw: String = r.get(0)?;
            let n: i64 = r.get(1)?;
            issues.push((
                "conflicting_keyword".into(),
                format!("'{}' -> {} properties", kw, n),
            ));
        }
    }

    Ok(DoctorReport { remaining, issues })
}
