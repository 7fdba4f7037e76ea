// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let data = query_rows(conn, sub)?;
        if !maybe_print_json(sub.get_flag("json"), &data)? {
            let rows: Vec<Vec<String>> = data
                .iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.date.clone(),
                        r.concept.clone(),
                        r.amount.clone(),
                        r.property_id.map(|p| p.to_string()).unwrap_or_default(),
                        r.tenant_name.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["ID", "Date", "Concept", "Amount", "Property", "Tenant"],
                    rows
                )
            );
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct MovementRow {
    pub id: i64,
    pub date: String,
    pub concept: String,
    pub amount: String,
    pub property_id: Option<i64>,
    pub tenant_name: Option<String>,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<MovementRow>> {
    let mut sql = String::from(
        "SELECT id, date, COALESCE(concept,''), CAST(amount AS TEXT), property_id, tenant_name \
         FROM financial_movements WHERE 1=1",
    );
    if sub.get_flag("unassigned") {
        sql.push_str(" AND property_id IS NULL");
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    let mut params_vec: Vec<i64> = Vec::new();
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(*limit as i64);
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(MovementRow {
            id: r.get(0)?,
            date: r.get(1)?,
            concept: r.get(2)?,
            amount: r.get(3)?,
            property_id: r.get(4)?,
            tenant_name: r.get(5)?,
        });
    }
    Ok(data)
}
