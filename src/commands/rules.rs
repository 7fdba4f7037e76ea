// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classifier::{Classification, Classifier};
use crate::models::ClassificationRule;
use crate::normalizer::normalize_concept;
use crate::store::{MovementStore, SqliteStore};
use crate::utils::{fmt_score, maybe_print_json, opt_arg, parse_id, pretty_table};
use anyhow::{Result, anyhow, bail};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let property_id = *sub.get_one::<i64>("property").unwrap();
            let keyword = sub.get_one::<String>("keyword").unwrap().trim();
            if keyword.is_empty() {
                bail!("Keyword must not be blank");
            }
            let tenant = opt_arg(sub, "tenant");
            let category = opt_arg(sub, "category");
            let subcategory = opt_arg(sub, "subcategory");
            conn.execute(
                "INSERT INTO classification_rules(property_id, keyword, category, subcategory, tenant_name) \
                 VALUES (?1,?2,?3,?4,?5)",
                params![property_id, keyword, category, subcategory, tenant],
            )?;
            println!(
                "Added rule #{}: '{}' -> property {}, tenant {:?}",
                conn.last_insert_rowid(),
                keyword,
                property_id,
                tenant
            );
        }
        Some(("list", sub)) => {
            let rules = list_rules(conn, sub.get_flag("all"))?;
            if !maybe_print_json(sub.get_flag("json"), &rules)? {
                let data = rules
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.to_string(),
                            r.keyword.clone(),
                            r.property_id.to_string(),
                            r.tenant_name.clone().unwrap_or_default(),
                            r.category.clone().unwrap_or_default(),
                            r.subcategory.clone().unwrap_or_default(),
                            if r.is_active { "yes" } else { "no" }.into(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &[
                            "ID",
                            "Keyword",
                            "Property",
                            "Tenant",
                            "Category",
                            "Subcategory",
                            "Active"
                        ],
                        data
                    )
                );
            }
        }
        Some(("rm", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let n = conn.execute("DELETE FROM classification_rules WHERE id=?1", params![id])?;
            if n == 0 {
                return Err(anyhow!("Rule {} not found", id));
            }
            println!("Removed rule {}", id);
        }
        Some(("enable", sub)) => set_active(conn, sub, true)?,
        Some(("disable", sub)) => set_active(conn, sub, false)?,
        Some(("test", sub)) => {
            let concept = sub.get_one::<String>("concept").unwrap();
            let verdict = test_concept(conn, concept)?;
            if !maybe_print_json(sub.get_flag("json"), &verdict)? {
                println!("Concept: {}", verdict.concept);
                match &verdict.classification {
                    Classification::Assigned {
                        rule_id,
                        property_id,
                        score,
                    } => println!(
                        "Rule #{} assigns property {} (score {})",
                        rule_id,
                        property_id,
                        fmt_score(*score)
                    ),
                    Classification::BelowThreshold { rule_id, score } => println!(
                        "Best rule #{} scores {}, not above {}; left unassigned",
                        rule_id,
                        fmt_score(*score),
                        Classifier::default().threshold()
                    ),
                    Classification::NoMatch | Classification::AlreadyAssigned => {
                        println!("No active rule matches")
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn set_active(conn: &Connection, sub: &clap::ArgMatches, active: bool) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let n = conn.execute(
        "UPDATE classification_rules SET is_active=?1 WHERE id=?2",
        params![active, id],
    )?;
    if n == 0 {
        return Err(anyhow!("Rule {} not found", id));
    }
    println!(
        "Rule {} {}",
        id,
        if active { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub fn list_rules(conn: &Connection, include_inactive: bool) -> Result<Vec<ClassificationRule>> {
    Ok(SqliteStore::new(conn).list_rules(include_inactive)?)
}

#[derive(Debug, Serialize)]
pub struct ConceptVerdict {
    pub concept: String,
    pub classification: Classification,
}

/// Classify `raw` against the active rules the same way a sweep would.
pub fn test_concept(conn: &Connection, raw: &str) -> Result<ConceptVerdict> {
    let concept = normalize_concept(raw);
    let rules = SqliteStore::new(conn).fetch_active_rules()?;
    let classification = Classifier::default().evaluate(&concept, &rules);
    Ok(ConceptVerdict {
        concept,
        classification,
    })
}
