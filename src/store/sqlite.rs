// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::MovementStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{ClassificationRule, FinancialMovement};
use crate::normalizer::{MARKER_PREFIX, contains_marker};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

const MOVEMENT_COLUMNS: &str =
    "SELECT id, date, COALESCE(concept,''), amount, property_id, tenant_name FROM financial_movements";

/// [`MovementStore`] over the application's SQLite file.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn query_movements(
        &self,
        filter: &str,
        bind: Option<&str>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>> {
        let mut sql = format!("{MOVEMENT_COLUMNS} WHERE {filter} ORDER BY date DESC, id DESC");
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match bind {
            Some(b) => stmt.query(params![b])?,
            None => stmt.query([])?,
        };
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let date: NaiveDate = r.get(1)?;
            let concept: String = r.get(2)?;
            let amount = decimal_from_value(id, r.get::<_, Value>(3)?)?;
            out.push(FinancialMovement {
                id,
                concept,
                date,
                amount,
                property_id: r.get(4)?,
                tenant_name: r.get(5)?,
            });
        }
        Ok(out)
    }

    /// Rules in id order; inactive ones only when asked for.
    pub fn list_rules(&self, include_inactive: bool) -> StoreResult<Vec<ClassificationRule>> {
        let mut sql = String::from(
            "SELECT id, property_id, keyword, category, subcategory, tenant_name, is_active \
             FROM classification_rules",
        );
        if !include_inactive {
            sql.push_str(" WHERE is_active = 1");
        }
        sql.push_str(" ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rules = stmt
            .query_map([], |r| {
                Ok(ClassificationRule {
                    id: r.get(0)?,
                    property_id: r.get(1)?,
                    keyword: r.get(2)?,
                    category: r.get(3)?,
                    subcategory: r.get(4)?,
                    tenant_name: r.get(5)?,
                    is_active: r.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rules)
    }
}

// The web app has written amounts both as TEXT and as REAL over time.
fn decimal_from_value(id: i64, v: Value) -> StoreResult<Decimal> {
    match v {
        Value::Text(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|e| StoreError::Decode(format!("amount '{}' of movement {}: {}", s, id, e))),
        Value::Real(f) => Decimal::try_from(f)
            .map_err(|e| StoreError::Decode(format!("amount {} of movement {}: {}", f, id, e))),
        Value::Integer(i) => Ok(Decimal::from(i)),
        Value::Null => Err(StoreError::Decode(format!("amount of movement {} is NULL", id))),
        Value::Blob(_) => Err(StoreError::Decode(format!("amount of movement {} is a blob", id))),
    }
}

impl MovementStore for SqliteStore<'_> {
    fn fetch_movements_with_marker(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>> {
        // LIKE is only a prefilter; the phrase may be wrapped across lines.
        let rows = self.query_movements(
            "concept LIKE '%' || ?1 || '%'",
            Some(MARKER_PREFIX),
            None,
        )?;
        let hits = rows
            .into_iter()
            .filter(|m| contains_marker(&m.concept))
            .collect();
        Ok(super::apply_limit(hits, limit))
    }

    fn fetch_unassigned_movements(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>> {
        self.query_movements("property_id IS NULL", None, limit)
    }

    fn fetch_active_rules(&self) -> StoreResult<Vec<ClassificationRule>> {
        self.list_rules(false)
    }

    fn update_movement_concept(&mut self, id: i64, concept: &str) -> StoreResult<usize> {
        let n = self.conn.execute(
            "UPDATE financial_movements SET concept=?1 WHERE id=?2",
            params![concept, id],
        )?;
        Ok(n)
    }

    fn update_movement_assignment(
        &mut self,
        id: i64,
        property_id: i64,
        tenant_name: Option<&str>,
    ) -> StoreResult<usize> {
        // Never overwrite an assignment made since the fetch.
        let n = self.conn.execute(
            "UPDATE financial_movements SET property_id=?1, tenant_name=?2 \
             WHERE id=?3 AND property_id IS NULL",
            params![property_id, tenant_name, id],
        )?;
        Ok(n)
    }

    fn count_unassigned_movements(&self) -> StoreResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM financial_movements WHERE property_id IS NULL",
            [],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }
}
