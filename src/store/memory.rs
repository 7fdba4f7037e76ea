// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{MovementStore, apply_limit, sort_newest_first};
use crate::error::{StoreError, StoreResult};
use crate::models::{ClassificationRule, FinancialMovement};
use crate::normalizer::contains_marker;
use std::collections::HashSet;

/// In-process store, handy for tests and for previewing a sweep.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub movements: Vec<FinancialMovement>,
    pub rules: Vec<ClassificationRule>,
    failing_ids: HashSet<i64>,
    writes: usize,
}

impl MemoryStore {
    pub fn new(movements: Vec<FinancialMovement>, rules: Vec<ClassificationRule>) -> Self {
        Self {
            movements,
            rules,
            ..Self::default()
        }
    }

    /// Make every write to movement `id` fail.
    pub fn fail_writes_for(&mut self, id: i64) {
        self.failing_ids.insert(id);
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn movement(&self, id: i64) -> Option<&FinancialMovement> {
        self.movements.iter().find(|m| m.id == id)
    }

    fn select<F>(&self, keep: F, limit: Option<usize>) -> Vec<FinancialMovement>
    where
        F: Fn(&FinancialMovement) -> bool,
    {
        let mut hits: Vec<FinancialMovement> =
            self.movements.iter().filter(|m| keep(m)).cloned().collect();
        sort_newest_first(&mut hits);
        apply_limit(hits, limit)
    }

    fn movement_mut(&mut self, id: i64) -> StoreResult<Option<&mut FinancialMovement>> {
        if self.failing_ids.contains(&id) {
            return Err(StoreError::Rejected {
                id,
                reason: "write failure injected".into(),
            });
        }
        Ok(self.movements.iter_mut().find(|m| m.id == id))
    }
}

impl MovementStore for MemoryStore {
    fn fetch_movements_with_marker(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>> {
        Ok(self.select(|m| contains_marker(&m.concept), limit))
    }

    fn fetch_unassigned_movements(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>> {
        Ok(self.select(|m| m.property_id.is_none(), limit))
    }

    fn fetch_active_rules(&self) -> StoreResult<Vec<ClassificationRule>> {
        Ok(self.rules.iter().filter(|r| r.is_active).cloned().collect())
    }

    fn update_movement_concept(&mut self, id: i64, concept: &str) -> StoreResult<usize> {
        let Some(m) = self.movement_mut(id)? else {
            return Ok(0);
        };
        m.concept = concept.to_string();
        self.writes += 1;
        Ok(1)
    }

    fn update_movement_assignment(
        &mut self,
        id: i64,
        property_id: i64,
        tenant_name: Option<&str>,
    ) -> StoreResult<usize> {
        let Some(m) = self.movement_mut(id)? else {
            return Ok(0);
        };
        if m.property_id.is_some() {
            return Ok(0);
        }
        m.property_id = Some(property_id);
        m.tenant_name = tenant_name.map(str::to_string);
        self.writes += 1;
        Ok(1)
    }
}
