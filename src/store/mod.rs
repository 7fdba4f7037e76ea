// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage seam for the sweep.
//!
//! The batch driver only ever talks to a [`MovementStore`]; the CLI picks the
//! local SQLite file or the application's REST backend.

use crate::error::StoreResult;
use crate::models::{ClassificationRule, FinancialMovement};

pub mod memory;
pub mod rest;
pub mod sqlite;

pub use memory::MemoryStore;
pub use rest::RestStore;
pub use sqlite::SqliteStore;

pub trait MovementStore {
    /// Movements whose concept still carries the bank boilerplate, newest first.
    fn fetch_movements_with_marker(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>>;

    /// Movements without a property, newest first.
    fn fetch_unassigned_movements(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>>;

    fn fetch_active_rules(&self) -> StoreResult<Vec<ClassificationRule>>;

    /// Returns the number of rows changed.
    fn update_movement_concept(&mut self, id: i64, concept: &str) -> StoreResult<usize>;

    /// Returns the number of rows changed.
    fn update_movement_assignment(
        &mut self,
        id: i64,
        property_id: i64,
        tenant_name: Option<&str>,
    ) -> StoreResult<usize>;

    fn count_movements_with_marker(&self) -> StoreResult<usize> {
        Ok(self.fetch_movements_with_marker(None)?.len())
    }

    fn count_unassigned_movements(&self) -> StoreResult<usize> {
        Ok(self.fetch_unassigned_movements(None)?.len())
    }
}

/// Newest first: date descending, then id descending.
pub(crate) fn sort_newest_first(movements: &mut [FinancialMovement]) {
    movements.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

pub(crate) fn apply_limit<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(n) = limit {
        items.truncate(n);
    }
    items
}
