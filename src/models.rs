// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single imported bank movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMovement {
    pub id: i64,
    #[serde(default)]
    pub concept: String,
    pub date: NaiveDate,
    pub amount: Decimal, // positive = inflow
    pub property_id: Option<i64>,
    pub tenant_name: Option<String>,
}

impl FinancialMovement {
    pub fn is_assigned(&self) -> bool {
        self.property_id.is_some()
    }
}

/// Owner-defined keyword -> property/tenant mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub id: i64,
    pub property_id: i64,
    pub keyword: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub tenant_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
