// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keyword-rule assignment of movements to properties.
//!
//! A rule matches when its keyword (trimmed, upper-cased) occurs inside the
//! concept (trimmed, upper-cased). Each match scores
//! `keyword chars / concept chars`; the highest score wins, the first rule
//! seen wins ties, and the winner is applied only when its score is strictly
//! above the threshold.

use crate::models::{ClassificationRule, FinancialMovement};
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'r> {
    pub rule: &'r ClassificationRule,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Classification {
    AlreadyAssigned,
    Assigned {
        rule_id: i64,
        property_id: i64,
        score: f64,
    },
    BelowThreshold {
        rule_id: i64,
        score: f64,
    },
    NoMatch,
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    threshold: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Classifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Best-scoring active rule for `concept`, regardless of threshold.
    pub fn best_match<'r>(
        &self,
        concept: &str,
        rules: &'r [ClassificationRule],
    ) -> Option<RuleMatch<'r>> {
        let hay = concept.trim().to_uppercase();
        let hay_len = hay.chars().count();
        if hay_len == 0 {
            return None;
        }
        let mut best: Option<RuleMatch<'r>> = None;
        for rule in rules.iter().filter(|r| r.is_active) {
            let needle = rule.keyword.trim().to_uppercase();
            if needle.is_empty() || !hay.contains(&needle) {
                continue;
            }
            let score = needle.chars().count() as f64 / hay_len as f64;
            if best.is_none_or(|b| score > b.score) {
                best = Some(RuleMatch { rule, score });
            }
        }
        best
    }

    pub fn accepts(&self, score: f64) -> bool {
        score > self.threshold
    }

    /// Decide the assignment for `concept` without touching any movement.
    pub fn evaluate(&self, concept: &str, rules: &[ClassificationRule]) -> Classification {
        match self.best_match(concept, rules) {
            None => Classification::NoMatch,
            Some(m) if self.accepts(m.score) => Classification::Assigned {
                rule_id: m.rule.id,
                property_id: m.rule.property_id,
                score: m.score,
            },
            Some(m) => Classification::BelowThreshold {
                rule_id: m.rule.id,
                score: m.score,
            },
        }
    }

    /// Assign `movement` to the winning rule's property and tenant.
    ///
    /// A movement that already has a property is returned untouched.
    pub fn classify(
        &self,
        movement: &mut FinancialMovement,
        rules: &[ClassificationRule],
    ) -> Classification {
        if movement.is_assigned() {
            return Classification::AlreadyAssigned;
        }
        let Some(m) = self.best_match(&movement.concept, rules) else {
            debug!(movement = movement.id, "no rule matched");
            return Classification::NoMatch;
        };
        if !self.accepts(m.score) {
            debug!(
                movement = movement.id,
                rule = m.rule.id,
                score = m.score,
                "best match below threshold"
            );
            return Classification::BelowThreshold {
                rule_id: m.rule.id,
                score: m.score,
            };
        }
        movement.property_id = Some(m.rule.property_id);
        movement.tenant_name = m.rule.tenant_name.clone();
        debug!(
            movement = movement.id,
            rule = m.rule.id,
            property = m.rule.property_id,
            score = m.score,
            "assigned"
        );
        Classification::Assigned {
            rule_id: m.rule.id,
            property_id: m.rule.property_id,
            score: m.score,
        }
    }
}
