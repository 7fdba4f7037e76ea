// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{MovementStore, apply_limit, sort_newest_first};
use crate::error::{StoreError, StoreResult};
use crate::models::{ClassificationRule, FinancialMovement};
use crate::normalizer::contains_marker;
use crate::utils::http_client;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

const MOVEMENTS_PATH: &str = "financial-movements";
const RULES_PATH: &str = "classification-rules";

/// [`MovementStore`] backed by the web application's REST API.
///
/// The backend has no server-side filtering, so movements are listed in full
/// and filtered, ordered and limited here.
pub struct RestStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RestStore {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let resp = self.authorize(self.client.get(&url)).send()?;
        if !resp.status().is_success() {
            return Err(StoreError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }
        Ok(resp.json()?)
    }

    fn all_movements(&self) -> StoreResult<Vec<FinancialMovement>> {
        self.get_json(MOVEMENTS_PATH)
    }

    fn patch_movement(&self, id: i64, body: Value) -> StoreResult<usize> {
        let url = self.endpoint(&format!("{MOVEMENTS_PATH}/{id}"));
        debug!(%url, %body, "PATCH");
        let resp = self.authorize(self.client.patch(&url).json(&body)).send()?;
        match resp.status() {
            s if s.is_success() => Ok(1),
            StatusCode::NOT_FOUND => Ok(0),
            s if s.is_client_error() => Err(StoreError::Rejected {
                id,
                reason: format!("{} {}", s.as_u16(), resp.text().unwrap_or_default()),
            }),
            s => Err(StoreError::Status {
                status: s.as_u16(),
                url,
            }),
        }
    }
}

pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub fn select_with_marker(
    mut movements: Vec<FinancialMovement>,
    limit: Option<usize>,
) -> Vec<FinancialMovement> {
    movements.retain(|m| contains_marker(&m.concept));
    sort_newest_first(&mut movements);
    apply_limit(movements, limit)
}

pub fn select_unassigned(
    mut movements: Vec<FinancialMovement>,
    limit: Option<usize>,
) -> Vec<FinancialMovement> {
    movements.retain(|m| m.property_id.is_none());
    sort_newest_first(&mut movements);
    apply_limit(movements, limit)
}

pub fn concept_body(concept: &str) -> Value {
    json!({ "concept": concept })
}

pub fn assignment_body(property_id: i64, tenant_name: Option<&str>) -> Value {
    json!({ "property_id": property_id, "tenant_name": tenant_name })
}

impl MovementStore for RestStore {
    fn fetch_movements_with_marker(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>> {
        Ok(select_with_marker(self.all_movements()?, limit))
    }

    fn fetch_unassigned_movements(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FinancialMovement>> {
        Ok(select_unassigned(self.all_movements()?, limit))
    }

    fn fetch_active_rules(&self) -> StoreResult<Vec<ClassificationRule>> {
        let rules: Vec<ClassificationRule> = self.get_json(RULES_PATH)?;
        Ok(rules.into_iter().filter(|r| r.is_active).collect())
    }

    fn update_movement_concept(&mut self, id: i64, concept: &str) -> StoreResult<usize> {
        self.patch_movement(id, concept_body(concept))
    }

    fn update_movement_assignment(
        &mut self,
        id: i64,
        property_id: i64,
        tenant_name: Option<&str>,
    ) -> StoreResult<usize> {
        self.patch_movement(id, assignment_body(property_id, tenant_name))
    }
}
