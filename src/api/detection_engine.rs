//
//  kibana-api
//  api/detection_engine.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Elastic Security detection rules (`/api/detection_engine/rules`).
//!
//! Detection rules share a common set of fields (name, risk score, severity,
//! schedule) and add type-specific fields selected by `type`. The common
//! fields live on the request structs; the type-specific ones live in
//! [`DetectionRuleKind`], which is flattened into the same JSON object.
//!
//! Rules are addressed either by Kibana's saved-object `id` or by the
//! stable `rule_id` chosen at creation; see [`RuleLocator`].

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{require, ApiResponse, Error, NdjsonExport, Page, PageParams, Result, SuccessRule};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

const RULES_PATH: &str = "/api/detection_engine/rules";

/// Threshold grouping for `threshold` rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    #[serde(default)]
    pub field: Vec<String>,
    pub value: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cardinality: Vec<serde_json::Value>,
}

/// Indicator match mapping entry for `threat_match` rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatMappingEntry {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatMapping {
    pub entries: Vec<ThreatMappingEntry>,
}

/// The type-specific part of a detection rule.
///
/// Serialized inline with the common rule fields, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DetectionRuleKind {
    Query {
        query: String,
        #[serde(default = "kuery")]
        language: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        index: Vec<String>,
    },
    Eql {
        query: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        index: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        event_category_override: Option<String>,
    },
    Esql {
        query: String,
    },
    Threshold {
        query: String,
        #[serde(default = "kuery")]
        language: String,
        threshold: Threshold,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        index: Vec<String>,
    },
    ThreatMatch {
        query: String,
        #[serde(default = "kuery")]
        language: String,
        threat_query: String,
        threat_index: Vec<String>,
        threat_mapping: Vec<ThreatMapping>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        index: Vec<String>,
    },
    MachineLearning {
        anomaly_threshold: u32,
        machine_learning_job_id: Vec<String>,
    },
    NewTerms {
        query: String,
        #[serde(default = "kuery")]
        language: String,
        new_terms_fields: Vec<String>,
        history_window_start: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        index: Vec<String>,
    },
    SavedQuery {
        saved_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        index: Vec<String>,
    },
}

fn kuery() -> String {
    "kuery".to_string()
}

impl DetectionRuleKind {
    /// The `type` value this variant is sent with.
    pub fn rule_type(&self) -> &'static str {
        match self {
            Self::Query { .. } => "query",
            Self::Eql { .. } => "eql",
            Self::Esql { .. } => "esql",
            Self::Threshold { .. } => "threshold",
            Self::ThreatMatch { .. } => "threat_match",
            Self::MachineLearning { .. } => "machine_learning",
            Self::NewTerms { .. } => "new_terms",
            Self::SavedQuery { .. } => "saved_query",
        }
    }
}

/// `low`, `medium`, `high` or `critical`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

/// A detection rule as Kibana returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectionRule {
    pub id: String,
    pub rule_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub risk_score: u32,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub revision: Option<u32>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(flatten)]
    pub kind: DetectionRuleKind,
}

/// Body of a create or full update (PUT) request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionRuleRequest {
    /// Saved-object ID; used by update only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    pub name: String,
    pub description: String,
    pub risk_score: u32,
    pub severity: Severity,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Run interval, e.g. `5m`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// Lookback, e.g. `now-6m`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(flatten)]
    pub kind: DetectionRuleKind,
}

impl DetectionRuleRequest {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_score: u32,
        severity: Severity,
        kind: DetectionRuleKind,
    ) -> Self {
        Self {
            id: None,
            rule_id: None,
            name: name.into(),
            description: description.into(),
            risk_score,
            severity,
            enabled: None,
            tags: Vec::new(),
            interval: None,
            from: None,
            kind,
        }
    }

    fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("description", &self.description)
    }
}

/// Body of a partial update. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatchDetectionRuleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DetectionRuleKind>,
}

/// Identifies a rule by saved-object ID or by `rule_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleLocator {
    Id(String),
    RuleId(String),
}

impl RuleLocator {
    fn query(&self) -> Result<(&'static str, &str)> {
        match self {
            Self::Id(id) => require("id", id).map(|_| ("id", id.as_str())),
            Self::RuleId(rule_id) => require("rule_id", rule_id).map(|_| ("rule_id", rule_id.as_str())),
        }
    }
}

fn require_locator(id: &Option<String>, rule_id: &Option<String>) -> Result<()> {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
    if present(id) || present(rule_id) {
        Ok(())
    } else {
        Err(Error::Validation("id or rule_id is required".to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindDetectionRulesRequest {
    pub page: PageParams,
    /// KQL filter, e.g. `alert.attributes.tags:"MITRE"`.
    pub filter: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExportDetectionRulesRequest {
    /// `rule_id`s to export. Empty exports every rule.
    pub rule_ids: Vec<String>,
    pub exclude_export_details: Option<bool>,
    pub file_name: Option<String>,
}

/// Detection rule endpoints.
pub struct DetectionEngine<'a> {
    client: &'a KibanaClient,
}

impl<'a> DetectionEngine<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        request: &DetectionRuleRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<DetectionRule>> {
        request.validate()?;
        let endpoint = Endpoint::post("detection_engine.create_rule", RULES_PATH);
        self.client.send_json(endpoint, Some(request), options).await
    }

    /// Replaces a rule. Fields left out are reset to their defaults.
    pub async fn update(
        &self,
        request: &DetectionRuleRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<DetectionRule>> {
        require_locator(&request.id, &request.rule_id)?;
        request.validate()?;
        let endpoint = Endpoint::put("detection_engine.update_rule", RULES_PATH);
        self.client.send_json(endpoint, Some(request), options).await
    }

    pub async fn patch(
        &self,
        request: &PatchDetectionRuleRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<DetectionRule>> {
        require_locator(&request.id, &request.rule_id)?;
        let endpoint = Endpoint::patch("detection_engine.patch_rule", RULES_PATH);
        self.client.send_json(endpoint, Some(request), options).await
    }

    pub async fn get(
        &self,
        locator: &RuleLocator,
        options: &[RequestOption],
    ) -> Result<ApiResponse<DetectionRule>> {
        let (key, value) = locator.query()?;
        let endpoint = Endpoint::get("detection_engine.read_rule", RULES_PATH).query(key, value);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    /// Deletes a rule and returns it as it was before deletion.
    pub async fn delete(
        &self,
        locator: &RuleLocator,
        options: &[RequestOption],
    ) -> Result<ApiResponse<DetectionRule>> {
        let (key, value) = locator.query()?;
        let endpoint = Endpoint::delete("detection_engine.delete_rule", RULES_PATH).query(key, value);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn find(
        &self,
        request: &FindDetectionRulesRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Page<DetectionRule>>> {
        let endpoint = Endpoint::get("detection_engine.find_rules", "/api/detection_engine/rules/_find")
            .query_opt("page", request.page.page)
            .query_opt("per_page", request.page.per_page)
            .query_opt("filter", request.filter.as_deref())
            .query_opt("sort_field", request.sort_field.as_deref())
            .query_opt("sort_order", request.sort_order.as_deref())
            .query_all("fields", &request.fields);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    /// Exports rules as NDJSON. The last record is the export summary unless
    /// `exclude_export_details` is set.
    pub async fn export(
        &self,
        request: &ExportDetectionRulesRequest,
        options: &[RequestOption],
    ) -> Result<NdjsonExport> {
        let endpoint = Endpoint::post("detection_engine.export_rules", "/api/detection_engine/rules/_export")
            .query_opt("exclude_export_details", request.exclude_export_details)
            .query_opt("file_name", request.file_name.as_deref())
            .success(SuccessRule::Below299);

        if request.rule_ids.is_empty() {
            return self.client.send_ndjson(endpoint, NO_BODY, options).await;
        }
        let objects: Vec<_> = request
            .rule_ids
            .iter()
            .map(|rule_id| json!({ "rule_id": rule_id }))
            .collect();
        let body = json!({ "objects": objects });
        self.client.send_ndjson(endpoint, Some(&body), options).await
    }
}
