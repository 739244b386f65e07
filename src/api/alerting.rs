//
//  kibana-api
//  api/alerting.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Kibana alerting rules API (`/api/alerting`).
//!
//! A rule's `params` shape depends on its `rule_type_id`. Params stay opaque
//! JSON on the wire; [`CreateRuleRequest::set_params`] and
//! [`Rule::params_as`] convert to and from typed structs such as
//! [`IndexThresholdParams`] and [`EsQueryParams`].
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | [`AlertingRules::create`] | POST | `/api/alerting/rule[/{id}]` |
//! | [`AlertingRules::get`] | GET | `/api/alerting/rule/{id}` |
//! | [`AlertingRules::update`] | PUT | `/api/alerting/rule/{id}` |
//! | [`AlertingRules::delete`] | DELETE | `/api/alerting/rule/{id}` |
//! | [`AlertingRules::find`] | GET | `/api/alerting/rules/_find` |
//! | [`AlertingRules::enable`] | POST | `/api/alerting/rule/{id}/_enable` |
//! | [`AlertingRules::disable`] | POST | `/api/alerting/rule/{id}/_disable` |
//! | [`AlertingRules::mute_all`] | POST | `/api/alerting/rule/{id}/_mute_all` |
//! | [`AlertingRules::unmute_all`] | POST | `/api/alerting/rule/{id}/_unmute_all` |
//! | [`AlertingRules::health`] | GET | `/api/alerting/_health` |

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{require, ApiResponse, Error, Page, PageParams, Result, SuccessRule};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

const RULE_PATH: &str = "/api/alerting/rule";

/// How often a rule runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Interval such as `1m`, `5m` or `1h`.
    pub interval: String,
}

impl Schedule {
    pub fn every(interval: impl Into<String>) -> Self {
        Self {
            interval: interval.into(),
        }
    }
}

/// Per-action notification throttling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionFrequency {
    pub summary: bool,

    /// `onActionGroupChange`, `onActiveAlert` or `onThrottleInterval`.
    pub notify_when: String,

    #[serde(default)]
    pub throttle: Option<String>,
}

/// An action the rule runs through a connector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleAction {
    /// Connector ID.
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Connector action parameters; shape depends on the connector type.
    #[serde(default)]
    pub params: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<ActionFrequency>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_type_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecutionStatus {
    /// `ok`, `active`, `error`, `pending`, `unknown` or `warning`.
    pub status: String,

    #[serde(default)]
    pub last_execution_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_duration: Option<u64>,

    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// An alerting rule as Kibana returns it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub rule_type_id: String,
    pub consumer: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub actions: Vec<RuleAction>,
    #[serde(default)]
    pub throttle: Option<String>,
    #[serde(default)]
    pub notify_when: Option<String>,
    #[serde(default)]
    pub mute_all: bool,
    #[serde(default)]
    pub muted_alert_ids: Vec<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub api_key_owner: Option<String>,
    #[serde(default)]
    pub execution_status: Option<ExecutionStatus>,
    #[serde(default)]
    pub revision: Option<u64>,
}

impl Rule {
    /// Decodes `params` into the typed shape for this rule type.
    pub fn params_as<P: DeserializeOwned>(&self) -> serde_json::Result<P> {
        serde_json::from_value(self.params.clone())
    }
}

/// Body of a create request.
///
/// When `id` is set Kibana uses it instead of generating one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateRuleRequest {
    #[serde(skip)]
    pub id: Option<String>,

    pub name: String,

    /// Rule type, e.g. `.index-threshold` or `.es-query`.
    pub rule_type_id: String,

    /// Owning application, e.g. `alerts`, `stackAlerts`, `infrastructure`.
    pub consumer: String,

    pub schedule: Schedule,

    pub params: serde_json::Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<RuleAction>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_when: Option<String>,
}

impl CreateRuleRequest {
    /// Encodes typed rule-type parameters into `params`.
    pub fn set_params<P: Serialize>(&mut self, params: &P) -> Result<()> {
        self.params = serde_json::to_value(params).map_err(Error::Serialize)?;
        Ok(())
    }
}

/// Replaces a rule's mutable fields. Type and consumer cannot change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateRuleRequest {
    #[serde(skip)]
    pub id: String,

    pub name: String,

    pub schedule: Schedule,

    pub params: serde_json::Value,

    pub actions: Vec<RuleAction>,

    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_when: Option<String>,
}

impl UpdateRuleRequest {
    pub fn set_params<P: Serialize>(&mut self, params: &P) -> Result<()> {
        self.params = serde_json::to_value(params).map_err(Error::Serialize)?;
        Ok(())
    }
}

/// Targets a single rule by ID.
#[derive(Debug, Clone, Default)]
pub struct RuleIdRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default)]
pub struct FindRulesRequest {
    pub page: PageParams,
    pub search: Option<String>,
    pub search_fields: Vec<String>,
    /// `OR` or `AND`.
    pub default_search_operator: Option<String>,
    pub sort_field: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
    /// KQL filter, e.g. `alert.attributes.tags:"prod"`.
    pub filter: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertingHealth {
    #[serde(default)]
    pub is_sufficiently_secure: bool,
    #[serde(default)]
    pub has_permanent_encryption_key: bool,
    #[serde(default)]
    pub alerting_framework_health: serde_json::Value,
}

/// Params for the `.index-threshold` rule type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexThresholdParams {
    pub index: Vec<String>,
    pub time_field: String,
    /// `count`, `avg`, `min`, `max` or `sum`.
    pub agg_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agg_field: Option<String>,
    /// `all` or `top`.
    pub group_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_size: Option<u32>,
    pub time_window_size: u32,
    /// `s`, `m`, `h` or `d`.
    pub time_window_unit: String,
    /// `>`, `<`, `>=`, `<=`, `between` or `notBetween`.
    pub threshold_comparator: String,
    pub threshold: Vec<f64>,
}

/// Params for the `.es-query` rule type using a query DSL search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsQueryParams {
    pub index: Vec<String>,
    pub time_field: String,
    /// The query DSL as a JSON string.
    pub es_query: String,
    pub size: u32,
    pub time_window_size: u32,
    pub time_window_unit: String,
    pub threshold_comparator: String,
    pub threshold: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,
}

/// Alerting rule endpoints.
pub struct AlertingRules<'a> {
    client: &'a KibanaClient,
}

impl<'a> AlertingRules<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        request: &CreateRuleRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Rule>> {
        require("name", &request.name)?;
        require("rule_type_id", &request.rule_type_id)?;
        require("consumer", &request.consumer)?;
        let mut endpoint = Endpoint::post("alerting.create_rule", RULE_PATH);
        if let Some(id) = request.id.as_deref() {
            require("id", id)?;
            endpoint = endpoint.param("id", id);
        }
        self.client.send_json(endpoint, Some(request), options).await
    }

    pub async fn get(
        &self,
        request: &RuleIdRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Rule>> {
        require("id", &request.id)?;
        let endpoint = Endpoint::get("alerting.get_rule", RULE_PATH).param("id", &request.id);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn update(
        &self,
        request: &UpdateRuleRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Rule>> {
        require("id", &request.id)?;
        require("name", &request.name)?;
        let endpoint = Endpoint::put("alerting.update_rule", RULE_PATH).param("id", &request.id);
        self.client.send_json(endpoint, Some(request), options).await
    }

    pub async fn delete(
        &self,
        request: &RuleIdRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<()>> {
        self.rule_action("alerting.delete_rule", request, None, options)
            .await
    }

    pub async fn find(
        &self,
        request: &FindRulesRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Page<Rule>>> {
        let endpoint = Endpoint::get("alerting.find_rules", "/api/alerting/rules/_find")
            .query_opt("page", request.page.page)
            .query_opt("per_page", request.page.per_page)
            .query_opt("search", request.search.as_deref())
            .query_all("search_fields", &request.search_fields)
            .query_opt(
                "default_search_operator",
                request.default_search_operator.as_deref(),
            )
            .query_opt("sort_field", request.sort_field.as_deref())
            .query_opt("sort_order", request.sort_order.as_deref())
            .query_opt("filter", request.filter.as_deref())
            .query_all("fields", &request.fields);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn enable(&self, request: &RuleIdRequest, options: &[RequestOption]) -> Result<ApiResponse<()>> {
        self.rule_action("alerting.enable_rule", request, Some("_enable"), options)
            .await
    }

    pub async fn disable(&self, request: &RuleIdRequest, options: &[RequestOption]) -> Result<ApiResponse<()>> {
        self.rule_action("alerting.disable_rule", request, Some("_disable"), options)
            .await
    }

    pub async fn mute_all(&self, request: &RuleIdRequest, options: &[RequestOption]) -> Result<ApiResponse<()>> {
        self.rule_action("alerting.mute_all", request, Some("_mute_all"), options)
            .await
    }

    pub async fn unmute_all(&self, request: &RuleIdRequest, options: &[RequestOption]) -> Result<ApiResponse<()>> {
        self.rule_action("alerting.unmute_all", request, Some("_unmute_all"), options)
            .await
    }

    pub async fn health(&self, options: &[RequestOption]) -> Result<ApiResponse<AlertingHealth>> {
        let endpoint = Endpoint::get("alerting.health", "/api/alerting/_health");
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    /// DELETE on the rule itself, or POST to one of its `_action` paths.
    /// Kibana answers `204` to all of them.
    async fn rule_action(
        &self,
        name: &'static str,
        request: &RuleIdRequest,
        action: Option<&str>,
        options: &[RequestOption],
    ) -> Result<ApiResponse<()>> {
        require("id", &request.id)?;
        let endpoint = match action {
            Some(action) => Endpoint::post(name, RULE_PATH)
                .param("id", &request.id)
                .then(action),
            None => Endpoint::delete(name, RULE_PATH).param("id", &request.id),
        };
        let endpoint = endpoint.success(SuccessRule::Below299);
        self.client.send_empty(endpoint, NO_BODY, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client, MockTransport};
    use reqwest::Method;
    use serde_json::json;

    const RULE_JSON: &str = r#"{
        "id": "41893910-6bca-11eb-9e0d-85d233e3ee35",
        "name": "cpu over 90",
        "rule_type_id": ".index-threshold",
        "consumer": "alerts",
        "enabled": true,
        "tags": ["prod"],
        "schedule": {"interval": "1m"},
        "params": {
            "index": ["metrics-*"], "timeField": "@timestamp", "aggType": "avg",
            "aggField": "system.cpu.total.pct", "groupBy": "all", "timeWindowSize": 5,
            "timeWindowUnit": "m", "thresholdComparator": ">", "threshold": [0.9]
        },
        "actions": [],
        "mute_all": false,
        "muted_alert_ids": [],
        "created_at": "2024-03-01T10:00:00.000Z",
        "updated_at": "2024-03-01T10:05:00.000Z",
        "execution_status": {"status": "ok", "last_execution_date": "2024-03-01T10:06:00.000Z", "last_duration": 52}
    }"#;

    fn threshold_params() -> IndexThresholdParams {
        IndexThresholdParams {
            index: vec!["metrics-*".into()],
            time_field: "@timestamp".into(),
            agg_type: "avg".into(),
            agg_field: Some("system.cpu.total.pct".into()),
            group_by: "all".into(),
            time_window_size: 5,
            time_window_unit: "m".into(),
            threshold_comparator: ">".into(),
            threshold: vec![0.9],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_typed_params() {
        let transport = MockTransport::respond(200, RULE_JSON);
        let mut request = CreateRuleRequest {
            name: "cpu over 90".into(),
            rule_type_id: ".index-threshold".into(),
            consumer: "alerts".into(),
            schedule: Schedule::every("1m"),
            tags: vec!["prod".into()],
            ..Default::default()
        };
        request.set_params(&threshold_params()).unwrap();

        let response = client(&transport)
            .alerting()
            .create(&request, &[])
            .await
            .unwrap();

        let rule = response.body;
        assert_eq!(rule.params_as::<IndexThresholdParams>().unwrap(), threshold_params());
        assert_eq!(
            rule.execution_status.unwrap().last_execution_date.unwrap().to_rfc3339(),
            "2024-03-01T10:06:00+00:00"
        );

        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/api/alerting/rule");
        let body = sent.json();
        assert_eq!(body["params"]["timeField"], "@timestamp");
        assert_eq!(body["schedule"], json!({"interval": "1m"}));
        assert!(body.get("actions").is_none());
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn test_find_passes_pagination_through() {
        let transport = MockTransport::respond(
            200,
            &format!(r#"{{"page":2,"per_page":1,"total":3,"data":[{}]}}"#, RULE_JSON),
        );
        let request = FindRulesRequest {
            page: PageParams::new(2, 1),
            search_fields: vec!["name".into(), "tags".into()],
            filter: Some(r#"alert.attributes.tags:"prod""#.into()),
            ..Default::default()
        };
        let response = client(&transport)
            .alerting()
            .find(&request, &[])
            .await
            .unwrap();

        assert_eq!(response.body.items.len(), 1);
        assert_eq!(response.body.next_page(), Some(3));
        assert_eq!(
            transport.last_request().query(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "1".to_string()),
                ("search_fields".to_string(), "name".to_string()),
                ("search_fields".to_string(), "tags".to_string()),
                ("filter".to_string(), r#"alert.attributes.tags:"prod""#.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_enable_posts_to_action_path() {
        let transport = MockTransport::respond(204, "");
        client(&transport)
            .alerting()
            .enable(&RuleIdRequest { id: "r1".into() }, &[])
            .await
            .unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url.path(), "/api/alerting/rule/r1/_enable");
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn test_delete_conflict_is_error() {
        let transport = MockTransport::respond(
            409,
            r#"{"statusCode":409,"error":"Conflict","message":"rule is being updated"}"#,
        );
        let err = client(&transport)
            .alerting()
            .delete(&RuleIdRequest { id: "r1".into() }, &[])
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("HTTP Status Code 409"));
        assert_eq!(transport.last_request().method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_health() {
        let transport = MockTransport::respond(
            200,
            r#"{"is_sufficiently_secure":true,"has_permanent_encryption_key":true,"alerting_framework_health":{"execution_health":{"status":"ok"}}}"#,
        );
        let health = client(&transport).alerting().health(&[]).await.unwrap().into_body();
        assert!(health.is_sufficiently_secure);
        assert_eq!(
            health.alerting_framework_health["execution_health"]["status"],
            "ok"
        );
    }
}
