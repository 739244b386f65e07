//
//  kibana-api
//  api/fleet/agents.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Fleet agents (`/api/fleet/agents`).

use serde::{Deserialize, Serialize};

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{require, ApiResponse, Page, PageParams, Result};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

use super::Item;

const AGENTS_PATH: &str = "/api/fleet/agents";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentInfo {
    pub id: String,
    pub version: String,
    pub snapshot: bool,
    pub upgradeable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentMetadata {
    pub elastic: Option<serde_json::Value>,
    pub host: Option<serde_json::Value>,
    pub os: Option<serde_json::Value>,
}

/// An enrolled Elastic Agent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Agent {
    pub id: String,
    /// `online`, `offline`, `error`, `updating`, `unenrolling`, ...
    pub status: Option<String>,
    pub active: bool,
    /// `PERMANENT`, `EPHEMERAL` or `TEMPORARY`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub policy_id: Option<String>,
    pub policy_revision: Option<u64>,
    pub enrolled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_checkin: Option<chrono::DateTime<chrono::Utc>>,
    pub unenrolled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub local_metadata: AgentMetadata,
    pub tags: Vec<String>,
    pub agent: Option<AgentInfo>,
}

/// An action queued for one or more agents.
///
/// Serialized as `{"type": "UPGRADE", "data": {...}}`; variants without data
/// omit the `data` member. Action types without a typed variant, or whose
/// `data` does not match it, decode as [`AgentAction::Custom`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentAction {
    Unenroll,
    Upgrade {
        version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_uri: Option<String>,
    },
    Settings {
        /// `debug`, `info`, `warning` or `error`.
        log_level: String,
    },
    PolicyReassign {
        policy_id: String,
    },
    PolicyChange {
        policy: serde_json::Value,
    },
    RequestDiagnostics {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        additional_metrics: Vec<String>,
    },
    /// Any other action type, with its data passed through untouched.
    #[serde(untagged)]
    Custom {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
        data: serde_json::Value,
    },
}

/// A queued action as Fleet returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentActionRecord {
    pub id: String,
    #[serde(flatten)]
    pub action: AgentAction,
    #[serde(default)]
    pub agents: Vec<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub expiration: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ListAgentsRequest {
    pub page: PageParams,
    /// KQL filter, e.g. `status:online and policy_id:p1`.
    pub kuery: Option<String>,
    pub show_inactive: Option<bool>,
    pub show_upgradeable: Option<bool>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub with_metrics: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UnenrollAgentRequest {
    #[serde(skip)]
    pub id: String,
    /// Unenroll immediately and revoke the agent's API keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoke: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

#[derive(Serialize)]
struct ActionBody<'a> {
    action: &'a AgentAction,
}

#[derive(Serialize)]
struct ReassignBody<'a> {
    policy_id: &'a str,
}

pub struct Agents<'a> {
    client: &'a KibanaClient,
}

impl<'a> Agents<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        request: &ListAgentsRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Page<Agent>>> {
        let endpoint = Endpoint::get("fleet.list_agents", AGENTS_PATH)
            .query_opt("page", request.page.page)
            .query_opt("perPage", request.page.per_page)
            .query_opt("kuery", request.kuery.as_deref())
            .query_opt("showInactive", request.show_inactive)
            .query_opt("showUpgradeable", request.show_upgradeable)
            .query_opt("sortField", request.sort_field.as_deref())
            .query_opt("sortOrder", request.sort_order.as_deref())
            .query_opt("withMetrics", request.with_metrics);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn get(&self, id: &str, options: &[RequestOption]) -> Result<ApiResponse<Agent>> {
        require("id", id)?;
        let endpoint = Endpoint::get("fleet.get_agent", AGENTS_PATH).param("id", id);
        let response: ApiResponse<Item<Agent>> =
            self.client.send_json(endpoint, NO_BODY, options).await?;
        Ok(response.map(|wrapped| wrapped.item))
    }

    /// Queues `action` for the agent.
    pub async fn action(
        &self,
        id: &str,
        action: &AgentAction,
        options: &[RequestOption],
    ) -> Result<ApiResponse<AgentActionRecord>> {
        require("id", id)?;
        let endpoint = Endpoint::post("fleet.create_agent_action", AGENTS_PATH)
            .param("id", id)
            .then("actions");
        let response: ApiResponse<Item<AgentActionRecord>> = self
            .client
            .send_json(endpoint, Some(&ActionBody { action }), options)
            .await?;
        Ok(response.map(|wrapped| wrapped.item))
    }

    /// Moves the agent to another policy.
    pub async fn reassign(
        &self,
        id: &str,
        policy_id: &str,
        options: &[RequestOption],
    ) -> Result<ApiResponse<()>> {
        require("id", id)?;
        require("policy_id", policy_id)?;
        let endpoint = Endpoint::post("fleet.reassign_agent", AGENTS_PATH)
            .param("id", id)
            .then("reassign");
        self.client
            .send_empty(endpoint, Some(&ReassignBody { policy_id }), options)
            .await
    }

    pub async fn unenroll(
        &self,
        request: &UnenrollAgentRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<()>> {
        require("id", &request.id)?;
        let endpoint = Endpoint::post("fleet.unenroll_agent", AGENTS_PATH)
            .param("id", &request.id)
            .then("unenroll");
        self.client.send_empty(endpoint, Some(request), options).await
    }
}
