//
//  kibana-api
//  api/fleet/agent_policies.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Fleet agent policies (`/api/fleet/agent_policies`).

use serde::{Deserialize, Serialize};

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{require, ApiResponse, Page, PageParams, Result};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

use super::Item;

const POLICIES_PATH: &str = "/api/fleet/agent_policies";

/// An agent policy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentPolicy {
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub description: Option<String>,
    /// `active` or `inactive`.
    pub status: Option<String>,
    pub is_managed: bool,
    pub is_default: bool,
    pub is_default_fleet_server: bool,
    pub monitoring_enabled: Vec<String>,
    pub data_output_id: Option<String>,
    pub monitoring_output_id: Option<String>,
    pub fleet_server_host_id: Option<String>,
    pub inactivity_timeout: Option<u64>,
    pub agents: Option<u64>,
    pub revision: u64,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_by: Option<String>,
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentPolicyRequest {
    pub name: String,

    /// Data stream namespace, e.g. `default`.
    pub namespace: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `logs`, `metrics` or both.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub monitoring_enabled: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_output_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitoring_output_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fleet_server_host_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactivity_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_protected: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ListAgentPoliciesRequest {
    pub page: PageParams,
    pub kuery: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    /// Include the agent count of each policy.
    pub with_agent_count: Option<bool>,
    pub full: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateAgentPolicyRequest {
    pub policy: AgentPolicyRequest,
    /// Also install the system integration for host monitoring.
    pub sys_monitoring: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAgentPolicyRequest {
    pub id: String,
    pub policy: AgentPolicyRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeleteAgentPolicyResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    #[serde(rename = "agentPolicyId")]
    agent_policy_id: &'a str,
}

pub struct AgentPolicies<'a> {
    client: &'a KibanaClient,
}

impl<'a> AgentPolicies<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        request: &ListAgentPoliciesRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Page<AgentPolicy>>> {
        let endpoint = Endpoint::get("fleet.list_agent_policies", POLICIES_PATH)
            .query_opt("page", request.page.page)
            .query_opt("perPage", request.page.per_page)
            .query_opt("kuery", request.kuery.as_deref())
            .query_opt("sortField", request.sort_field.as_deref())
            .query_opt("sortOrder", request.sort_order.as_deref())
            .query_opt("withAgentCount", request.with_agent_count)
            .query_opt("full", request.full);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn get(&self, id: &str, options: &[RequestOption]) -> Result<ApiResponse<AgentPolicy>> {
        require("id", id)?;
        let endpoint = Endpoint::get("fleet.get_agent_policy", POLICIES_PATH).param("id", id);
        let response: ApiResponse<Item<AgentPolicy>> =
            self.client.send_json(endpoint, NO_BODY, options).await?;
        Ok(response.map(|wrapped| wrapped.item))
    }

    pub async fn create(
        &self,
        request: &CreateAgentPolicyRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<AgentPolicy>> {
        require("name", &request.policy.name)?;
        require("namespace", &request.policy.namespace)?;
        let endpoint = Endpoint::post("fleet.create_agent_policy", POLICIES_PATH)
            .query_opt("sys_monitoring", request.sys_monitoring);
        let response: ApiResponse<Item<AgentPolicy>> = self
            .client
            .send_json(endpoint, Some(&request.policy), options)
            .await?;
        Ok(response.map(|wrapped| wrapped.item))
    }

    pub async fn update(
        &self,
        request: &UpdateAgentPolicyRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<AgentPolicy>> {
        require("id", &request.id)?;
        require("name", &request.policy.name)?;
        require("namespace", &request.policy.namespace)?;
        let endpoint = Endpoint::put("fleet.update_agent_policy", POLICIES_PATH).param("id", &request.id);
        let response: ApiResponse<Item<AgentPolicy>> = self
            .client
            .send_json(endpoint, Some(&request.policy), options)
            .await?;
        Ok(response.map(|wrapped| wrapped.item))
    }

    /// Deletes a policy. Fleet takes the ID in the body, not the path.
    pub async fn delete(
        &self,
        id: &str,
        options: &[RequestOption],
    ) -> Result<ApiResponse<DeleteAgentPolicyResponse>> {
        require("id", id)?;
        let endpoint = Endpoint::post("fleet.delete_agent_policy", "/api/fleet/agent_policies/delete");
        let body = DeleteBody { agent_policy_id: id };
        self.client.send_json(endpoint, Some(&body), options).await
    }
}
