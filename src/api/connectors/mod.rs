//
//  kibana-api
//  api/connectors/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Kibana connectors API (`/api/actions`).
//!
//! Connectors hold the credentials and settings rule actions use to reach
//! external systems. The per-type payloads live in [`types`].
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | [`Connectors::create`] | POST | `/api/actions/connector[/{id}]` |
//! | [`Connectors::get`] | GET | `/api/actions/connector/{id}` |
//! | [`Connectors::list`] | GET | `/api/actions/connectors` |
//! | [`Connectors::update`] | PUT | `/api/actions/connector/{id}` |
//! | [`Connectors::delete`] | DELETE | `/api/actions/connector/{id}` |
//! | [`Connectors::execute`] | POST | `/api/actions/connector/{id}/_execute` |
//! | [`Connectors::types`] | GET | `/api/actions/connector_types` |
//!
//! # Example
//!
//! ```rust,no_run
//! use kibana_api::api::connectors::{ConnectorConfig, CreateConnectorRequest, IndexConfig};
//! use kibana_api::KibanaClient;
//!
//! # async fn example(client: &KibanaClient) -> kibana_api::Result<()> {
//! let request = CreateConnectorRequest {
//!     id: None,
//!     name: "alerts history".to_string(),
//!     connector: ConnectorConfig::Index {
//!         config: IndexConfig {
//!             index: "alerts-history".to_string(),
//!             ..Default::default()
//!         },
//!     },
//! };
//! let created = client.connectors().create(&request, &[]).await?;
//! println!("created connector {}", created.body.id);
//! # Ok(())
//! # }
//! ```

pub mod types;

pub use types::*;

use serde::{Deserialize, Serialize};

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{require, ApiResponse, Error, Result, SuccessRule};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

/// A connector as Kibana returns it. Secrets are never included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,

    pub name: String,

    pub connector_type_id: String,

    /// Type-specific configuration; see [`Connector::typed`].
    #[serde(default)]
    pub config: Option<serde_json::Value>,

    #[serde(default)]
    pub is_preconfigured: bool,

    #[serde(default)]
    pub is_deprecated: bool,

    #[serde(default)]
    pub is_system_action: bool,

    #[serde(default)]
    pub is_missing_secrets: Option<bool>,

    /// Number of rules referencing this connector (list responses only).
    #[serde(default)]
    pub referenced_by_count: Option<u64>,
}

impl Connector {
    /// Pairs the opaque `config` with its typed [`ConnectorConfig`] variant.
    pub fn typed(&self) -> serde_json::Result<ConnectorConfig> {
        serde_json::from_value(serde_json::json!({
            "connector_type_id": self.connector_type_id,
            "config": self.config.clone().unwrap_or_else(|| serde_json::json!({})),
        }))
    }
}

/// Body of a create request.
///
/// When `id` is set Kibana uses it instead of generating one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateConnectorRequest {
    #[serde(skip)]
    pub id: Option<String>,

    pub name: String,

    #[serde(flatten)]
    pub connector: ConnectorConfig,
}

/// Replaces a connector's name, config and secrets. The type cannot change.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateConnectorRequest {
    pub id: String,
    pub name: String,
    pub connector: ConnectorConfig,
}

#[derive(Debug, Clone, Default)]
pub struct GetConnectorRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteConnectorRequest {
    pub id: String,
}

/// Runs a connector once with ad-hoc action parameters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecuteConnectorRequest {
    #[serde(skip)]
    pub id: String,

    pub params: serde_json::Value,
}

impl ExecuteConnectorRequest {
    /// Encodes typed action parameters into `params`.
    pub fn set_params<P: Serialize>(&mut self, params: &P) -> Result<()> {
        self.params = serde_json::to_value(params).map_err(Error::Serialize)?;
        Ok(())
    }
}

/// Typed parameters for `.index` connectors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexActionParams {
    pub documents: Vec<serde_json::Value>,
}

/// Typed parameters for `.server-log` connectors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerLogActionParams {
    pub message: String,

    /// `trace`, `debug`, `info`, `warn`, `error` or `fatal`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Outcome of [`Connectors::execute`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorExecuteResult {
    pub connector_id: String,

    /// `ok` or `error`.
    pub status: String,

    #[serde(default)]
    pub data: Option<serde_json::Value>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub service_message: Option<String>,

    #[serde(default)]
    pub retry: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ListConnectorTypesRequest {
    /// Restrict to types usable by a feature (e.g. `alerting`, `cases`).
    pub feature_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub enabled_in_config: bool,
    #[serde(default)]
    pub enabled_in_license: bool,
    #[serde(default)]
    pub minimum_license_required: Option<String>,
    #[serde(default)]
    pub supported_feature_ids: Vec<String>,
}

pub struct Connectors<'a> {
    client: &'a KibanaClient,
}

impl<'a> Connectors<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        request: &CreateConnectorRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Connector>> {
        require("name", &request.name)?;
        let mut endpoint = Endpoint::post("connectors.create", "/api/actions/connector");
        if let Some(id) = request.id.as_deref() {
            require("id", id)?;
            endpoint = endpoint.param("id", id);
        }
        self.client.send_json(endpoint, Some(request), options).await
    }

    pub async fn get(
        &self,
        request: &GetConnectorRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Connector>> {
        require("id", &request.id)?;
        let endpoint =
            Endpoint::get("connectors.get", "/api/actions/connector").param("id", &request.id);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn list(&self, options: &[RequestOption]) -> Result<ApiResponse<Vec<Connector>>> {
        let endpoint = Endpoint::get("connectors.list", "/api/actions/connectors");
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn update(
        &self,
        request: &UpdateConnectorRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Connector>> {
        require("id", &request.id)?;
        require("name", &request.name)?;
        let mut body = request.connector.untagged_members().map_err(Error::Serialize)?;
        body.insert("name".to_string(), request.name.clone().into());

        let endpoint =
            Endpoint::put("connectors.update", "/api/actions/connector").param("id", &request.id);
        self.client.send_json(endpoint, Some(&body), options).await
    }

    /// Deletes a connector. Kibana answers `204`.
    pub async fn delete(
        &self,
        request: &DeleteConnectorRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<()>> {
        require("id", &request.id)?;
        let endpoint = Endpoint::delete("connectors.delete", "/api/actions/connector")
            .param("id", &request.id)
            .success(SuccessRule::Below299);
        self.client.send_empty(endpoint, NO_BODY, options).await
    }

    /// Executes a connector. A connector-level failure still answers `200`
    /// with `status: "error"` in the result.
    pub async fn execute(
        &self,
        request: &ExecuteConnectorRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<ConnectorExecuteResult>> {
        require("id", &request.id)?;
        let endpoint = Endpoint::post("connectors.execute", "/api/actions/connector")
            .param("id", &request.id)
            .then("_execute");
        self.client.send_json(endpoint, Some(request), options).await
    }

    pub async fn types(
        &self,
        request: &ListConnectorTypesRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Vec<ConnectorType>>> {
        let endpoint = Endpoint::get("connectors.types", "/api/actions/connector_types")
            .query_opt("feature_id", request.feature_id.as_deref());
        self.client.send_json(endpoint, NO_BODY, options).await
    }
}
