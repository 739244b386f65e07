//
//  kibana-api
//  api/fleet/outputs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Fleet outputs (`/api/fleet/outputs`).

use serde::Deserialize;

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{require, ApiResponse, Page, Result};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

use super::Item;

const OUTPUTS_PATH: &str = "/api/fleet/outputs";

/// Where agents ship data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Output {
    pub id: String,
    pub name: String,
    /// `elasticsearch`, `logstash`, `kafka` or `remote_elasticsearch`.
    #[serde(rename = "type")]
    pub kind: String,
    pub hosts: Vec<String>,
    pub is_default: bool,
    pub is_default_monitoring: bool,
    pub is_preconfigured: bool,
    pub ca_sha256: Option<String>,
    pub ca_trusted_fingerprint: Option<String>,
    pub config_yaml: Option<String>,
}

pub struct Outputs<'a> {
    client: &'a KibanaClient,
}

impl<'a> Outputs<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: &[RequestOption]) -> Result<ApiResponse<Page<Output>>> {
        let endpoint = Endpoint::get("fleet.list_outputs", OUTPUTS_PATH);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn get(&self, id: &str, options: &[RequestOption]) -> Result<ApiResponse<Output>> {
        require("id", id)?;
        let endpoint = Endpoint::get("fleet.get_output", OUTPUTS_PATH).param("id", id);
        let response: ApiResponse<Item<Output>> =
            self.client.send_json(endpoint, NO_BODY, options).await?;
        Ok(response.map(|wrapped| wrapped.item))
    }
}
