//
//  kibana-api
//  api/status.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Kibana server status (`GET /api/status`).

use serde::Deserialize;

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{ApiResponse, Result};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KibanaVersion {
    pub number: String,
    pub build_hash: String,
    pub build_number: u64,
    pub build_snapshot: bool,
    pub build_flavor: Option<String>,
    pub build_date: Option<String>,
}

/// `available`, `degraded`, `unavailable` or `critical`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusLevel {
    pub level: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverallStatus {
    pub overall: StatusLevel,
    pub core: Option<serde_json::Value>,
    pub plugins: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KibanaStatus {
    pub name: String,
    pub uuid: String,
    pub version: KibanaVersion,
    pub status: OverallStatus,
    pub metrics: Option<serde_json::Value>,
}

impl KibanaStatus {
    /// `true` when the overall level is `available`.
    pub fn is_available(&self) -> bool {
        self.status.overall.level == "available"
    }
}

pub struct Status<'a> {
    client: &'a KibanaClient,
}

impl<'a> Status<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, options: &[RequestOption]) -> Result<ApiResponse<KibanaStatus>> {
        let endpoint = Endpoint::get("status.get", "/api/status");
        self.client.send_json(endpoint, NO_BODY, options).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{client, MockTransport};

    #[tokio::test]
    async fn test_status_decodes_overall_level() {
        let transport = MockTransport::respond(
            200,
            r#"{"name":"kb-0","uuid":"5b2de169","version":{"number":"8.15.0","build_hash":"abc","build_number":76360,"build_snapshot":false},
                "status":{"overall":{"level":"degraded","summary":"1 service is degraded"}}}"#,
        );
        let status = client(&transport).status().get(&[]).await.unwrap().into_body();

        assert_eq!(status.version.number, "8.15.0");
        assert_eq!(status.status.overall.summary, "1 service is degraded");
        assert!(!status.is_available());
    }
}
