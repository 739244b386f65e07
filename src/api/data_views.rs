//
//  kibana-api
//  api/data_views.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Data views API (`/api/data_views`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{require, ApiResponse, Result, SuccessRule};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

const DATA_VIEW_PATH: &str = "/api/data_views/data_view";

/// A data view (formerly index pattern).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Index pattern, e.g. `logs-*`.
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_field_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_no_index: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_filters: Option<Vec<SourceFilter>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_field_map: Option<BTreeMap<String, serde_json::Value>>,

    #[serde(skip_serializing)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFilter {
    pub value: String,
}

/// Entry of the data view listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataViewSummary {
    pub id: String,
    pub title: String,
    pub name: Option<String>,
    pub namespaces: Vec<String>,
    pub type_meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateDataViewRequest {
    pub data_view: DataView,
    /// Replace an existing data view with the same `id` or `title`.
    pub override_existing: bool,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    data_view: &'a DataView,
    #[serde(rename = "override", skip_serializing_if = "std::ops::Not::not")]
    override_existing: bool,
}

#[derive(Deserialize)]
struct DataViewEnvelope {
    data_view: DataView,
}

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    data_view: Vec<DataViewSummary>,
}

pub struct DataViews<'a> {
    client: &'a KibanaClient,
}

impl<'a> DataViews<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: &[RequestOption]) -> Result<ApiResponse<Vec<DataViewSummary>>> {
        let endpoint = Endpoint::get("data_views.list", "/api/data_views");
        let response: ApiResponse<ListEnvelope> =
            self.client.send_json(endpoint, NO_BODY, options).await?;
        Ok(response.map(|envelope| envelope.data_view))
    }

    pub async fn get(&self, id: &str, options: &[RequestOption]) -> Result<ApiResponse<DataView>> {
        require("id", id)?;
        let endpoint = Endpoint::get("data_views.get", DATA_VIEW_PATH).param("id", id);
        let response: ApiResponse<DataViewEnvelope> =
            self.client.send_json(endpoint, NO_BODY, options).await?;
        Ok(response.map(|envelope| envelope.data_view))
    }

    pub async fn create(
        &self,
        request: &CreateDataViewRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<DataView>> {
        require("title", &request.data_view.title)?;
        let endpoint = Endpoint::post("data_views.create", DATA_VIEW_PATH);
        let body = CreateBody {
            data_view: &request.data_view,
            override_existing: request.override_existing,
        };
        let response: ApiResponse<DataViewEnvelope> =
            self.client.send_json(endpoint, Some(&body), options).await?;
        Ok(response.map(|envelope| envelope.data_view))
    }

    pub async fn delete(&self, id: &str, options: &[RequestOption]) -> Result<ApiResponse<()>> {
        require("id", id)?;
        let endpoint = Endpoint::delete("data_views.delete", DATA_VIEW_PATH)
            .param("id", id)
            .success(SuccessRule::Below299);
        self.client.send_empty(endpoint, NO_BODY, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client, MockTransport};
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_unwraps_envelope() {
        let transport = MockTransport::respond(
            200,
            r#"{"data_view":[{"id":"logs","title":"logs-*","name":"Logs","namespaces":["default"]}]}"#,
        );
        let views = client(&transport).data_views().list(&[]).await.unwrap().into_body();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name.as_deref(), Some("Logs"));
    }

    #[tokio::test]
    async fn test_create_wraps_body() {
        let transport = MockTransport::respond(
            200,
            r#"{"data_view":{"id":"abc","title":"metrics-*","timeFieldName":"@timestamp","version":"WzEsMV0="}}"#,
        );
        let request = CreateDataViewRequest {
            data_view: DataView {
                title: "metrics-*".into(),
                time_field_name: Some("@timestamp".into()),
                ..Default::default()
            },
            override_existing: true,
        };
        let view = client(&transport)
            .data_views()
            .create(&request, &[])
            .await
            .unwrap()
            .into_body();

        assert_eq!(view.id.as_deref(), Some("abc"));
        assert_eq!(view.version.as_deref(), Some("WzEsMV0="));
        assert_eq!(
            transport.last_request().json(),
            json!({
                "data_view": {"title": "metrics-*", "timeFieldName": "@timestamp"},
                "override": true
            })
        );
    }

    #[tokio::test]
    async fn test_delete_no_content() {
        let transport = MockTransport::respond(204, "");
        let response = client(&transport).data_views().delete("abc", &[]).await.unwrap();
        assert_eq!(response.status_code, StatusCode::NO_CONTENT);
        assert_eq!(
            transport.last_request().url.path(),
            "/api/data_views/data_view/abc"
        );
    }
}
