//
//  kibana-api
//  api/saved_objects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Saved objects API (`/api/saved_objects`).
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | [`SavedObjects::export`] | POST | `/api/saved_objects/_export` |
//! | [`SavedObjects::export_stream`] | POST | `/api/saved_objects/_export` |
//! | [`SavedObjects::find`] | GET | `/api/saved_objects/_find` |
//! | [`SavedObjects::get`] | GET | `/api/saved_objects/{type}/{id}` |
//! | [`SavedObjects::delete`] | DELETE | `/api/saved_objects/{type}/{id}` |

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{require, ApiResponse, Error, NdjsonExport, Page, PageParams, Result};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

const SAVED_OBJECTS_PATH: &str = "/api/saved_objects";

/// A reference from one saved object to another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedObjectReference {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A saved object envelope. `attributes` depend on the object type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SavedObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
    #[serde(default)]
    pub references: Vec<SavedObjectReference>,
    #[serde(default)]
    pub namespaces: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, rename = "coreMigrationVersion")]
    pub core_migration_version: Option<String>,
    #[serde(default)]
    pub managed: Option<bool>,
}

impl SavedObject {
    /// Decodes `attributes` into a typed struct.
    pub fn attributes_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.attributes.clone())
    }
}

/// An object selected for export by type and ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ObjectRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Export selection. Either `types` or `objects` must be non-empty.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSavedObjectsRequest {
    /// Export every object of these types.
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    /// Export exactly these objects.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ObjectRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_references_deep: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_export_details: Option<bool>,

    /// KQL search applied when exporting by type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ExportSavedObjectsRequest {
    fn validate(&self) -> Result<()> {
        if self.types.is_empty() && self.objects.is_empty() {
            return Err(Error::Validation("type or objects is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindSavedObjectsRequest {
    /// Object types to search. At least one is required.
    pub types: Vec<String>,
    pub search: Option<String>,
    pub search_fields: Vec<String>,
    pub fields: Vec<String>,
    pub page: PageParams,
    pub sort_field: Option<String>,
    pub has_reference: Option<String>,
    /// KQL filter over attributes, e.g. `dashboard.attributes.title:ops`.
    pub filter: Option<String>,
    pub namespaces: Vec<String>,
}

/// Selects one saved object.
#[derive(Debug, Clone, Default)]
pub struct SavedObjectRequest {
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteSavedObjectRequest {
    pub kind: String,
    pub id: String,
    /// Deletes objects shared to several spaces.
    pub force: Option<bool>,
}

pub struct SavedObjects<'a> {
    client: &'a KibanaClient,
}

impl<'a> SavedObjects<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    /// Exports objects as NDJSON, read fully into memory.
    pub async fn export(
        &self,
        request: &ExportSavedObjectsRequest,
        options: &[RequestOption],
    ) -> Result<NdjsonExport> {
        request.validate()?;
        self.client
            .send_ndjson(export_endpoint(), Some(request), options)
            .await
    }

    /// Exports objects and hands back the open response so large exports can
    /// be streamed with [`Response::chunk`] or [`Response::bytes_stream`].
    pub async fn export_stream(
        &self,
        request: &ExportSavedObjectsRequest,
        options: &[RequestOption],
    ) -> Result<Response> {
        request.validate()?;
        self.client
            .send_raw(export_endpoint(), Some(request), options)
            .await
    }

    pub async fn find(
        &self,
        request: &FindSavedObjectsRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Page<SavedObject>>> {
        if request.types.is_empty() {
            return Err(Error::Validation("type is required".to_string()));
        }
        let endpoint = Endpoint::get("saved_objects.find", "/api/saved_objects/_find")
            .query_all("type", &request.types)
            .query_opt("search", request.search.as_deref())
            .query_all("search_fields", &request.search_fields)
            .query_all("fields", &request.fields)
            .query_opt("page", request.page.page)
            .query_opt("per_page", request.page.per_page)
            .query_opt("sort_field", request.sort_field.as_deref())
            .query_opt("has_reference", request.has_reference.as_deref())
            .query_opt("filter", request.filter.as_deref())
            .query_all("namespaces", &request.namespaces);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn get(
        &self,
        request: &SavedObjectRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<SavedObject>> {
        require("type", &request.kind)?;
        require("id", &request.id)?;
        let endpoint = Endpoint::get("saved_objects.get", SAVED_OBJECTS_PATH)
            .param("type", &request.kind)
            .param("id", &request.id);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn delete(
        &self,
        request: &DeleteSavedObjectRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<()>> {
        require("type", &request.kind)?;
        require("id", &request.id)?;
        let endpoint = Endpoint::delete("saved_objects.delete", SAVED_OBJECTS_PATH)
            .param("type", &request.kind)
            .param("id", &request.id)
            .query_opt("force", request.force);
        self.client.send_empty(endpoint, NO_BODY, options).await
    }
}

fn export_endpoint() -> Endpoint {
    Endpoint::post("saved_objects.export", "/api/saved_objects/_export")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client, MockTransport};
    use serde_json::json;

    const EXPORT: &str = concat!(
        r#"{"id":"logs","type":"index-pattern","attributes":{"title":"logs-*"},"references":[]}"#,
        "\n",
        r#"{"id":"ops","type":"dashboard","attributes":{"title":"Ops"},"references":[{"id":"logs","name":"panel_0","type":"index-pattern"}]}"#,
        "\n",
        r#"{"excludedObjects":[],"excludedObjectsCount":0,"exportedCount":2,"missingRefCount":0,"missingReferences":[]}"#,
        "\n"
    );

    #[derive(Debug, Deserialize)]
    struct Titled {
        title: String,
    }

    #[tokio::test]
    async fn test_export_by_objects() {
        let transport = MockTransport::respond(200, EXPORT);
        let request = ExportSavedObjectsRequest {
            objects: vec![ObjectRef::new("dashboard", "ops")],
            include_references_deep: Some(true),
            ..Default::default()
        };
        let export = client(&transport)
            .saved_objects()
            .export(&request, &[])
            .await
            .unwrap();

        let objects: Vec<SavedObject> = export.decode().unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1].references[0].kind, "index-pattern");
        assert_eq!(objects[0].attributes_as::<Titled>().unwrap().title, "logs-*");
        assert_eq!(export.details().unwrap().exported_count, 2);

        assert_eq!(
            transport.last_request().json(),
            json!({
                "objects": [{"type": "dashboard", "id": "ops"}],
                "includeReferencesDeep": true
            })
        );
    }

    #[tokio::test]
    async fn test_export_requires_selection() {
        let transport = MockTransport::respond(200, EXPORT);
        let err = client(&transport)
            .saved_objects()
            .export(&ExportSavedObjectsRequest::default(), &[])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid request: type or objects is required");
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_export_stream_leaves_body_to_caller() {
        let transport = MockTransport::respond(200, EXPORT);
        let request = ExportSavedObjectsRequest {
            types: vec!["dashboard".into()],
            ..Default::default()
        };
        let response = client(&transport)
            .saved_objects()
            .export_stream(&request, &[])
            .await
            .unwrap();

        let body = response.bytes().await.unwrap();
        assert_eq!(&body[..], EXPORT.as_bytes());
        assert_eq!(transport.last_request().json(), json!({"type": ["dashboard"]}));
    }

    #[tokio::test]
    async fn test_find_repeats_type() {
        let transport = MockTransport::respond(
            200,
            r#"{"page":1,"per_page":20,"total":1,"saved_objects":[{"id":"ops","type":"dashboard","attributes":{"title":"Ops"}}]}"#,
        );
        let request = FindSavedObjectsRequest {
            types: vec!["dashboard".into(), "visualization".into()],
            search: Some("Ops*".into()),
            search_fields: vec!["title".into()],
            ..Default::default()
        };
        let page = client(&transport)
            .saved_objects()
            .find(&request, &[])
            .await
            .unwrap()
            .into_body();

        assert_eq!(page.items[0].id, "ops");
        assert!(!page.has_next());
        assert_eq!(
            transport.last_request().url.query(),
            Some("type=dashboard&type=visualization&search=Ops*&search_fields=title")
        );
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let transport = MockTransport::respond(
            404,
            r#"{"statusCode":404,"error":"Not Found","message":"Saved object [dashboard/nope] not found"}"#,
        );
        let err = client(&transport)
            .saved_objects()
            .get(
                &SavedObjectRequest {
                    kind: "dashboard".into(),
                    id: "nope".into(),
                },
                &[],
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            transport.last_request().url.path(),
            "/api/saved_objects/dashboard/nope"
        );
    }
}
