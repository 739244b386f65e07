//
//  kibana-api
//  api/spaces.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Kibana spaces API.
//!
//! Spaces partition saved objects, rules and connectors. Every Kibana
//! deployment has a reserved `default` space.
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | [`Spaces::get`] | GET | `/api/spaces/space/{id}` |
//! | [`Spaces::list`] | GET | `/api/spaces/space` |
//! | [`Spaces::create`] | POST | `/api/spaces/space` |
//! | [`Spaces::update`] | PUT | `/api/spaces/space/{id}` |
//! | [`Spaces::delete`] | DELETE | `/api/spaces/space/{id}` |

use serde::{Deserialize, Serialize};

use crate::api::client::{KibanaClient, NO_BODY};
use crate::api::common::{require, ApiResponse, Result, SuccessRule};
use crate::api::endpoint::Endpoint;
use crate::api::options::RequestOption;

const SPACES_PATH: &str = "/api/spaces/space";

/// A Kibana space.
///
/// Every field defaults when absent so partial responses still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Space {
    /// URL-safe identifier, used in `/s/{id}` paths.
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hex color of the space avatar (e.g. `#aabbcc`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// One or two characters shown in the avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,

    /// Data URL of a custom avatar image.
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Feature IDs hidden in this space.
    #[serde(rename = "disabledFeatures")]
    pub disabled_features: Vec<String>,

    /// Solution view (`es`, `oblt`, `security`, `classic`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,

    /// Set by Kibana on the `default` space; never sent.
    #[serde(rename = "_reserved", skip_serializing)]
    pub reserved: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct GetSpaceRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListSpacesRequest {
    /// `any`, `copySavedObjectsIntoSpace` or `shareSavedObjectsIntoSpace`.
    pub purpose: Option<String>,
    pub include_authorized_purposes: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteSpaceRequest {
    pub id: String,
}

/// Spaces endpoints, borrowed from a [`KibanaClient`].
pub struct Spaces<'a> {
    client: &'a KibanaClient,
}

impl<'a> Spaces<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub async fn get(
        &self,
        request: &GetSpaceRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Space>> {
        require("id", &request.id)?;
        let endpoint = Endpoint::get("spaces.get", SPACES_PATH).param("id", &request.id);
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    pub async fn list(
        &self,
        request: &ListSpacesRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<Vec<Space>>> {
        let endpoint = Endpoint::get("spaces.list", SPACES_PATH)
            .query_opt("purpose", request.purpose.as_deref())
            .query_opt(
                "include_authorized_purposes",
                request.include_authorized_purposes,
            );
        self.client.send_json(endpoint, NO_BODY, options).await
    }

    /// Creates a space. `id` and `name` are required.
    pub async fn create(&self, space: &Space, options: &[RequestOption]) -> Result<ApiResponse<Space>> {
        require("id", &space.id)?;
        require("name", &space.name)?;
        let endpoint = Endpoint::post("spaces.create", SPACES_PATH);
        self.client.send_json(endpoint, Some(space), options).await
    }

    /// Replaces the space identified by `space.id`.
    pub async fn update(&self, space: &Space, options: &[RequestOption]) -> Result<ApiResponse<Space>> {
        require("id", &space.id)?;
        require("name", &space.name)?;
        let endpoint = Endpoint::put("spaces.update", SPACES_PATH).param("id", &space.id);
        self.client.send_json(endpoint, Some(space), options).await
    }

    /// Deletes a space and every saved object in it. Kibana answers `204`.
    pub async fn delete(
        &self,
        request: &DeleteSpaceRequest,
        options: &[RequestOption],
    ) -> Result<ApiResponse<()>> {
        require("id", &request.id)?;
        let endpoint = Endpoint::delete("spaces.delete", SPACES_PATH)
            .param("id", &request.id)
            .success(SuccessRule::Below299);
        self.client.send_empty(endpoint, NO_BODY, options).await
    }
}
