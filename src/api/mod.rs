//
//  kibana-api
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module exposes the Kibana REST API as typed async calls.
//!
//! ## Architecture
//!
//! - [`client`]: [`KibanaClient`] and the dispatch template every endpoint shares
//! - [`transport`]: The pluggable [`Transport`] seam and the default reqwest implementation
//! - [`instrumentation`]: Optional per-call hooks, with a `tracing` implementation
//! - [`options`]: Per-call [`RequestOption`] mutators
//! - [`common`]: Errors, response wrappers, pagination and NDJSON handling
//!
//! Endpoint groups:
//!
//! - [`spaces`], [`connectors`], [`alerting`], [`detection_engine`],
//!   [`saved_objects`], [`fleet`], [`data_views`], [`status`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kibana_api::api::{with_opaque_id, KibanaClient};
//! use kibana_api::api::saved_objects::{ExportSavedObjectsRequest, ObjectRef};
//! use kibana_api::auth::Credential;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = KibanaClient::new("http://localhost:5601")?
//!     .with_auth(Credential::basic("elastic", "changeme"));
//!
//! let request = ExportSavedObjectsRequest {
//!     objects: vec![ObjectRef::new("dashboard", "ops-overview")],
//!     include_references_deep: Some(true),
//!     ..Default::default()
//! };
//! let export = client
//!     .saved_objects()
//!     .export(&request, &[with_opaque_id("nightly-backup")])
//!     .await?;
//! export.write_to_file("ops-overview.ndjson")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`Result`]. Non-success statuses come back as
//! [`Error::Status`] carrying the status code, headers and the decoded or
//! raw error body; transport failures pass through as [`Error::Transport`].

pub mod alerting;
pub mod client;
pub mod common;
pub mod connectors;
pub mod data_views;
pub mod detection_engine;
pub(crate) mod endpoint;
pub mod fleet;
pub mod instrumentation;
pub mod options;
pub mod saved_objects;
pub mod spaces;
pub mod status;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::KibanaClient;
pub use common::{ApiResponse, Error, ErrorPayload, ErrorResponse, NdjsonExport, Page, PageParams, Result};
pub use instrumentation::{Instrumentation, TracingInstrumentation};
pub use options::{with_header, with_headers, with_opaque_id, with_query, RequestOption};
pub use transport::{ReqwestTransport, Transport, TransportError};
