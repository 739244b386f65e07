//
//  kibana-api
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Kibana API
//!
//! This module provides [`KibanaClient`], the handle every endpoint group
//! borrows, and the single dispatch template all endpoints share.
//!
//! ## Dispatch Sequence
//!
//! 1. Required fields are validated by the endpoint before anything else
//! 2. An instrumentation span is opened if the transport offers one
//! 3. The URL is built from the base URL, optional space and path template
//! 4. The body is encoded as JSON
//! 5. Default headers, credentials and request options are applied in order
//! 6. The transport performs the call
//! 7. The status is checked against the endpoint's [`SuccessRule`]; success
//!    bodies are decoded, failures become [`Error::Status`]
//!
//! Nothing is retried. Cancellation is dropping the returned future.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, Instrument};
use url::Url;

use crate::api::alerting::AlertingRules;
use crate::api::common::{ApiResponse, Error, ErrorResponse, NdjsonExport, Result};
use crate::api::connectors::Connectors;
use crate::api::data_views::DataViews;
use crate::api::detection_engine::DetectionEngine;
use crate::api::endpoint::Endpoint;
use crate::api::fleet::Fleet;
use crate::api::instrumentation::{CallScope, TracingInstrumentation};
use crate::api::options::{apply_options, RequestOption};
use crate::api::saved_objects::SavedObjects;
use crate::api::spaces::Spaces;
use crate::api::status::Status;
use crate::api::transport::{ReqwestTransport, Transport};
use crate::auth::Credential;
use crate::config::Config;

/// Header Kibana requires on every state-changing request.
pub const XSRF_HEADER: &str = "kbn-xsrf";

/// Placeholder body for endpoints that send none.
pub(crate) const NO_BODY: Option<&()> = None;

/// The main client for the Kibana REST API.
///
/// The client is cheap to clone and holds no mutable state; concurrent calls
/// share nothing but the transport.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use kibana_api::auth::Credential;
/// use kibana_api::KibanaClient;
///
/// let client = KibanaClient::new("https://kibana.example.com:5601")?
///     .with_auth(Credential::api_key("bXktaWQ6bXkta2V5"))
///     .with_space("security");
/// # Ok::<(), kibana_api::Error>(())
/// ```
///
/// # Endpoint Groups
///
/// | Accessor | API |
/// |----------|-----|
/// | [`spaces`](Self::spaces) | `/api/spaces` |
/// | [`connectors`](Self::connectors) | `/api/actions` |
/// | [`alerting`](Self::alerting) | `/api/alerting` |
/// | [`detection_engine`](Self::detection_engine) | `/api/detection_engine` |
/// | [`saved_objects`](Self::saved_objects) | `/api/saved_objects` |
/// | [`fleet`](Self::fleet) | `/api/fleet` |
/// | [`data_views`](Self::data_views) | `/api/data_views` |
/// | [`status`](Self::status) | `/api/status` |
#[derive(Clone)]
pub struct KibanaClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    space: Option<String>,
    credential: Option<Credential>,
    default_headers: HeaderMap,
}

impl KibanaClient {
    /// Creates a client for `base_url` using the default [`ReqwestTransport`].
    ///
    /// `base_url` may include a base path (e.g. `https://host/kibana`).
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_transport(base_url, ReqwestTransport::new()?)
    }

    /// Creates a client that sends every request through `transport`.
    pub fn with_transport(base_url: &str, transport: impl Transport + 'static) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Validation(format!(
                "{base_url} is not a valid Kibana base URL"
            )));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            HeaderName::from_static(XSRF_HEADER),
            HeaderValue::from_static("true"),
        );
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            transport: Arc::new(transport),
            base_url,
            space: None,
            credential: None,
            default_headers,
        })
    }

    /// Builds a client from a loaded [`Config`].
    ///
    /// The transport carries [`TracingInstrumentation`], the configured
    /// timeout and TLS setting. Credentials, space and extra headers are
    /// taken from the configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::with_settings(
            config.kibana.timeout_secs.map(Duration::from_secs),
            config.kibana.insecure,
        )
        .context("Failed to build HTTP client")?
        .with_instrumentation(TracingInstrumentation);

        let mut client = Self::with_transport(&config.kibana.url, transport)
            .with_context(|| format!("Invalid Kibana URL {:?}", config.kibana.url))?;

        if let Some(credential) = config.credential() {
            client = client.with_auth(credential);
        }
        if let Some(space) = &config.kibana.space {
            client = client.with_space(space.clone());
        }
        for (name, value) in &config.kibana.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name {name:?} in config"))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {name} in config"))?;
            client = client.with_default_header(name, value);
        }
        Ok(client)
    }

    /// Sets the credentials attached to every request.
    pub fn with_auth(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Scopes every request to a Kibana space (`/s/<space>/api/...`).
    ///
    /// The `default` space needs no prefix and is sent unprefixed.
    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    /// Adds a header sent with every request. Request options can still
    /// override it per call.
    pub fn with_default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The space requests are scoped to, if any.
    pub fn space(&self) -> Option<&str> {
        self.space.as_deref()
    }

    pub fn spaces(&self) -> Spaces<'_> {
        Spaces::new(self)
    }

    pub fn connectors(&self) -> Connectors<'_> {
        Connectors::new(self)
    }

    pub fn alerting(&self) -> AlertingRules<'_> {
        AlertingRules::new(self)
    }

    pub fn detection_engine(&self) -> DetectionEngine<'_> {
        DetectionEngine::new(self)
    }

    pub fn saved_objects(&self) -> SavedObjects<'_> {
        SavedObjects::new(self)
    }

    pub fn fleet(&self) -> Fleet<'_> {
        Fleet::new(self)
    }

    pub fn data_views(&self) -> DataViews<'_> {
        DataViews::new(self)
    }

    pub fn status(&self) -> Status<'_> {
        Status::new(self)
    }

    /// Sends a request and decodes a JSON success body into `T`.
    pub(crate) async fn send_json<B, T>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
        options: &[RequestOption],
    ) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let scope = CallScope::start(self.transport.instrumentation(), endpoint.name);
        let result = async {
            let response = self.perform(&endpoint, body, options, &scope).await?;
            let (status_code, headers, bytes) = read_body(response).await?;
            let body = serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
                status: status_code,
                body: bytes.clone(),
                source,
            })?;
            Ok(ApiResponse {
                status_code,
                headers,
                body,
            })
        }
        .await;
        scope.finish(result)
    }

    /// Sends a request whose success body carries nothing of interest.
    pub(crate) async fn send_empty<B>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
        options: &[RequestOption],
    ) -> Result<ApiResponse<()>>
    where
        B: Serialize + ?Sized,
    {
        let scope = CallScope::start(self.transport.instrumentation(), endpoint.name);
        let result = async {
            let response = self.perform(&endpoint, body, options, &scope).await?;
            let (status_code, headers, _) = read_body(response).await?;
            Ok(ApiResponse {
                status_code,
                headers,
                body: (),
            })
        }
        .await;
        scope.finish(result)
    }

    /// Sends a request whose success body is NDJSON.
    pub(crate) async fn send_ndjson<B>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
        options: &[RequestOption],
    ) -> Result<NdjsonExport>
    where
        B: Serialize + ?Sized,
    {
        let scope = CallScope::start(self.transport.instrumentation(), endpoint.name);
        let result = async {
            let response = self.perform(&endpoint, body, options, &scope).await?;
            let (status_code, headers, bytes) = read_body(response).await?;
            NdjsonExport::from_body(status_code, headers, &bytes).map_err(|source| Error::Decode {
                status: status_code,
                body: bytes.clone(),
                source,
            })
        }
        .await;
        scope.finish(result)
    }

    /// Sends a request and hands back the open response after the status
    /// check. The caller owns and must drain or drop the body stream.
    pub(crate) async fn send_raw<B>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
        options: &[RequestOption],
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let scope = CallScope::start(self.transport.instrumentation(), endpoint.name);
        let result = self.perform(&endpoint, body, options, &scope).await;
        scope.finish(result)
    }

    async fn perform<B>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
        options: &[RequestOption],
        scope: &CallScope<'_>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        for (name, value) in endpoint.path_parts() {
            scope.record_path_part(*name, value);
        }
        let url = endpoint.url(&self.base_url, self.space.as_deref())?;

        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(Error::Serialize)?;

        let mut request = Request::new(endpoint.method.clone(), url);
        self.prepare(&mut request, payload.is_some())?;
        if let Some(payload) = payload {
            *request.body_mut() = Some(payload.into());
        }
        apply_options(&mut request, options)?;

        scope.before_request(&request);
        if let Some(bytes) = request.body().and_then(|b| b.as_bytes()) {
            scope.record_request_body(bytes);
        }

        debug!(
            endpoint = endpoint.name,
            method = %request.method(),
            url = %request.url(),
            "Sending Kibana API request"
        );
        let response = self
            .transport
            .perform(request)
            .instrument(scope.span().clone())
            .await?;

        let status = response.status();
        scope.after_request(status);
        if endpoint.success.accepts(status) {
            return Ok(response);
        }

        let (status, headers, bytes) = read_body(response).await?;
        debug!(
            endpoint = endpoint.name,
            status = status.as_u16(),
            "Kibana API returned a non-success status"
        );
        Err(Error::Status(ErrorResponse::new(status, headers, &bytes)))
    }

    fn prepare(&self, request: &mut Request, has_body: bool) -> Result<()> {
        let headers = request.headers_mut();
        for (name, value) in &self.default_headers {
            headers.insert(name.clone(), value.clone());
        }
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(credential) = &self.credential {
            credential
                .apply_to_request(request)
                .map_err(|e| Error::Validation(format!("invalid credential: {e}")))?;
        }
        Ok(())
    }
}

async fn read_body(response: Response) -> Result<(reqwest::StatusCode, HeaderMap, bytes::Bytes)> {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| Error::BodyRead { status, source })?;
    Ok((status, headers, bytes))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use reqwest::StatusCode;

    use super::*;
    use crate::api::common::ErrorPayload;
    use crate::api::instrumentation::Instrumentation;
    use crate::api::options::{with_header, with_headers};
    use crate::api::spaces::{GetSpaceRequest, Space};
    use crate::api::testing::{client, MockTransport};
    use crate::api::transport::TransportError;
    use tracing::Span;

    fn get_default() -> GetSpaceRequest {
        GetSpaceRequest {
            id: "default".to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_decodes_body() {
        let transport = MockTransport::respond(200, "{}");
        let response = client(&transport)
            .spaces()
            .get(&get_default(), &[])
            .await
            .unwrap();

        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(response.body, Space::default());

        let request = transport.last_request();
        assert_eq!(request.method, reqwest::Method::GET);
        assert_eq!(request.url.path(), "/api/spaces/space/default");
        assert_eq!(request.headers[XSRF_HEADER], "true");
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_missing_required_field_skips_transport() {
        let transport = MockTransport::respond(200, "{}");
        let err = client(&transport)
            .spaces()
            .get(&GetSpaceRequest { id: String::new() }, &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_success_json_body() {
        let body = r#"{"statusCode":404,"error":"Not Found","message":"Saved object [space/nope] not found"}"#;
        let transport = MockTransport::respond(404, body);
        let err = client(&transport)
            .spaces()
            .get(&get_default(), &[])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("HTTP Status Code 404"));
        assert!(err.is_not_found());
        match err {
            Error::Status(response) => {
                assert_eq!(
                    response.error,
                    ErrorPayload::Json(serde_json::from_str(body).unwrap())
                );
                assert_eq!(
                    response.error.message(),
                    Some("Saved object [space/nope] not found")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_text_body() {
        let transport = MockTransport::respond(404, "Not Found");
        let err = client(&transport)
            .spaces()
            .get(&get_default(), &[])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Not Found"));
        match err {
            Error::Status(response) => {
                assert_eq!(response.error, ErrorPayload::Text("Not Found".to_string()));
                assert_eq!(response.status_code, StatusCode::NOT_FOUND);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let transport = MockTransport::failing("connection refused");
        let err = client(&transport)
            .spaces()
            .get(&get_default(), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(TransportError::Custom(_))));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_decode_error_keeps_status() {
        let transport = MockTransport::respond(200, "<html>proxy</html>");
        let err = client(&transport)
            .spaces()
            .get(&get_default(), &[])
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(StatusCode::OK));
        match err {
            Error::Decode { body, .. } => assert_eq!(&body[..], b"<html>proxy</html>"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unserializable_body_fails_before_dispatch() {
        use std::collections::HashMap;

        let instrumentation = Arc::new(RecordingInstrumentation::default());
        let transport = MockTransport::respond(200, "{}")
            .with_instrumentation(instrumentation.clone());
        let body: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);

        let err = client(&transport)
            .send_json::<_, serde_json::Value>(
                Endpoint::post("test.unserializable", "/api/test"),
                Some(&body),
                &[],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Serialize(_)));
        assert_eq!(transport.calls(), 0);
        let events = instrumentation.events.lock().unwrap().clone();
        assert_eq!(events.first().map(String::as_str), Some("start:test.unserializable"));
        assert_eq!(events[events.len() - 2..], ["error", "close"]);
    }

    #[tokio::test]
    async fn test_request_options_are_applied() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-source", HeaderValue::from_static("nightly-job"));
        let transport = MockTransport::respond(200, "{}");

        client(&transport)
            .spaces()
            .get(&get_default(), &[with_headers(headers)])
            .await
            .unwrap();

        assert_eq!(
            transport.last_request().headers["x-request-source"],
            "nightly-job"
        );
    }

    #[tokio::test]
    async fn test_failing_option_aborts_dispatch() {
        let transport = MockTransport::respond(200, "{}");
        let err = client(&transport)
            .spaces()
            .get(&get_default(), &[with_header("bad\nname", "x")])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Option(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_credentials_and_space_prefix() {
        let transport = MockTransport::respond(200, "{}");
        client(&transport)
            .with_auth(Credential::bearer("tok"))
            .with_space("marketing")
            .spaces()
            .get(&get_default(), &[])
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.headers["authorization"], "Bearer tok");
        assert_eq!(request.url.path(), "/s/marketing/api/spaces/space/default");
    }

    #[derive(Default)]
    struct RecordingInstrumentation {
        events: Mutex<Vec<String>>,
    }

    impl RecordingInstrumentation {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl Instrumentation for RecordingInstrumentation {
        fn start(&self, endpoint: &'static str) -> Span {
            self.push(format!("start:{endpoint}"));
            Span::none()
        }

        fn record_path_part(&self, _span: &Span, name: &'static str, value: &str) {
            self.push(format!("path:{name}={value}"));
        }

        fn before_request(&self, _span: &Span, request: &Request, _endpoint: &'static str) {
            self.push(format!("before:{}", request.method()));
        }

        fn record_request_body(&self, _span: &Span, _endpoint: &'static str, body: &[u8]) {
            self.push(format!("body:{}", body.len()));
        }

        fn after_request(&self, _span: &Span, _endpoint: &'static str, status: StatusCode) {
            self.push(format!("after:{}", status.as_u16()));
        }

        fn record_error(&self, _span: &Span, _error: &(dyn std::error::Error + 'static)) {
            self.push("error".to_string());
        }

        fn close(&self, _span: Span) {
            self.push("close".to_string());
        }
    }

    #[tokio::test]
    async fn test_instrumentation_lifecycle() {
        let instrumentation = Arc::new(RecordingInstrumentation::default());
        let transport = MockTransport::respond(200, r#"{"id":"ops","name":"Ops"}"#)
            .with_instrumentation(instrumentation.clone());

        let space = Space {
            id: "ops".to_string(),
            name: "Ops".to_string(),
            ..Default::default()
        };
        client(&transport)
            .spaces()
            .update(&space, &[])
            .await
            .unwrap();

        let events = instrumentation.events.lock().unwrap().clone();
        let expected_body = serde_json::to_vec(&space).unwrap().len();
        assert_eq!(
            events,
            vec![
                "start:spaces.update".to_string(),
                "path:id=ops".to_string(),
                "before:PUT".to_string(),
                format!("body:{expected_body}"),
                "after:200".to_string(),
                "close".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_instrumentation_records_status_errors() {
        let instrumentation = Arc::new(RecordingInstrumentation::default());
        let transport =
            MockTransport::respond(500, "boom").with_instrumentation(instrumentation.clone());

        let _ = client(&transport).spaces().get(&get_default(), &[]).await;

        let events = instrumentation.events.lock().unwrap().clone();
        assert_eq!(events[events.len() - 2..], ["error", "close"]);
    }
}
