//
//  kibana-api
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Pluggable HTTP Transport
//!
//! Every endpoint call ends in a single [`Transport::perform`] invocation.
//! The default [`ReqwestTransport`] sends the request over the network; tests
//! and embedding applications can supply their own implementation.
//!
//! A transport may optionally expose [`Instrumentation`] hooks through
//! [`Transport::instrumentation`]. When it returns `None` the client skips
//! every tracing callback.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use thiserror::Error;

use crate::api::instrumentation::Instrumentation;

/// Failure reported by a [`Transport`] before any response was received.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP client failed (DNS, connection refused, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure from a custom transport implementation.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

/// Sends a fully built HTTP request and returns the raw response.
///
/// Implementations must not inspect the status code; classifying success
/// and failure is the client's job.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the HTTP exchange.
    async fn perform(&self, request: Request) -> Result<Response, TransportError>;

    /// Observability hooks supported by this transport, if any.
    fn instrumentation(&self) -> Option<&dyn Instrumentation> {
        None
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn perform(&self, request: Request) -> Result<Response, TransportError> {
        (**self).perform(request).await
    }

    fn instrumentation(&self) -> Option<&dyn Instrumentation> {
        (**self).instrumentation()
    }
}

/// The default transport, backed by a shared `reqwest::Client`.
///
/// # Example
///
/// ```rust,no_run
/// use kibana_api::api::{ReqwestTransport, TracingInstrumentation};
///
/// let transport = ReqwestTransport::new()?.with_instrumentation(TracingInstrumentation);
/// # Ok::<(), kibana_api::api::TransportError>(())
/// ```
pub struct ReqwestTransport {
    http: Client,
    instrumentation: Option<Arc<dyn Instrumentation>>,
}

impl ReqwestTransport {
    /// Creates a transport with the crate's user agent and no timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_settings(None, false)
    }

    /// Creates a transport with an optional request timeout.
    ///
    /// `accept_invalid_certs` disables TLS certificate verification, which is
    /// only meant for local clusters with self-signed certificates.
    pub fn with_settings(
        timeout: Option<Duration>,
        accept_invalid_certs: bool,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .danger_accept_invalid_certs(accept_invalid_certs);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::from_client(builder.build()?))
    }

    /// Wraps an existing `reqwest::Client`.
    pub fn from_client(http: Client) -> Self {
        Self {
            http,
            instrumentation: None,
        }
    }

    /// Attaches instrumentation hooks to this transport.
    pub fn with_instrumentation(mut self, instrumentation: impl Instrumentation + 'static) -> Self {
        self.instrumentation = Some(Arc::new(instrumentation));
        self
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: Request) -> Result<Response, TransportError> {
        Ok(self.http.execute(request).await?)
    }

    fn instrumentation(&self) -> Option<&dyn Instrumentation> {
        self.instrumentation.as_deref()
    }
}
