//
//  kibana-api
//  api/instrumentation.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Instrumentation
//!
//! Optional lifecycle callbacks invoked around every endpoint call when the
//! transport exposes them through
//! [`Transport::instrumentation`](crate::api::Transport::instrumentation).
//!
//! ## Call Lifecycle
//!
//! ```text
//! start ─► record_path_part* ─► before_request ─► record_request_body?
//!       ─► (transport) ─► after_request ─► record_error? ─► close
//! ```
//!
//! Hooks are side-effect only: they cannot alter the request or the result.
//! Every hook except [`Instrumentation::start`] has an empty default.

use reqwest::{Request, StatusCode};
use tracing::field::Empty;
use tracing::Span;

/// Observability hooks wrapped around each endpoint call.
pub trait Instrumentation: Send + Sync {
    /// Opens the span for one call to `endpoint` (e.g. `"spaces.get"`).
    fn start(&self, endpoint: &'static str) -> Span;

    /// Records a substituted path parameter.
    fn record_path_part(&self, _span: &Span, _name: &'static str, _value: &str) {}

    /// Called with the fully prepared request right before dispatch.
    fn before_request(&self, _span: &Span, _request: &Request, _endpoint: &'static str) {}

    /// Called with the encoded request body, when there is one.
    fn record_request_body(&self, _span: &Span, _endpoint: &'static str, _body: &[u8]) {}

    /// Called once the transport returned a response.
    fn after_request(&self, _span: &Span, _endpoint: &'static str, _status: StatusCode) {}

    /// Called for any failure after [`start`](Self::start).
    fn record_error(&self, _span: &Span, _error: &(dyn std::error::Error + 'static)) {}

    /// Closes the span. Always the last hook of a call.
    fn close(&self, _span: Span) {}
}

/// [`Instrumentation`] that reports each call as a `tracing` span.
///
/// The span is named `kibana.request` and carries the endpoint name, HTTP
/// method, URL path, status code and error message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInstrumentation;

impl Instrumentation for TracingInstrumentation {
    fn start(&self, endpoint: &'static str) -> Span {
        tracing::info_span!(
            "kibana.request",
            endpoint,
            http.method = Empty,
            url.path = Empty,
            http.status_code = Empty,
            error = Empty,
        )
    }

    fn before_request(&self, span: &Span, request: &Request, _endpoint: &'static str) {
        span.record("http.method", request.method().as_str());
        span.record("url.path", request.url().path());
    }

    fn record_request_body(&self, span: &Span, endpoint: &'static str, body: &[u8]) {
        span.in_scope(|| tracing::trace!(endpoint, bytes = body.len(), "request body encoded"));
    }

    fn after_request(&self, span: &Span, _endpoint: &'static str, status: StatusCode) {
        span.record("http.status_code", status.as_u16());
    }

    fn record_error(&self, span: &Span, error: &(dyn std::error::Error + 'static)) {
        span.record("error", tracing::field::display(error));
    }
}

/// Per-call instrumentation state.
///
/// Holds the span opened by [`Instrumentation::start`] and forwards hooks
/// only when the transport supplied an implementation.
pub(crate) struct CallScope<'a> {
    instrumentation: Option<&'a dyn Instrumentation>,
    endpoint: &'static str,
    span: Span,
}

impl<'a> CallScope<'a> {
    pub(crate) fn start(
        instrumentation: Option<&'a dyn Instrumentation>,
        endpoint: &'static str,
    ) -> Self {
        let span = instrumentation
            .map(|i| i.start(endpoint))
            .unwrap_or_else(Span::none);
        Self {
            instrumentation,
            endpoint,
            span,
        }
    }

    pub(crate) fn span(&self) -> &Span {
        &self.span
    }

    pub(crate) fn record_path_part(&self, name: &'static str, value: &str) {
        if let Some(i) = self.instrumentation {
            i.record_path_part(&self.span, name, value);
        }
    }

    pub(crate) fn before_request(&self, request: &Request) {
        if let Some(i) = self.instrumentation {
            i.before_request(&self.span, request, self.endpoint);
        }
    }

    pub(crate) fn record_request_body(&self, body: &[u8]) {
        if let Some(i) = self.instrumentation {
            i.record_request_body(&self.span, self.endpoint, body);
        }
    }

    pub(crate) fn after_request(&self, status: StatusCode) {
        if let Some(i) = self.instrumentation {
            i.after_request(&self.span, self.endpoint, status);
        }
    }

    /// Reports a failed result, then closes the span.
    pub(crate) fn finish<T>(self, result: crate::api::Result<T>) -> crate::api::Result<T> {
        if let Some(i) = self.instrumentation {
            if let Err(error) = &result {
                i.record_error(&self.span, error);
            }
            i.close(self.span);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_without_instrumentation_is_inert() {
        let scope = CallScope::start(None, "status.get");
        assert!(scope.span().is_none());
        scope.record_path_part("id", "x");
        scope.after_request(StatusCode::OK);
        let result: crate::api::Result<u8> = scope.finish(Ok(1));
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_tracing_instrumentation_records_error() {
        let instrumentation = TracingInstrumentation;
        let scope = CallScope::start(Some(&instrumentation), "spaces.get");
        let result: crate::api::Result<()> =
            scope.finish(Err(crate::api::Error::Validation("id is required".into())));
        assert!(result.is_err());
    }
}
