//
//  kibana-api
//  api/options.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Per-call request options.
//!
//! A [`RequestOption`] mutates the outgoing request right before it is
//! handed to the transport. Options run in order after the client's default
//! headers and credentials, so they can override either. The first option
//! that fails aborts the call without any network I/O.
//!
//! ```rust
//! use kibana_api::api::{with_header, with_opaque_id, RequestOption};
//!
//! let options: Vec<RequestOption> = vec![
//!     with_header("elastic-api-version", "2023-10-31"),
//!     with_opaque_id("nightly-sync"),
//! ];
//! assert_eq!(options.len(), 2);
//! ```

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Request;

use crate::api::common::{Error, Result};

/// A function applied to the outgoing request before dispatch.
pub type RequestOption = Box<dyn Fn(&mut Request) -> Result<()> + Send + Sync>;

/// Sets every header in `headers`, replacing existing values. Names with
/// several values keep all of them.
pub fn with_headers(headers: HeaderMap) -> RequestOption {
    Box::new(move |request| {
        let target = request.headers_mut();
        for name in headers.keys() {
            target.remove(name);
        }
        for (name, value) in &headers {
            target.append(name.clone(), value.clone());
        }
        Ok(())
    })
}

/// Sets a single header. Invalid names or values fail the call.
pub fn with_header(name: impl Into<String>, value: impl Into<String>) -> RequestOption {
    let name = name.into();
    let value = value.into();
    Box::new(move |request| {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Option(format!("invalid header name {name:?}: {e}")))?;
        let header_value = HeaderValue::from_str(&value)
            .map_err(|e| Error::Option(format!("invalid value for header {name:?}: {e}")))?;
        request.headers_mut().insert(header_name, header_value);
        Ok(())
    })
}

/// Tags the request with `X-Opaque-Id`, which Kibana forwards to
/// Elasticsearch for request tracing.
pub fn with_opaque_id(id: impl Into<String>) -> RequestOption {
    with_header("x-opaque-id", id)
}

/// Appends a query parameter.
pub fn with_query(key: impl Into<String>, value: impl Into<String>) -> RequestOption {
    let key = key.into();
    let value = value.into();
    Box::new(move |request| {
        request.url_mut().query_pairs_mut().append_pair(&key, &value);
        Ok(())
    })
}

/// Applies `options` in order, stopping at the first failure.
pub(crate) fn apply_options(request: &mut Request, options: &[RequestOption]) -> Result<()> {
    options.iter().try_for_each(|option| option(request))
}
