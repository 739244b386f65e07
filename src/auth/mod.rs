//
//  kibana-api
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials the client attaches to every Kibana request.
//!
//! ## Supported Authentication Methods
//!
//! - **API key**: Recommended. Sent as `Authorization: ApiKey <encoded>`,
//!   where `<encoded>` is the base64 of `id:api_key` as returned by the
//!   Elasticsearch create-API-key call.
//! - **Basic**: Username and password of a native or LDAP realm user.
//! - **Bearer**: A service account or OAuth access token.
//!
//! ## Example
//!
//! ```rust
//! use kibana_api::auth::Credential;
//!
//! let credential = Credential::api_key_pair("VuaCfGcBCdbkQm-e5aOx", "ui2lp2axTNmsyakw9tvNnw");
//! let header = credential.header_value().unwrap();
//! assert!(header.to_str().unwrap().starts_with("ApiKey "));
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::Request;

/// Credentials for authenticating against Kibana.
///
/// The `Debug` output never contains secrets.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Pre-encoded API key (the `encoded` field of a create-API-key response).
    ApiKey {
        /// The base64 `id:api_key` value.
        encoded: String,
    },
    /// HTTP Basic authentication.
    Basic {
        /// The username for authentication.
        username: String,
        /// The password for authentication.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The token string.
        token: String,
    },
}

impl Credential {
    /// API key from its pre-encoded form.
    pub fn api_key(encoded: impl Into<String>) -> Self {
        Self::ApiKey {
            encoded: encoded.into(),
        }
    }

    /// API key from its `id` and `api_key` halves.
    pub fn api_key_pair(id: &str, api_key: &str) -> Self {
        Self::ApiKey {
            encoded: STANDARD.encode(format!("{id}:{api_key}")),
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// The `Authorization` header value for this credential, marked sensitive.
    pub fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let raw = match self {
            Self::ApiKey { encoded } => format!("ApiKey {encoded}"),
            Self::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            }
            Self::Bearer { token } => format!("Bearer {token}"),
        };
        let mut value = HeaderValue::from_str(&raw)?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Sets the `Authorization` header on `request`.
    pub fn apply_to_request(&self, request: &mut Request) -> Result<(), InvalidHeaderValue> {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.header_value()?);
        Ok(())
    }

    /// Short name of the authentication scheme.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::ApiKey { .. } => "ApiKey",
            Self::Basic { .. } => "Basic",
            Self::Bearer { .. } => "Bearer",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            other => write!(f, "{}(<redacted>)", other.scheme()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_pair_encoding() {
        let credential = Credential::api_key_pair("id", "secret");
        assert_eq!(credential, Credential::api_key("aWQ6c2VjcmV0"));
        assert_eq!(credential.header_value().unwrap(), "ApiKey aWQ6c2VjcmV0");
    }

    #[test]
    fn test_basic_header() {
        let credential = Credential::basic("elastic", "changeme");
        assert_eq!(
            credential.header_value().unwrap(),
            "Basic ZWxhc3RpYzpjaGFuZ2VtZQ=="
        );
        assert!(credential.header_value().unwrap().is_sensitive());
    }

    #[test]
    fn test_bearer_applied_to_request() {
        let mut request = Request::new(
            reqwest::Method::GET,
            "http://localhost:5601/api/status".parse().unwrap(),
        );
        Credential::bearer("tok").apply_to_request(&mut request).unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", Credential::basic("elastic", "changeme"));
        assert!(debug.contains("elastic"));
        assert!(!debug.contains("changeme"));
        assert_eq!(format!("{:?}", Credential::bearer("tok")), "Bearer(<redacted>)");
    }
}
