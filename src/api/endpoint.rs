//
//  kibana-api
//  api/endpoint.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Endpoint descriptors.
//!
//! An [`Endpoint`] names one REST operation: method, path template with
//! substituted parameters, query string and success rule. Path parameters
//! are stored as separate segments so IDs containing `/` or spaces are
//! percent-encoded rather than altering the path.

use reqwest::Method;
use url::Url;

use crate::api::common::{Error, Result, SuccessRule};

#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    pub(crate) name: &'static str,
    pub(crate) method: Method,
    segments: Vec<String>,
    path_parts: Vec<(&'static str, String)>,
    query: Vec<(&'static str, String)>,
    pub(crate) success: SuccessRule,
}

impl Endpoint {
    pub(crate) fn new(name: &'static str, method: Method, path: &str) -> Self {
        Self {
            name,
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            path_parts: Vec::new(),
            query: Vec::new(),
            success: SuccessRule::Exactly200,
        }
    }

    pub(crate) fn get(name: &'static str, path: &str) -> Self {
        Self::new(name, Method::GET, path)
    }

    pub(crate) fn post(name: &'static str, path: &str) -> Self {
        Self::new(name, Method::POST, path)
    }

    pub(crate) fn put(name: &'static str, path: &str) -> Self {
        Self::new(name, Method::PUT, path)
    }

    pub(crate) fn patch(name: &'static str, path: &str) -> Self {
        Self::new(name, Method::PATCH, path)
    }

    pub(crate) fn delete(name: &'static str, path: &str) -> Self {
        Self::new(name, Method::DELETE, path)
    }

    /// Appends a path parameter as one encoded segment.
    pub(crate) fn param(mut self, name: &'static str, value: &str) -> Self {
        self.segments.push(value.to_string());
        self.path_parts.push((name, value.to_string()));
        self
    }

    /// Appends a literal path segment after a parameter.
    pub(crate) fn then(mut self, segment: &str) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub(crate) fn query_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub(crate) fn query_all<V: ToString>(mut self, key: &'static str, values: &[V]) -> Self {
        for value in values {
            self.query.push((key, value.to_string()));
        }
        self
    }

    pub(crate) fn success(mut self, rule: SuccessRule) -> Self {
        self.success = rule;
        self
    }

    pub(crate) fn path_parts(&self) -> &[(&'static str, String)] {
        &self.path_parts
    }

    /// Resolves the endpoint against `base`, prefixing `/s/<space>` for any
    /// space other than `default`.
    pub(crate) fn url(&self, base: &Url, space: Option<&str>) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::Validation(format!("base URL {base} cannot carry a path")))?;
            segments.pop_if_empty();
            if let Some(space) = space.filter(|s| !s.is_empty() && *s != "default") {
                segments.push("s").push(space);
            }
            segments.extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}
