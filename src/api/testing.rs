//
//  kibana-api
//  api/testing.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Recording transport used by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, Request, Response};
use url::Url;

use crate::api::instrumentation::Instrumentation;
use crate::api::transport::{Transport, TransportError};
use crate::api::KibanaClient;

#[derive(Debug, Clone)]
pub(crate) struct CapturedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(self.body.as_deref().unwrap_or(b"null")).unwrap()
    }

    pub fn query(&self) -> Vec<(String, String)> {
        self.url.query_pairs().into_owned().collect()
    }
}

enum Canned {
    Reply(u16, String),
    Fail(String),
}

#[derive(Default)]
struct State {
    replies: VecDeque<Canned>,
    requests: Vec<CapturedRequest>,
}

#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<State>>,
    instrumentation: Option<Arc<dyn Instrumentation>>,
}

impl MockTransport {
    /// Answers the next call with `status` and `body`.
    pub fn respond(status: u16, body: &str) -> Self {
        Self::default().then_respond(status, body)
    }

    /// Fails the next call at the transport level.
    pub fn failing(message: &str) -> Self {
        let transport = Self::default();
        transport
            .state
            .lock()
            .unwrap()
            .replies
            .push_back(Canned::Fail(message.to_string()));
        transport
    }

    pub fn then_respond(self, status: u16, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .push_back(Canned::Reply(status, body.to_string()));
        self
    }

    pub fn with_instrumentation(mut self, instrumentation: Arc<dyn Instrumentation>) -> Self {
        self.instrumentation = Some(instrumentation);
        self
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.state
            .lock()
            .unwrap()
            .requests
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn perform(&self, request: Request) -> Result<Response, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(CapturedRequest {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec),
        });

        match state.replies.pop_front().expect("no canned reply left") {
            Canned::Reply(status, body) => {
                let response = http::Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap();
                Ok(Response::from(response))
            }
            Canned::Fail(message) => Err(TransportError::Custom(message.into())),
        }
    }

    fn instrumentation(&self) -> Option<&dyn Instrumentation> {
        self.instrumentation.as_deref()
    }
}

/// A client pointed at `http://localhost:5601` that sends through `transport`.
pub(crate) fn client(transport: &MockTransport) -> KibanaClient {
    KibanaClient::with_transport("http://localhost:5601", transport.clone()).unwrap()
}
