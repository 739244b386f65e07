//
//  kibana-api
//  api/fleet/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Fleet API
//!
//! Fleet manages Elastic Agents, the policies they run and the outputs they
//! ship data to.
//!
//! ## Module Organization
//!
//! - [`agent_policies`] - Agent policy CRUD
//! - [`agents`] - Enrolled agents and agent actions
//! - [`outputs`] - Output destinations
//!
//! ## Differences from Other Kibana APIs
//!
//! - Query parameters are camelCase (`perPage`, `showInactive`)
//! - Single objects come wrapped as `{"item": {...}}`
//! - Lists come as `{"items": [...], "page", "perPage", "total"}`
//!
//! ## Example
//!
//! ```rust,no_run
//! use kibana_api::api::fleet::agents::ListAgentsRequest;
//! use kibana_api::KibanaClient;
//!
//! # async fn example() -> kibana_api::Result<()> {
//! let client = KibanaClient::new("http://localhost:5601")?;
//! let request = ListAgentsRequest {
//!     kuery: Some("status:online".to_string()),
//!     ..Default::default()
//! };
//! let page = client.fleet().agents().list(&request, &[]).await?.into_body();
//! for agent in page.items {
//!     println!("{} {}", agent.id, agent.status.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent_policies;
pub mod agents;
pub mod outputs;

use serde::{Deserialize, Serialize};

use crate::api::client::KibanaClient;

pub use agent_policies::{AgentPolicies, AgentPolicy};
pub use agents::{Agent, AgentAction, Agents};
pub use outputs::{Output, Outputs};

/// Fleet wraps single objects in `{"item": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<T> {
    pub item: T,
}

/// Entry point to the Fleet endpoint groups.
pub struct Fleet<'a> {
    client: &'a KibanaClient,
}

impl<'a> Fleet<'a> {
    pub(crate) fn new(client: &'a KibanaClient) -> Self {
        Self { client }
    }

    pub fn agent_policies(&self) -> AgentPolicies<'a> {
        AgentPolicies::new(self.client)
    }

    pub fn agents(&self) -> Agents<'a> {
        Agents::new(self.client)
    }

    pub fn outputs(&self) -> Outputs<'a> {
        Outputs::new(self.client)
    }
}
