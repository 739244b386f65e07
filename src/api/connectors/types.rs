//
//  kibana-api
//  api/connectors/types.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Per-type connector configuration and secrets.
//!
//! Kibana validates `config` and `secrets` against a schema chosen by
//! `connector_type_id`. [`ConnectorConfig`] carries one variant per supported
//! type so the discriminator and the payload shapes can never disagree.
//!
//! Secrets are write-only: Kibana never returns them, so every `secrets`
//! field is optional and omitted when absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Connector type plus its typed `config` and `secrets`.
///
/// Serialized as `{"connector_type_id": ".webhook", "config": {...}, "secrets": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "connector_type_id")]
pub enum ConnectorConfig {
    #[serde(rename = ".index")]
    Index { config: IndexConfig },

    #[serde(rename = ".webhook")]
    Webhook {
        config: WebhookConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secrets: Option<WebhookSecrets>,
    },

    #[serde(rename = ".slack")]
    Slack {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secrets: Option<SlackSecrets>,
    },

    #[serde(rename = ".email")]
    Email {
        config: EmailConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secrets: Option<EmailSecrets>,
    },

    #[serde(rename = ".server-log")]
    ServerLog {},

    #[serde(rename = ".pagerduty")]
    PagerDuty {
        #[serde(default)]
        config: PagerDutyConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secrets: Option<PagerDutySecrets>,
    },

    #[serde(rename = ".jira")]
    Jira {
        config: JiraConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secrets: Option<JiraSecrets>,
    },

    #[serde(rename = ".teams")]
    Teams {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secrets: Option<TeamsSecrets>,
    },
}

impl ConnectorConfig {
    /// The `connector_type_id` this variant is sent with.
    pub fn type_id(&self) -> &'static str {
        match self {
            Self::Index { .. } => ".index",
            Self::Webhook { .. } => ".webhook",
            Self::Slack { .. } => ".slack",
            Self::Email { .. } => ".email",
            Self::ServerLog {} => ".server-log",
            Self::PagerDuty { .. } => ".pagerduty",
            Self::Jira { .. } => ".jira",
            Self::Teams { .. } => ".teams",
        }
    }

    /// The `config` and `secrets` members without the type discriminator,
    /// as the update endpoint expects them.
    pub(crate) fn untagged_members(
        &self,
    ) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        let mut members = match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        members.remove("connector_type_id");
        members
            .entry("config")
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
        Ok(members)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    pub index: String,

    #[serde(rename = "executionTimeField", default, skip_serializing_if = "Option::is_none")]
    pub execution_time_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,

    /// `post` or `put`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    #[serde(rename = "hasAuth", default, skip_serializing_if = "Option::is_none")]
    pub has_auth: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookSecrets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackSecrets {
    #[serde(rename = "webhookUrl")]
    pub webhook_url: String,
}

/// SMTP or service-backed email configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailConfig {
    pub from: String,

    /// `elastic_cloud`, `exchange_server`, `gmail`, `outlook365`, `ses` or `other`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,

    #[serde(rename = "hasAuth", default, skip_serializing_if = "Option::is_none")]
    pub has_auth: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailSecrets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagerDutyConfig {
    #[serde(rename = "apiUrl", default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagerDutySecrets {
    #[serde(rename = "routingKey")]
    pub routing_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraConfig {
    #[serde(rename = "apiUrl")]
    pub api_url: String,

    #[serde(rename = "projectKey")]
    pub project_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraSecrets {
    pub email: String,

    #[serde(rename = "apiToken")]
    pub api_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamsSecrets {
    #[serde(rename = "webhookUrl")]
    pub webhook_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_webhook_serializes_with_discriminator() {
        let config = ConnectorConfig::Webhook {
            config: WebhookConfig {
                url: "https://hooks.example.com/kibana".into(),
                method: Some("post".into()),
                has_auth: Some(true),
                ..Default::default()
            },
            secrets: Some(WebhookSecrets {
                user: Some("bot".into()),
                password: Some("s3cret".into()),
            }),
        };

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "connector_type_id": ".webhook",
                "config": {"url": "https://hooks.example.com/kibana", "method": "post", "hasAuth": true},
                "secrets": {"user": "bot", "password": "s3cret"}
            })
        );
        assert_eq!(config.type_id(), ".webhook");
    }

    #[test]
    fn test_server_log_has_empty_config_when_untagged() {
        let members = ConnectorConfig::ServerLog {}.untagged_members().unwrap();
        assert_eq!(serde_json::Value::Object(members), json!({"config": {}}));
    }

    #[test]
    fn test_deserialize_without_secrets() {
        let config: ConnectorConfig = serde_json::from_value(json!({
            "connector_type_id": ".index",
            "config": {"index": "alerts-history", "refresh": false, "executionTimeField": null}
        }))
        .unwrap();
        assert_eq!(
            config,
            ConnectorConfig::Index {
                config: IndexConfig {
                    index: "alerts-history".into(),
                    execution_time_field: None,
                    refresh: Some(false),
                }
            }
        );
    }
}
