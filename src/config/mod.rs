//
//  kibana-api
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Connection settings for [`KibanaClient::from_config`](crate::KibanaClient::from_config),
//! read from a TOML file in the platform configuration directory and
//! optionally overridden from the environment.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/kibana/config.toml`
//! - **macOS**: `~/Library/Application Support/kibana/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\kibana\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [kibana]
//! url = "https://kibana.example.com:5601"
//! space = "security"
//! timeout_secs = 30
//! insecure = false
//!
//! [kibana.headers]
//! x-team = "soc"
//!
//! [auth]
//! type = "api_key"
//! encoded = "VnVhQ2ZHY0JDZGJrUW0tZTVhT3g6dWkybHAyYXhUTm1zeWFrdzl0dk5udw=="
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `KIBANA_URL` | Replaces `kibana.url` |
//! | `KIBANA_SPACE` | Replaces `kibana.space` |
//! | `KIBANA_API_KEY` | API key credential (wins over basic) |
//! | `KIBANA_USERNAME` + `KIBANA_PASSWORD` | Basic credential |
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O

mod file;

pub use file::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::auth::Credential;

/// Kibana's default local address.
pub const DEFAULT_URL: &str = "http://localhost:5601";

/// Complete configuration.
///
/// All sections default, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub kibana: KibanaConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

/// Where and how to reach Kibana.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KibanaConfig {
    /// Base URL, optionally with a base path (`https://host/kibana`).
    #[serde(default = "default_url")]
    pub url: String,

    /// Space every request is scoped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,

    /// Whole-request timeout. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Accept invalid TLS certificates. Only for test clusters.
    #[serde(default)]
    pub insecure: bool,

    /// Extra headers sent with every request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

impl Default for KibanaConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            space: None,
            timeout_secs: None,
            insecure: false,
            headers: BTreeMap::new(),
        }
    }
}

/// Stored credentials, tagged by `type`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    ApiKey { encoded: String },
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&Credential::from(self), f)
    }
}

impl From<&AuthConfig> for Credential {
    fn from(auth: &AuthConfig) -> Self {
        match auth {
            AuthConfig::ApiKey { encoded } => Credential::api_key(encoded.clone()),
            AuthConfig::Basic { username, password } => {
                Credential::basic(username.clone(), password.clone())
            }
            AuthConfig::Bearer { token } => Credential::bearer(token.clone()),
        }
    }
}

impl Config {
    /// Loads the configuration from [`Config::config_path`], or defaults if
    /// the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Saves the configuration to [`Config::config_path`].
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Path of the configuration file. It may not exist yet.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "kibana")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Applies `KIBANA_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(url) = var("KIBANA_URL") {
            self.kibana.url = url;
        }
        if let Some(space) = var("KIBANA_SPACE") {
            self.kibana.space = Some(space);
        }
        if let Some(encoded) = var("KIBANA_API_KEY") {
            self.auth = Some(AuthConfig::ApiKey { encoded });
        } else if let (Some(username), Some(password)) =
            (var("KIBANA_USERNAME"), var("KIBANA_PASSWORD"))
        {
            self.auth = Some(AuthConfig::Basic { username, password });
        }
        self
    }

    /// The credential to authenticate with, if any.
    pub fn credential(&self) -> Option<Credential> {
        self.auth.as_ref().map(Credential::from)
    }
}
