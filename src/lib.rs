//
//  kibana-api
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Kibana API Client Library
//!
//! A typed async client for the Kibana REST API.
//!
//! ## Overview
//!
//! Every endpoint follows the same steps: validate the request, build the
//! path, encode the body, apply request options, instrument, perform the
//! call through a pluggable transport, then decode the success body or
//! surface a structured error. Nothing is retried.
//!
//! ## Features
//!
//! - **Pluggable transport**: Swap the reqwest-backed default for anything
//!   implementing [`api::Transport`]
//! - **Instrumentation**: Optional span and callback hooks, with a `tracing`
//!   implementation included
//! - **Typed payloads**: Connector configs, detection rule types and Fleet
//!   agent actions are tagged enums
//! - **NDJSON exports**: Saved-object and detection-rule exports, with a
//!   helper that writes them back to disk
//!
//! ## Module Structure
//!
//! - [`api`]: Client, transport, endpoint groups and shared types
//! - [`auth`]: Credentials attached to every request
//! - [`config`]: Connection settings from a TOML file and the environment
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kibana_api::{Config, KibanaClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! kibana_api::logging::init()?;
//!
//! let config = Config::load()?.with_env_overrides();
//! let client = KibanaClient::from_config(&config)?;
//!
//! let status = client.status().get(&[]).await?.into_body();
//! println!("Kibana {} is {}", status.version.number, status.status.overall.level);
//! # Ok(())
//! # }
//! ```

/// Kibana API client, transport seam and endpoint groups.
pub mod api;

/// Credentials for API key, basic and bearer authentication.
pub mod auth;

/// Connection configuration.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/kibana/config.toml`
/// - macOS: `~/Library/Application Support/kibana/config.toml`
/// - Windows: `%APPDATA%\kibana\config.toml`
pub mod config;

/// Logging setup for binaries and tests that use this crate.
pub mod logging;

pub use api::{Error, KibanaClient, Result};
pub use config::Config;

/// Name sent in the `User-Agent` header.
pub const APP_NAME: &str = "kibana-api";

/// Crate version, derived from Cargo.toml at compile time.
///
/// ```rust
/// use kibana_api::VERSION;
///
/// println!("kibana-api {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
