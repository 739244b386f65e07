//
//  kibana-api
//  logging.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Logging setup.
//!
//! The library itself only emits `tracing` events and spans. Binaries that
//! want them printed call [`init`] once at startup:
//!
//! ```sh
//! KIBANA_DEBUG=kibana_api=debug my-tool
//! ```

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directives.
pub const FILTER_ENV: &str = "KIBANA_DEBUG";

/// Installs a global fmt subscriber filtered by `KIBANA_DEBUG`
/// (default `warn`). Fails if a global subscriber is already set.
pub fn init() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter_from_env())
        .try_init()?;
    Ok(())
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let _ = init();
        assert!(init().is_err());
    }
}
