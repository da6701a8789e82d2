//! Runtime configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::net::mock::MockLatency;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub latency: MockLatency,
    pub session_file: Option<PathBuf>,
}

impl AppConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `REGISTRANT_REGISTER_DELAY_MS`: default 800
    /// - `REGISTRANT_LIST_DELAY_MS`: default 500
    /// - `REGISTRANT_REVOKE_DELAY_MS`: default 600
    /// - `REGISTRANT_SESSION_FILE`: persist the auth snapshot here when set
    ///
    /// Unparsable numbers fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let latency = MockLatency {
            register: env_millis("REGISTRANT_REGISTER_DELAY_MS", MockLatency::DEFAULT_REGISTER_MS),
            list: env_millis("REGISTRANT_LIST_DELAY_MS", MockLatency::DEFAULT_LIST_MS),
            revoke: env_millis("REGISTRANT_REVOKE_DELAY_MS", MockLatency::DEFAULT_REVOKE_MS),
        };
        let session_file = std::env::var("REGISTRANT_SESSION_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self { latency, session_file }
    }
}

fn env_millis(key: &str, default: u64) -> Duration {
    let millis = std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_millis(millis)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
