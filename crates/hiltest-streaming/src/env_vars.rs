// Copyright 2026 HIL Test Platform Team

//! Centralized environment variable names and typed accessors for
//! `hiltest-streaming`, read by [`StreamingConfig::from_env`](crate::config::StreamingConfig::from_env).

/// Comma-separated NATS server URLs.
pub const HILTEST_NATS_SERVERS: &str = "HILTEST_NATS_SERVERS";
/// JetStream stream name for telemetry data.
pub const HILTEST_STREAM_NAME: &str = "HILTEST_STREAM_NAME";
/// Subject prefix; full subjects are `{prefix}.{source_id}.{schema|data}`.
pub const HILTEST_SUBJECT_PREFIX: &str = "HILTEST_SUBJECT_PREFIX";
/// Connection timeout in seconds.
pub const HILTEST_NATS_CONNECT_TIMEOUT_SECS: &str = "HILTEST_NATS_CONNECT_TIMEOUT_SECS";
/// Schema broadcast interval in seconds.
pub const HILTEST_SCHEMA_PUBLISH_INTERVAL_SECS: &str = "HILTEST_SCHEMA_PUBLISH_INTERVAL_SECS";
/// NATS auth username.
pub const HILTEST_NATS_USER: &str = "HILTEST_NATS_USER";
/// NATS auth password.
pub const HILTEST_NATS_PASSWORD: &str = "HILTEST_NATS_PASSWORD";
/// NATS auth token.
pub const HILTEST_NATS_TOKEN: &str = "HILTEST_NATS_TOKEN";

/// Reads an environment variable as a string, returning `default` if unset.
#[must_use]
pub fn env_string_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Reads an environment variable as a string, returning `None` if unset.
#[must_use]
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Reads an environment variable as an `f64`, returning `default` if unset or invalid.
#[must_use]
pub fn env_f64_or_default(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

/// Reads a comma-separated environment variable as a `Vec<String>`, returning
/// `default` if unset or empty.
#[must_use]
pub fn env_csv_or_default(name: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.split(',').map(|s| s.trim().to_string()).collect(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_falls_back_to_default_when_unset() {
        let result = env_csv_or_default("HILTEST_TEST_UNSET_VAR_XYZ", &["nats://localhost:4222"]);
        assert_eq!(result, vec!["nats://localhost:4222".to_string()]);
    }

    #[test]
    fn f64_falls_back_on_parse_failure() {
        std::env::set_var("HILTEST_TEST_BAD_FLOAT", "not-a-number");
        assert_eq!(env_f64_or_default("HILTEST_TEST_BAD_FLOAT", 1.0), 1.0);
        std::env::remove_var("HILTEST_TEST_BAD_FLOAT");
    }
}
