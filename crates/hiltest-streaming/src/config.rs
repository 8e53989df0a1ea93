// Copyright 2026 HIL Test Platform Team

//! Configuration for connecting to the telemetry broker.

use crate::env_vars;

/// JetStream consumer delivery-start policy: where in a durable stream a
/// new subscriber begins receiving messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliverPolicy {
    /// Deliver every retained message, oldest first.
    All,
    /// Deliver only the most recent message, then new ones as they arrive.
    Last,
    /// Deliver only messages published after the subscription is created.
    New,
}

impl DeliverPolicy {
    fn parse(s: &str) -> Self {
        match s {
            "last" => Self::Last,
            "new" => Self::New,
            _ => Self::All,
        }
    }
}

/// Configuration for connecting to NATS JetStream and addressing telemetry
/// subjects.
#[derive(Debug, Clone)]
pub struct StreamingConfig {
    /// NATS server URLs, e.g. `["nats://localhost:4222"]`.
    pub servers: Vec<String>,
    /// JetStream stream name backing telemetry subjects.
    pub stream_name: String,
    /// Subject prefix; full subjects are `{prefix}.{source_id}.{schema|data}`.
    pub subject_prefix: String,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: f64,
    /// Interval between schema broadcasts, in seconds.
    pub schema_publish_interval_secs: f64,
    /// Optional username for authentication.
    pub user: Option<String>,
    /// Optional password for authentication.
    pub password: Option<String>,
    /// Optional token for authentication.
    pub token: Option<String>,
    /// Durable consumer name; `None` means an ephemeral consumer.
    pub consumer_durable_name: Option<String>,
    /// Where a new subscription begins reading the durable stream.
    pub consumer_deliver_policy: DeliverPolicy,
    /// Max time JetStream waits for an ack before redelivering, in seconds.
    pub consumer_ack_wait_secs: f64,
    /// Bounded capacity of a subscriber's internal data queue. Once full,
    /// further message delivery blocks (delaying the ack) rather than
    /// dropping data.
    pub subscriber_queue_capacity: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            stream_name: "TELEMETRY".to_string(),
            subject_prefix: "telemetry".to_string(),
            connect_timeout_secs: 5.0,
            schema_publish_interval_secs: 1.0,
            user: None,
            password: None,
            token: None,
            consumer_durable_name: None,
            consumer_deliver_policy: DeliverPolicy::All,
            consumer_ack_wait_secs: 30.0,
            subscriber_queue_capacity: 1024,
        }
    }
}

impl StreamingConfig {
    /// Build a configuration from well-known environment variables,
    /// falling back to [`StreamingConfig::default`] values for anything unset.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            servers: env_vars::env_csv_or_default(
                env_vars::HILTEST_NATS_SERVERS,
                &["nats://localhost:4222"],
            ),
            stream_name: env_vars::env_string_or_default(
                env_vars::HILTEST_STREAM_NAME,
                &default.stream_name,
            ),
            subject_prefix: env_vars::env_string_or_default(
                env_vars::HILTEST_SUBJECT_PREFIX,
                &default.subject_prefix,
            ),
            connect_timeout_secs: env_vars::env_f64_or_default(
                env_vars::HILTEST_NATS_CONNECT_TIMEOUT_SECS,
                default.connect_timeout_secs,
            ),
            schema_publish_interval_secs: env_vars::env_f64_or_default(
                env_vars::HILTEST_SCHEMA_PUBLISH_INTERVAL_SECS,
                default.schema_publish_interval_secs,
            ),
            user: env_vars::env_string(env_vars::HILTEST_NATS_USER),
            password: env_vars::env_string(env_vars::HILTEST_NATS_PASSWORD),
            token: env_vars::env_string(env_vars::HILTEST_NATS_TOKEN),
            ..default
        }
    }

    /// The schema subject for `source_id`: `{prefix}.{source_id}.schema`.
    pub fn schema_subject(&self, source_id: &str) -> String {
        format!("{}.{}.schema", self.subject_prefix, source_id)
    }

    /// The data subject for `source_id`: `{prefix}.{source_id}.data`.
    pub fn data_subject(&self, source_id: &str) -> String {
        format!("{}.{}.data", self.subject_prefix, source_id)
    }

    /// The wildcard subject covering both schema and data for `source_id`:
    /// `{prefix}.{source_id}.>`.
    pub fn source_wildcard(&self, source_id: &str) -> String {
        format!("{}.{}.>", self.subject_prefix, source_id)
    }

    /// The stream-wide wildcard subject used when creating the JetStream
    /// stream: `{prefix}.>`.
    pub fn stream_wildcard(&self) -> String {
        format!("{}.>", self.subject_prefix)
    }

    /// The subject the state bus publishes transitions on: `{prefix}.state`.
    /// Covered by the same stream wildcard as schema/data subjects.
    pub fn state_subject(&self) -> String {
        format!("{}.state", self.subject_prefix)
    }
}

impl DeliverPolicy {
    pub(crate) fn from_config_str(s: &str) -> Self {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_subjects_match_wire_convention() {
        let config = StreamingConfig::default();
        assert_eq!(config.schema_subject("dmm-1"), "telemetry.dmm-1.schema");
        assert_eq!(config.data_subject("dmm-1"), "telemetry.dmm-1.data");
        assert_eq!(config.source_wildcard("dmm-1"), "telemetry.dmm-1.>");
        assert_eq!(config.stream_wildcard(), "telemetry.>");
        assert_eq!(config.state_subject(), "telemetry.state");
    }

    #[test]
    fn deliver_policy_parses_known_strings() {
        assert_eq!(DeliverPolicy::from_config_str("last"), DeliverPolicy::Last);
        assert_eq!(DeliverPolicy::from_config_str("new"), DeliverPolicy::New);
        assert_eq!(DeliverPolicy::from_config_str("all"), DeliverPolicy::All);
        assert_eq!(DeliverPolicy::from_config_str("garbage"), DeliverPolicy::All);
    }
}
