//! Configuration types for message consumption.

use crate::disposition::RequeuePolicy;
use std::time::Duration;

/// Worker configuration.
///
/// Backend-agnostic knobs for a consuming worker: which queue to bind,
/// how many unacknowledged deliveries it may hold, and what a requeue
/// request means for a redelivered message.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Queue name to declare and consume from
    pub queue_name: String,

    /// Consumer tag (unique per worker instance)
    pub consumer_tag: String,

    /// Maximum unacknowledged deliveries held at once.
    ///
    /// 1 means single-flight: each message is fully processed before the
    /// next is delivered, which caps memory and preserves per-worker
    /// ordering.
    pub prefetch: u16,

    /// Message time-to-live applied at queue declaration (None = no expiry)
    pub message_ttl: Option<Duration>,

    /// Policy applied when a handler requests a requeue
    pub requeue_policy: RequeuePolicy,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_name: "default.queue".to_string(),
            consumer_tag: default_consumer_tag("worker"),
            prefetch: 1,
            message_ttl: None,
            requeue_policy: RequeuePolicy::default(),
        }
    }
}

impl WorkerConfig {
    /// Create a new worker configuration for the given queue.
    pub fn new(queue_name: impl Into<String>) -> Self {
        let queue_name = queue_name.into();
        let consumer_tag = default_consumer_tag(&queue_name);
        Self {
            queue_name,
            consumer_tag,
            ..Default::default()
        }
    }

    /// Set the consumer tag.
    pub fn with_consumer_tag(mut self, tag: impl Into<String>) -> Self {
        self.consumer_tag = tag.into();
        self
    }

    /// Set the prefetch limit.
    pub fn with_prefetch(mut self, prefetch: u16) -> Self {
        self.prefetch = prefetch;
        self
    }

    /// Set the queue message TTL.
    pub fn with_message_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.message_ttl = ttl;
        self
    }

    /// Set the requeue policy.
    pub fn with_requeue_policy(mut self, policy: RequeuePolicy) -> Self {
        self.requeue_policy = policy;
        self
    }
}

fn default_consumer_tag(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4();
    let short = id.to_string();
    let short = short.split('-').next().unwrap_or("0").to_string();
    format!("{}-{}", prefix, short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = WorkerConfig::new("orders.created");
        assert_eq!(config.queue_name, "orders.created");
        assert_eq!(config.prefetch, 1);
        assert_eq!(config.message_ttl, None);
        assert_eq!(config.requeue_policy, RequeuePolicy::Always);
        assert!(config.consumer_tag.starts_with("orders.created-"));
    }

    #[test]
    fn test_config_builders() {
        let config = WorkerConfig::new("orders.created")
            .with_consumer_tag("worker-1")
            .with_prefetch(5)
            .with_message_ttl(Some(Duration::from_millis(86_400_000)))
            .with_requeue_policy(RequeuePolicy::RejectRedelivered);

        assert_eq!(config.consumer_tag, "worker-1");
        assert_eq!(config.prefetch, 5);
        assert_eq!(config.message_ttl, Some(Duration::from_millis(86_400_000)));
        assert_eq!(config.requeue_policy, RequeuePolicy::RejectRedelivered);
    }

    #[test]
    fn test_consumer_tags_are_unique() {
        let a = WorkerConfig::new("q");
        let b = WorkerConfig::new("q");
        assert_ne!(a.consumer_tag, b.consumer_tag);
    }
}
