//! Configuration for the order worker.
//!
//! Everything is read from the environment exactly once at startup into
//! [`WorkerSettings`], validated, and passed by reference from there on.
//! The SendGrid credential has no default: when notifications are enabled
//! and the key is absent, startup fails fast.

use amqp_worker::BrokerConfig;
use core_config::{env_or_default, env_parse_or, env_required, ConfigError, FromEnv};
use messaging::{RequeuePolicy, WorkerConfig};
use std::time::Duration;

/// Settings for the confirmation email path.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// SendGrid API key (required, never defaulted)
    pub sendgrid_api_key: String,
    /// From address on outgoing confirmations
    pub from_email: String,
    /// From display name
    pub from_name: String,
    /// Base URL for the order tracking link
    pub link_base_url: String,
}

/// Validated worker settings.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Broker endpoint and connection retry budget
    pub broker: BrokerConfig,
    /// Queue to declare and consume
    pub queue_name: String,
    /// Queue message TTL (None = no expiry)
    pub message_ttl: Option<Duration>,
    /// Prefetch limit (1 = single-flight)
    pub prefetch: u16,
    /// Poison-message stance
    pub requeue_policy: RequeuePolicy,
    /// Simulated payment authorization duration
    pub payment_delay: Duration,
    /// Confirmation email settings; None disables notifications
    pub notifications: Option<NotificationSettings>,
}

impl FromEnv for WorkerSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let broker = BrokerConfig::new(
            env_or_default("BROKER_HOST", "localhost"),
            env_parse_or("BROKER_PORT", 5672u16)?,
        )
        .with_max_retries(env_parse_or("BROKER_MAX_RETRIES", 20u32)?)
        .with_retry_delay(Duration::from_secs(env_parse_or(
            "BROKER_RETRY_DELAY_SECS",
            5u64,
        )?));

        // 0 disables the TTL argument entirely
        let ttl_ms: u64 = env_parse_or("ORDERS_QUEUE_TTL_MS", 86_400_000u64)?;
        let message_ttl = (ttl_ms > 0).then(|| Duration::from_millis(ttl_ms));

        let requeue_policy = env_or_default("REQUEUE_POLICY", "always")
            .parse::<RequeuePolicy>()
            .map_err(|e| ConfigError::ParseError {
                key: "REQUEUE_POLICY".to_string(),
                details: e.to_string(),
            })?;

        let notifications_enabled: bool = env_parse_or("NOTIFICATIONS_ENABLED", true)?;
        let notifications = if notifications_enabled {
            Some(NotificationSettings {
                sendgrid_api_key: env_required("SENDGRID_API_KEY")?,
                from_email: env_or_default("EMAIL_FROM_ADDRESS", "orders@atsea.example"),
                from_name: env_or_default("EMAIL_FROM_NAME", "AtSea Shop"),
                link_base_url: env_or_default("ORDER_LINK_BASE_URL", "https://shop.atsea.example"),
            })
        } else {
            None
        };

        Ok(Self {
            broker,
            queue_name: env_or_default("ORDERS_QUEUE", "orders.created"),
            message_ttl,
            prefetch: env_parse_or("WORKER_PREFETCH", 1u16)?,
            requeue_policy,
            payment_delay: Duration::from_millis(env_parse_or("PAYMENT_DELAY_MS", 1000u64)?),
            notifications,
        })
    }
}

impl WorkerSettings {
    /// Build the consumption-loop configuration.
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig::new(&self.queue_name)
            .with_prefetch(self.prefetch)
            .with_message_ttl(self.message_ttl)
            .with_requeue_policy(self.requeue_policy)
    }
}
