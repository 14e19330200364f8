//! Broker connection establishment and queue declaration.

use crate::error::AmqpError;
use crate::retry::retry_fixed;
use lapin::options::QueueDeclareOptions;
use lapin::types::{AMQPValue, FieldTable};
use lapin::{Channel, Connection, ConnectionProperties};
use messaging::WorkerConfig;
use std::time::Duration;
use tracing::{debug, info};

/// Broker endpoint and connection retry budget.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Broker hostname
    pub host: String,

    /// Broker port
    pub port: u16,

    /// Maximum connection attempts before giving up
    pub max_retries: u32,

    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5672,
            max_retries: 20,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl BrokerConfig {
    /// Create a broker configuration for the given endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// AMQP URI for this endpoint.
    pub fn uri(&self) -> String {
        format!("amqp://{}:{}", self.host, self.port)
    }
}

/// Connect to the broker with bounded fixed-delay retry.
///
/// Each failed attempt is logged with its position in the budget. Once the
/// budget is spent, returns [`AmqpError::RetriesExhausted`], a terminal
/// error the caller should treat as fatal (log a diagnostic and exit, not
/// crash).
pub async fn connect(config: &BrokerConfig) -> Result<Connection, AmqpError> {
    let uri = config.uri();

    info!(uri = %uri, max_retries = config.max_retries, "Connecting to broker");

    let connection = retry_fixed(
        || Connection::connect(&uri, ConnectionProperties::default()),
        config.max_retries,
        config.retry_delay,
    )
    .await
    .map_err(|e| AmqpError::RetriesExhausted {
        attempts: e.attempts,
        last: e.last,
    })?;

    info!(uri = %uri, "Connected to broker");

    Ok(connection)
}

/// Declare the worker's queue: durable, optionally with a message TTL.
///
/// Declaration is idempotent by AMQP contract: redeclaring with identical
/// parameters succeeds silently. If the queue already exists with different
/// parameters the broker refuses with a precondition failure, surfaced here
/// as the fatal [`AmqpError::QueueConflict`].
pub async fn declare_queue(channel: &Channel, config: &WorkerConfig) -> Result<(), AmqpError> {
    let mut arguments = FieldTable::default();
    if let Some(ttl) = config.message_ttl {
        arguments.insert(
            "x-message-ttl".into(),
            AMQPValue::LongLongInt(ttl.as_millis() as i64),
        );
    }

    let options = QueueDeclareOptions {
        durable: true,
        ..Default::default()
    };

    let queue = channel
        .queue_declare(&config.queue_name, options, arguments)
        .await
        .map_err(|e| AmqpError::from_declare_error(&config.queue_name, e))?;

    debug!(
        queue = %config.queue_name,
        messages = queue.message_count(),
        ttl_ms = config.message_ttl.map(|t| t.as_millis() as u64),
        "Queue declared"
    );

    Ok(())
}
