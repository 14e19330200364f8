//! RabbitMQ test infrastructure
//!
//! Provides a `TestRabbitMq` helper that starts a RabbitMQ container for
//! broker-backed integration tests.

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::rabbitmq::RabbitMq;

/// Test RabbitMQ wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is
/// dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestRabbitMq;
///
/// # async fn example() {
/// let broker = TestRabbitMq::new().await;
///
/// // Point your worker at the mapped endpoint
/// let (host, port) = (broker.host(), broker.port());
/// # }
/// ```
pub struct TestRabbitMq {
    #[allow(dead_code)]
    container: ContainerAsync<RabbitMq>,
    port: u16,
}

impl TestRabbitMq {
    /// Start a RabbitMQ container and wait for the AMQP port.
    pub async fn new() -> Self {
        let container = RabbitMq::default()
            .start()
            .await
            .expect("Failed to start RabbitMQ container");

        let port = container
            .get_host_port_ipv4(5672)
            .await
            .expect("Failed to get AMQP port");

        tracing::info!(port, "Test RabbitMQ ready");

        Self { container, port }
    }

    /// Host the broker is reachable on.
    pub fn host(&self) -> &'static str {
        "127.0.0.1"
    }

    /// Mapped AMQP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// AMQP URI for the mapped endpoint.
    pub fn uri(&self) -> String {
        format!("amqp://{}:{}", self.host(), self.port)
    }
}
