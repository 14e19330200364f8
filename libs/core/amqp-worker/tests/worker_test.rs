//! Broker-backed integration tests.
//!
//! These run against a real RabbitMQ container and are ignored by default:
//!
//! ```sh
//! cargo test -p amqp-worker -- --ignored
//! ```

use amqp_worker::{connect, declare_queue, AmqpWorker, BrokerConfig};
use async_trait::async_trait;
use lapin::options::BasicPublishOptions;
use lapin::BasicProperties;
use messaging::{Disposition, Handler, RequeuePolicy, WorkerConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use test_utils::TestRabbitMq;
use tokio::sync::watch;

struct CountingHandler {
    handled: Arc<AtomicUsize>,
    disposition: Disposition,
}

#[async_trait]
impl Handler for CountingHandler {
    async fn handle(&self, _body: &[u8]) -> Disposition {
        self.handled.fetch_add(1, Ordering::SeqCst);
        self.disposition
    }

    fn name(&self) -> &'static str {
        "counting_handler"
    }
}

async fn publish(connection: &lapin::Connection, queue: &str, payload: &[u8]) {
    let channel = connection.create_channel().await.expect("create channel");
    channel
        .basic_publish(
            "",
            queue,
            BasicPublishOptions::default(),
            payload,
            BasicProperties::default().with_delivery_mode(2),
        )
        .await
        .expect("publish")
        .await
        .expect("publish confirm");
}

async fn wait_for(handled: &Arc<AtomicUsize>, count: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while handled.load(Ordering::SeqCst) < count {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {count} handled messages, got {}",
            handled.load(Ordering::SeqCst)
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn declare_is_idempotent_and_conflicts_are_fatal() {
    let broker = TestRabbitMq::new().await;
    let config = BrokerConfig::new(broker.host(), broker.port());
    let connection = connect(&config).await.expect("connect");

    let ttl = Some(Duration::from_millis(86_400_000));
    let worker_config = WorkerConfig::new("orders.created").with_message_ttl(ttl);

    // Declaring the same durable queue with the same TTL twice succeeds.
    let channel = connection.create_channel().await.expect("channel");
    declare_queue(&channel, &worker_config).await.expect("first declare");
    declare_queue(&channel, &worker_config).await.expect("second declare");

    // A conflicting TTL on the existing queue is refused by the broker.
    let conflicting = WorkerConfig::new("orders.created")
        .with_message_ttl(Some(Duration::from_millis(1000)));
    let channel = connection.create_channel().await.expect("channel");
    let err = declare_queue(&channel, &conflicting).await.unwrap_err();
    assert!(err.is_fatal(), "conflict should be fatal, got {err}");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn worker_acks_processed_messages() {
    let broker = TestRabbitMq::new().await;
    let config = BrokerConfig::new(broker.host(), broker.port());
    let connection = connect(&config).await.expect("connect");

    let handled = Arc::new(AtomicUsize::new(0));
    let handler = CountingHandler {
        handled: handled.clone(),
        disposition: Disposition::Ack,
    };

    let worker_config = WorkerConfig::new("orders.ack-test");
    let worker = AmqpWorker::new(&connection, handler, worker_config)
        .await
        .expect("worker");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = tokio::spawn(async move { worker.run(shutdown_rx).await });

    publish(&connection, "orders.ack-test", br#"{"orderId":"A1"}"#).await;
    wait_for(&handled, 1).await;

    shutdown_tx.send(true).expect("signal shutdown");
    run.await.expect("join").expect("worker run");

    assert_eq!(handled.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn reject_redelivered_stops_the_requeue_loop() {
    let broker = TestRabbitMq::new().await;
    let config = BrokerConfig::new(broker.host(), broker.port());
    let connection = connect(&config).await.expect("connect");

    let handled = Arc::new(AtomicUsize::new(0));
    let handler = CountingHandler {
        handled: handled.clone(),
        disposition: Disposition::Requeue,
    };

    let worker_config = WorkerConfig::new("orders.poison-test")
        .with_requeue_policy(RequeuePolicy::RejectRedelivered);
    let worker = AmqpWorker::new(&connection, handler, worker_config)
        .await
        .expect("worker");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = tokio::spawn(async move { worker.run(shutdown_rx).await });

    publish(&connection, "orders.poison-test", b"not valid json").await;

    // First failure requeues, the redelivered failure is rejected: exactly
    // two deliveries, then the queue stays quiet.
    wait_for(&handled, 2).await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(handled.load(Ordering::SeqCst), 2);

    shutdown_tx.send(true).expect("signal shutdown");
    run.await.expect("join").expect("worker run");
}
