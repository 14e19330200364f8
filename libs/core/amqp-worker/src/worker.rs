//! AMQP consumption loop.

use crate::connection::declare_queue;
use crate::error::AmqpError;
use crate::metrics::WorkerMetrics;
use futures::StreamExt;
use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions};
use lapin::types::FieldTable;
use lapin::{Channel, Connection};
use messaging::{Disposition, Handler, WorkerConfig};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const CLOSE_OK: u16 = 200;

/// AMQP worker consuming a single durable queue.
///
/// Holds one channel on the shared connection; the channel carries the QoS
/// prefetch limit, so a worker with prefetch=1 processes strictly one
/// message at a time.
pub struct AmqpWorker<H: Handler> {
    channel: Channel,
    handler: Arc<H>,
    config: WorkerConfig,
    metrics: WorkerMetrics,
}

impl<H: Handler> AmqpWorker<H> {
    /// Create a new worker: open a channel, declare the queue, set the
    /// prefetch limit.
    pub async fn new(
        connection: &Connection,
        handler: H,
        config: WorkerConfig,
    ) -> Result<Self, AmqpError> {
        let channel = connection.create_channel().await?;

        declare_queue(&channel, &config).await?;

        channel
            .basic_qos(config.prefetch, BasicQosOptions::default())
            .await?;

        let metrics = WorkerMetrics::new(&config.queue_name, handler.name());

        Ok(Self {
            channel,
            handler: Arc::new(handler),
            config,
            metrics,
        })
    }

    /// Run the consumption loop.
    ///
    /// The worker will:
    /// 1. Subscribe to the queue with the configured consumer tag
    /// 2. Dispatch each delivery to the handler and await its disposition
    /// 3. Ack on `Disposition::Ack`, nack on `Disposition::Requeue` (the
    ///    requeue flag decided by the configured policy)
    /// 4. Stop intake on the shutdown signal, letting the in-flight
    ///    delivery resolve first, then close the channel cleanly
    ///
    /// Per-message handler outcomes never surface as errors here; only
    /// broker-level failures (lost channel, failed ack) do.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), AmqpError> {
        info!(
            queue = %self.config.queue_name,
            consumer_tag = %self.config.consumer_tag,
            prefetch = self.config.prefetch,
            policy = %self.config.requeue_policy,
            "Starting AMQP worker"
        );

        let mut consumer = self
            .channel
            .basic_consume(
                &self.config.queue_name,
                &self.config.consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        loop {
            tokio::select! {
                // Check for shutdown; a dropped sender counts as shutdown
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping worker");
                        break;
                    }
                }

                // Next delivery; the dispatch completes before the loop
                // selects again, so shutdown never abandons an in-flight
                // message.
                next = consumer.next() => {
                    match next {
                        Some(Ok(delivery)) => self.dispatch(delivery).await?,
                        Some(Err(e)) => {
                            error!(error = %e, "Consumer stream error");
                            return Err(AmqpError::Broker(e));
                        }
                        None => {
                            warn!("Consumer stream closed by broker");
                            return Err(AmqpError::Consumer(
                                "consumer stream closed by broker".to_string(),
                            ));
                        }
                    }
                }
            }
        }

        self.close().await;
        Ok(())
    }

    /// Dispatch a single delivery and resolve it exactly once.
    async fn dispatch(&self, delivery: Delivery) -> Result<(), AmqpError> {
        self.metrics.message_received();

        let delivery_tag = delivery.delivery_tag;
        let redelivered = delivery.redelivered;

        if redelivered {
            debug!(delivery_tag, "Processing redelivered message");
        }

        let start = Instant::now();
        let disposition = self.handler.handle(&delivery.data).await;
        let duration = start.elapsed();

        match disposition {
            Disposition::Ack => {
                delivery.ack(BasicAckOptions::default()).await?;
                self.metrics.message_acked(duration);

                debug!(
                    delivery_tag,
                    duration_ms = duration.as_millis() as u64,
                    "Message acknowledged"
                );
            }
            Disposition::Requeue => {
                let requeue = self.config.requeue_policy.should_requeue(redelivered);

                delivery
                    .nack(BasicNackOptions {
                        requeue,
                        ..Default::default()
                    })
                    .await?;

                if requeue {
                    self.metrics.message_requeued();
                    warn!(delivery_tag, "Message returned to queue for redelivery");
                } else {
                    self.metrics.message_rejected();
                    warn!(
                        delivery_tag,
                        policy = %self.config.requeue_policy,
                        "Redelivered message rejected without requeue"
                    );
                }
            }
        }

        Ok(())
    }

    /// Close the channel cleanly. Unacked deliveries, if any, return to the
    /// queue on the broker side.
    async fn close(&self) {
        if let Err(e) = self.channel.close(CLOSE_OK, "worker shutdown").await {
            warn!(error = %e, "Error closing channel");
        }
        info!(queue = %self.config.queue_name, "AMQP worker stopped");
    }
}
