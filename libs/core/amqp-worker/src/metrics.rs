//! Metrics for the AMQP worker.

use metrics::{counter, histogram};
use std::time::Duration;

/// Metrics for a consuming worker.
#[derive(Clone)]
pub struct WorkerMetrics {
    queue_name: String,
    handler_name: String,
}

impl WorkerMetrics {
    /// Create new metrics.
    pub fn new(queue_name: &str, handler_name: &str) -> Self {
        Self {
            queue_name: queue_name.to_string(),
            handler_name: handler_name.to_string(),
        }
    }

    /// Record a delivery received.
    pub fn message_received(&self) {
        counter!(
            "amqp_worker_messages_received_total",
            "queue" => self.queue_name.clone(),
            "handler" => self.handler_name.clone()
        )
        .increment(1);
    }

    /// Record a delivery acknowledged.
    pub fn message_acked(&self, duration: Duration) {
        counter!(
            "amqp_worker_messages_acked_total",
            "queue" => self.queue_name.clone(),
            "handler" => self.handler_name.clone()
        )
        .increment(1);

        histogram!(
            "amqp_worker_handle_duration_seconds",
            "queue" => self.queue_name.clone(),
            "handler" => self.handler_name.clone()
        )
        .record(duration.as_secs_f64());
    }

    /// Record a delivery returned to the queue.
    pub fn message_requeued(&self) {
        counter!(
            "amqp_worker_messages_requeued_total",
            "queue" => self.queue_name.clone(),
            "handler" => self.handler_name.clone()
        )
        .increment(1);
    }

    /// Record a delivery rejected without requeue.
    pub fn message_rejected(&self) {
        counter!(
            "amqp_worker_messages_rejected_total",
            "queue" => self.queue_name.clone(),
            "handler" => self.handler_name.clone()
        )
        .increment(1);
    }
}
