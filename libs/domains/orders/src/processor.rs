//! Order message handler.

use crate::models::OrderEvent;
use crate::notify::ConfirmationSender;
use async_trait::async_trait;
use messaging::{Disposition, Handler};
use std::time::Duration;
use tracing::{info, warn};

/// Message handler for order-creation events.
///
/// One configurable handler covers both worker flavors: payment-only, and
/// payment plus confirmation email (when a [`ConfirmationSender`] is
/// attached).
pub struct OrderProcessor {
    payment_delay: Duration,
    notifier: Option<ConfirmationSender>,
}

impl OrderProcessor {
    /// Create a processor without notifications.
    ///
    /// `payment_delay` bounds the simulated payment authorization step.
    pub fn new(payment_delay: Duration) -> Self {
        Self {
            payment_delay,
            notifier: None,
        }
    }

    /// Attach a confirmation sender.
    pub fn with_notifier(mut self, notifier: ConfirmationSender) -> Self {
        self.notifier = Some(notifier);
        self
    }

    async fn process(&self, event: &OrderEvent) {
        info!(
            order_id = %event.order_ref(),
            customer_id = %event
                .customer_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            products = event.products.len(),
            total = event.total_price,
            "Received order"
        );

        // Simulated payment authorization: a fixed-duration step standing in
        // for the real gateway call.
        if !self.payment_delay.is_zero() {
            tokio::time::sleep(self.payment_delay).await;
        }
        info!(order_id = %event.order_ref(), "Payment authorized");

        if let Some(notifier) = &self.notifier {
            // Outcome deliberately ignored for the disposition: the sender
            // has already logged everything there is to know.
            let _ = notifier.send_confirmation(event).await;
        }
    }
}

#[async_trait]
impl Handler for OrderProcessor {
    async fn handle(&self, body: &[u8]) -> Disposition {
        let event = match serde_json::from_slice::<OrderEvent>(body) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Undecodable order event, returning it to the queue");
                return Disposition::Requeue;
            }
        };

        self.process(&event).await;

        Disposition::Ack
    }

    fn name(&self) -> &'static str {
        "order_processor"
    }
}
