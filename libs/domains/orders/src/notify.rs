//! Order confirmation notifications.

use crate::models::OrderEvent;
use email::{Email, EmailProvider, TemplateEngine, ORDER_CONFIRMATION};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of a confirmation attempt.
///
/// Deliberately not a `Result`: the sender absorbs every failure, and the
/// caller only gets a report. Delivery is at-least-once end to end, so a
/// redelivered order may produce a duplicate email; that trade-off is
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Provider accepted the email.
    Sent { message_id: String },
    /// No contact address on the order; nothing to send.
    Skipped,
    /// Rendering or delivery failed; details are in the log.
    Failed,
}

/// Formats and submits the order confirmation email.
pub struct ConfirmationSender {
    provider: Arc<dyn EmailProvider>,
    templates: TemplateEngine,
    link_base_url: String,
}

impl ConfirmationSender {
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        templates: TemplateEngine,
        link_base_url: impl Into<String>,
    ) -> Self {
        let link_base_url = link_base_url.into().trim_end_matches('/').to_string();
        Self {
            provider,
            templates,
            link_base_url,
        }
    }

    /// Send the confirmation for one order.
    ///
    /// Never fails past this boundary: a provider outage is logged with
    /// full detail, the unsent content is echoed to the operator log as a
    /// diagnostic fallback, and the caller sees `SendOutcome::Failed`.
    pub async fn send_confirmation(&self, event: &OrderEvent) -> SendOutcome {
        let order_ref = event.order_ref();

        let Some(address) = event.contact_address() else {
            debug!(order_id = %order_ref, "No contact address on order, skipping confirmation");
            return SendOutcome::Skipped;
        };

        let rendered = match self
            .templates
            .render(ORDER_CONFIRMATION, &self.template_data(event))
        {
            Ok(rendered) => rendered,
            Err(e) => {
                error!(order_id = %order_ref, error = %e, "Failed to render confirmation email");
                return SendOutcome::Failed;
            }
        };

        let mut message = Email::new(address, rendered.subject);
        if let Some(name) = &event.customer_name {
            message = message.with_to_name(name);
        }
        if let Some(text) = rendered.body_text {
            message = message.with_text(text);
        }
        if let Some(html) = rendered.body_html {
            message = message.with_html(html);
        }

        match self.provider.send(&message).await {
            Ok(result) => {
                info!(
                    order_id = %order_ref,
                    to = %message.to,
                    message_id = %result.message_id,
                    "Confirmation email sent"
                );
                SendOutcome::Sent {
                    message_id: result.message_id,
                }
            }
            Err(e) => {
                error!(
                    order_id = %order_ref,
                    to = %message.to,
                    provider = self.provider.name(),
                    error = %e,
                    "Confirmation email failed"
                );
                // Diagnostic fallback so the operator can recover the content
                warn!(
                    order_id = %order_ref,
                    subject = %message.subject,
                    body = %message.body_text.as_deref().unwrap_or(""),
                    "Unsent confirmation email content"
                );
                SendOutcome::Failed
            }
        }
    }

    fn template_data(&self, event: &OrderEvent) -> Value {
        let order_ref = event.order_ref();
        json!({
            "order_id": order_ref,
            "customer_name": event.customer_name.as_deref().unwrap_or("there"),
            "items": serde_json::to_value(&event.products).unwrap_or_else(|_| Value::Array(vec![])),
            "total": event.total_price,
            "order_link": format!("{}/orders/{}", self.link_base_url, order_ref),
        })
    }
}
