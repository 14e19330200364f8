//! Order Processing Worker (AMQP)
//!
//! A background worker that consumes order-creation events from a durable
//! AMQP queue, simulates the payment authorization step, and triggers a
//! confirmation email.
//!
//! ## Architecture
//!
//! ```text
//! AMQP broker (orders.created, durable, optional TTL)
//!   ↓ (prefetch = 1)
//! AmqpWorker<OrderProcessor>
//!   ↓ (decodes OrderEvent, simulates payment)
//! ConfirmationSender
//!   ↓ (renders order_confirmation template)
//! EmailProvider (SendGrid)
//! ```
//!
//! ## Reliability
//!
//! - Bounded connection retry with fixed backoff; clean diagnostic exit on
//!   exhaustion
//! - Idempotent durable queue declaration; parameter conflicts are fatal
//! - Single-flight consumption; ack/requeue decided by a typed disposition
//! - Email failures absorbed; they never poison order processing
//! - Graceful shutdown on SIGINT/SIGTERM

pub mod config;

use crate::config::WorkerSettings;
use amqp_worker::{connect, AmqpWorker};
use core_config::{Environment, FromEnv};
use domain_orders::{ConfirmationSender, OrderProcessor};
use email::{SendGridProvider, TemplateEngine};
use eyre::{Result, WrapErr};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Run the order worker
///
/// This is the main entry point. It:
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Loads and validates settings from the environment
/// 3. Connects to the broker with bounded retry
/// 4. Starts the consumption loop with graceful shutdown handling
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid (missing SendGrid key, unparseable values)
/// - The broker stays unreachable past the retry budget
/// - The queue exists with conflicting parameters
/// - The worker encounters a fatal broker error
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::install_color_eyre();
    core_config::tracing::init_tracing(&environment);

    info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        environment = ?environment,
        "Starting order worker"
    );

    let settings = WorkerSettings::from_env().wrap_err("Invalid worker configuration")?;

    let connection = connect(&settings.broker)
        .await
        .wrap_err_with(|| format!("Broker unreachable at {}", settings.broker.uri()))?;

    let mut processor = OrderProcessor::new(settings.payment_delay);
    match &settings.notifications {
        Some(notifications) => {
            let provider = Arc::new(SendGridProvider::new(
                notifications.sendgrid_api_key.clone(),
                notifications.from_email.clone(),
                notifications.from_name.clone(),
            ));
            let templates =
                TemplateEngine::new().wrap_err("Failed to initialize template engine")?;

            processor = processor.with_notifier(ConfirmationSender::new(
                provider,
                templates,
                notifications.link_base_url.clone(),
            ));

            info!(from = %notifications.from_email, "Confirmation notifications enabled");
        }
        None => {
            info!("Confirmation notifications disabled");
        }
    }

    let worker = AmqpWorker::new(&connection, processor, settings.worker_config())
        .await
        .wrap_err("Failed to initialize AMQP worker")?;

    // Set up the shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            error!("Error waiting for shutdown signal: {}", e);
        }
        let _ = shutdown_tx.send(true);
    });

    info!(
        queue = %settings.queue_name,
        "Waiting for orders. To exit press CTRL+C"
    );

    worker.run(shutdown_rx).await?;

    if let Err(e) = connection.close(200, "worker shutdown").await {
        warn!(error = %e, "Error closing broker connection");
    }

    info!("Order worker stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        },
    }

    Ok(())
}
