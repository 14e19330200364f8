//! AMQP worker framework for reliable queue consumption.
//!
//! This library drives a single consuming worker over an AMQP 0.9.1 broker
//! (RabbitMQ or compatible), built on `lapin`. It implements the
//! [`messaging::Handler`] contract, so application code stays
//! backend-agnostic.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌─────────────────────┐     ┌────────────────┐
//! │   Producer     │────▶│   Durable Queue     │────▶│   AmqpWorker   │
//! │  (upstream)    │     │  (orders.created)   │     │ (prefetch = 1) │
//! └────────────────┘     └─────────────────────┘     └────────────────┘
//!                                  ▲                         │
//!                                  │ nack(requeue)           ▼
//!                                  └──────────────── Handler → Disposition
//! ```
//!
//! # Key features
//!
//! - **Bounded connection retry**: fixed-delay retry up to a configured
//!   attempt count, then a terminal error the caller treats as fatal
//! - **Idempotent queue declaration**: durable, with an optional
//!   `x-message-ttl` argument; a parameter conflict against an existing
//!   queue is a fatal configuration error
//! - **Single-flight consumption**: prefetch caps unacknowledged
//!   deliveries; with prefetch=1 each message is fully processed before
//!   the next arrives
//! - **Typed dispositions**: ack / nack-with-requeue decided by the
//!   handler's [`messaging::Disposition`] and the worker's
//!   [`messaging::RequeuePolicy`]
//! - **Graceful shutdown**: a watch channel stops intake, the in-flight
//!   message completes, channel and connection close cleanly
//!
//! # Example
//!
//! ```rust,ignore
//! use amqp_worker::{connect, AmqpWorker, BrokerConfig};
//! use messaging::WorkerConfig;
//!
//! let broker = BrokerConfig::new("localhost", 5672);
//! let connection = connect(&broker).await?;
//!
//! let config = WorkerConfig::new("orders.created");
//! let worker = AmqpWorker::new(&connection, handler, config).await?;
//! worker.run(shutdown_rx).await?;
//! ```

mod connection;
mod error;
mod metrics;
mod retry;
mod worker;

pub use connection::{connect, declare_queue, BrokerConfig};
pub use error::AmqpError;
pub use metrics::WorkerMetrics;
pub use retry::{retry_fixed, RetriesExhausted};
pub use worker::AmqpWorker;

// Re-export from messaging
pub use messaging::{Disposition, Handler, RequeuePolicy, WorkerConfig};
