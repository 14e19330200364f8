//! Backend-agnostic contracts for reliable message consumption.
//!
//! This library defines the boundary between a queue backend (the crate
//! driving the broker connection) and the application code that processes
//! message payloads:
//!
//! - [`Handler`]: how a raw message body is turned into a [`Disposition`]
//! - [`Disposition`]: the typed acknowledge/requeue outcome of handling
//! - [`RequeuePolicy`]: what a requeue request means for a delivery the
//!   broker has already redelivered
//! - [`WorkerConfig`]: queue name, prefetch limit, and policy knobs
//!
//! The handler contract is deliberately infallible: every failure mode is
//! expressed in the returned disposition, so the consumption loop never has
//! to unwind across the handler boundary.
//!
//! # Example
//!
//! ```rust,ignore
//! use messaging::{Disposition, Handler, WorkerConfig};
//!
//! struct OrderHandler { /* ... */ }
//!
//! #[async_trait]
//! impl Handler for OrderHandler {
//!     async fn handle(&self, body: &[u8]) -> Disposition {
//!         match serde_json::from_slice::<OrderEvent>(body) {
//!             Ok(event) => { /* process */ Disposition::Ack }
//!             Err(_) => Disposition::Requeue,
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "order_handler"
//!     }
//! }
//!
//! let config = WorkerConfig::new("orders.created");
//! ```

mod config;
mod disposition;
mod handler;

pub use config::WorkerConfig;
pub use disposition::{Disposition, PolicyParseError, RequeuePolicy};
pub use handler::{Handler, NoOpHandler, RequeueAllHandler};
