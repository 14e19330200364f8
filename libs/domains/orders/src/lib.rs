//! Order processing domain.
//!
//! The [`OrderProcessor`] is the worker's message handler: it decodes an
//! [`OrderEvent`] from the raw queue payload, simulates the payment
//! authorization step, and hands the event to the [`ConfirmationSender`]
//! when notifications are enabled.
//!
//! Failure boundaries:
//! - undecodable payloads and workflow failures become a `Requeue`
//!   disposition, never a crash
//! - confirmation email failures are absorbed inside the sender and can
//!   never change the disposition of the order message

pub mod models;
pub mod notify;
pub mod processor;

pub use models::{LineItem, OpaqueId, OrderEvent};
pub use notify::{ConfirmationSender, SendOutcome};
pub use processor::OrderProcessor;
