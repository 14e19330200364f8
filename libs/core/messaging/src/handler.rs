//! Handler trait for message processing.

use crate::disposition::Disposition;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Message handler trait.
///
/// Implement this trait to define how a raw message body is processed. The
/// handler is backend-agnostic: it sees bytes in and reports a
/// [`Disposition`] out.
///
/// # Error handling
///
/// `handle` is infallible by construction. A handler converts every
/// failure into the returned disposition:
/// - recoverable per-message failures (decode errors, workflow errors)
///   become [`Disposition::Requeue`]
/// - side effects the handler has decided are non-fatal (e.g. a
///   notification that may be dropped) are absorbed and logged internally,
///   and the message is still acknowledged
///
/// The consumption loop never catches panics; a handler that can fail must
/// say so through its disposition.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Process one message body and report its disposition.
    async fn handle(&self, body: &[u8]) -> Disposition;

    /// Handler name, used for logging and metrics labels.
    fn name(&self) -> &'static str;
}

/// A handler that acknowledges everything (for testing).
#[derive(Debug, Default)]
pub struct NoOpHandler {
    handled: AtomicUsize,
}

impl NoOpHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages handled so far.
    pub fn handled(&self) -> usize {
        self.handled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Handler for NoOpHandler {
    async fn handle(&self, _body: &[u8]) -> Disposition {
        self.handled.fetch_add(1, Ordering::SeqCst);
        Disposition::Ack
    }

    fn name(&self) -> &'static str {
        "noop_handler"
    }
}

/// A handler that requeues everything (for testing).
#[derive(Debug, Default)]
pub struct RequeueAllHandler {
    handled: AtomicUsize,
}

impl RequeueAllHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handled(&self) -> usize {
        self.handled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Handler for RequeueAllHandler {
    async fn handle(&self, _body: &[u8]) -> Disposition {
        self.handled.fetch_add(1, Ordering::SeqCst);
        Disposition::Requeue
    }

    fn name(&self) -> &'static str {
        "requeue_all_handler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_handler_acks() {
        let handler = NoOpHandler::new();

        let disposition = handler.handle(b"{}").await;
        assert_eq!(disposition, Disposition::Ack);
        assert_eq!(handler.handled(), 1);
        assert_eq!(handler.name(), "noop_handler");
    }

    #[tokio::test]
    async fn test_requeue_all_handler() {
        let handler = RequeueAllHandler::new();

        let disposition = handler.handle(b"whatever").await;
        assert_eq!(disposition, Disposition::Requeue);
        assert!(!disposition.is_ack());
        assert_eq!(handler.handled(), 1);
    }
}
