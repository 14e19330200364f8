//! Error types for AMQP worker operations.

use thiserror::Error;

/// Error that can occur in AMQP worker operations.
#[derive(Debug, Error)]
pub enum AmqpError {
    /// Broker protocol or transport error
    #[error("AMQP error: {0}")]
    Broker(#[from] lapin::Error),

    /// Connection retries exhausted
    #[error("broker unreachable after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: lapin::Error },

    /// Queue exists with conflicting parameters
    #[error("queue '{queue}' exists with conflicting parameters: {detail}")]
    QueueConflict { queue: String, detail: String },

    /// Consumer stream error
    #[error("consumer error: {0}")]
    Consumer(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl AmqpError {
    /// Classify a declaration failure.
    ///
    /// The broker signals a parameter mismatch against an existing queue by
    /// closing the channel with a precondition failure; anything else is a
    /// plain broker error.
    pub fn from_declare_error(queue: &str, error: lapin::Error) -> Self {
        let detail = error.to_string();
        if detail.contains("PRECONDITION") {
            AmqpError::QueueConflict {
                queue: queue.to_string(),
                detail,
            }
        } else {
            AmqpError::Broker(error)
        }
    }

    /// Whether this error is terminal for the worker process.
    ///
    /// Terminal errors mean the operator has to intervene (broker down past
    /// the retry budget, or a queue declared with different parameters);
    /// the process should log and exit rather than loop.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AmqpError::RetriesExhausted { .. }
                | AmqpError::QueueConflict { .. }
                | AmqpError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let exhausted = AmqpError::RetriesExhausted {
            attempts: 20,
            last: lapin::Error::InvalidConnectionState(lapin::ConnectionState::Closed),
        };
        assert!(exhausted.is_fatal());

        let conflict = AmqpError::QueueConflict {
            queue: "orders.created".to_string(),
            detail: "PRECONDITION_FAILED".to_string(),
        };
        assert!(conflict.is_fatal());

        let consumer = AmqpError::Consumer("stream ended".to_string());
        assert!(!consumer.is_fatal());
    }

    #[test]
    fn test_declare_error_classification() {
        let err = lapin::Error::InvalidChannelState(lapin::ChannelState::Closed);
        let classified = AmqpError::from_declare_error("orders.created", err);
        assert!(matches!(classified, AmqpError::Broker(_)));
    }

    #[test]
    fn test_retries_exhausted_display() {
        let err = AmqpError::RetriesExhausted {
            attempts: 5,
            last: lapin::Error::InvalidConnectionState(lapin::ConnectionState::Closed),
        };
        let msg = err.to_string();
        assert!(msg.contains("5 attempts"));
        assert!(msg.contains("unreachable"));
    }
}
