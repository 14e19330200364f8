//! Typed message dispositions and requeue policy.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Outcome of handling a single delivery.
///
/// Returned structurally by the [`Handler`](crate::Handler) so the
/// ack/requeue decision is a value, not an unwinding error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The message is permanently consumed.
    Ack,
    /// Handling failed; the message should go back to the queue for
    /// redelivery, subject to the worker's [`RequeuePolicy`].
    Requeue,
}

impl Disposition {
    pub fn is_ack(&self) -> bool {
        matches!(self, Disposition::Ack)
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Ack => write!(f, "ack"),
            Disposition::Requeue => write!(f, "requeue"),
        }
    }
}

/// Policy applied when a handler requests a requeue.
///
/// AMQP classic queues expose only a boolean redelivered flag, not a
/// delivery count, so the poison-message stance is a two-valued choice
/// rather than a numeric cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequeuePolicy {
    /// Requeue every failed delivery. A permanently malformed message will
    /// redeliver indefinitely.
    #[default]
    Always,
    /// Requeue a first failure; reject a failed delivery the broker has
    /// already redelivered, without requeueing it. A dead-letter exchange
    /// configured on the queue will catch the rejection.
    RejectRedelivered,
}

impl RequeuePolicy {
    /// Decide whether a failed delivery goes back to the queue.
    pub fn should_requeue(&self, redelivered: bool) -> bool {
        match self {
            RequeuePolicy::Always => true,
            RequeuePolicy::RejectRedelivered => !redelivered,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown requeue policy '{0}', expected 'always' or 'reject-redelivered'")]
pub struct PolicyParseError(String);

impl FromStr for RequeuePolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Ok(RequeuePolicy::Always),
            "reject-redelivered" | "reject_redelivered" => Ok(RequeuePolicy::RejectRedelivered),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

impl fmt::Display for RequeuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequeuePolicy::Always => write!(f, "always"),
            RequeuePolicy::RejectRedelivered => write!(f, "reject-redelivered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_requeues_redelivered_failures() {
        let policy = RequeuePolicy::Always;
        assert!(policy.should_requeue(false));
        assert!(policy.should_requeue(true));
    }

    #[test]
    fn test_reject_redelivered_drops_second_failure() {
        let policy = RequeuePolicy::RejectRedelivered;
        assert!(policy.should_requeue(false));
        assert!(!policy.should_requeue(true));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "always".parse::<RequeuePolicy>().unwrap(),
            RequeuePolicy::Always
        );
        assert_eq!(
            "reject-redelivered".parse::<RequeuePolicy>().unwrap(),
            RequeuePolicy::RejectRedelivered
        );
        assert_eq!(
            "REJECT_REDELIVERED".parse::<RequeuePolicy>().unwrap(),
            RequeuePolicy::RejectRedelivered
        );
        assert!("sometimes".parse::<RequeuePolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for policy in [RequeuePolicy::Always, RequeuePolicy::RejectRedelivered] {
            assert_eq!(policy.to_string().parse::<RequeuePolicy>().unwrap(), policy);
        }
    }
}
