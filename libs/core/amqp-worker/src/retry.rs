//! Fixed-delay retry for broker connection establishment.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Terminal result of a retry loop: the last error plus how many attempts
/// were made in total.
#[derive(Debug)]
pub struct RetriesExhausted<E> {
    pub attempts: u32,
    pub last: E,
}

/// Retry an async operation with a fixed delay between attempts.
///
/// Runs `operation` up to `max_attempts` times, sleeping `delay` after each
/// failure. Returns the first success, or [`RetriesExhausted`] carrying the
/// final error once the budget is spent.
///
/// # Example
/// ```ignore
/// let connection = retry_fixed(
///     || async { Connection::connect(&uri, props.clone()).await },
///     20,
///     Duration::from_secs(5),
/// ).await?;
/// ```
pub async fn retry_fixed<F, Fut, T, E>(
    mut operation: F,
    max_attempts: u32,
    delay: Duration,
) -> Result<T, RetriesExhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retrying");
                }
                return Ok(result);
            }
            Err(e) => {
                if attempt >= max_attempts {
                    warn!(attempt, max_attempts, error = %e, "Retry budget exhausted");
                    return Err(RetriesExhausted { attempts: attempt, last: e });
                }

                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, retrying"
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}
