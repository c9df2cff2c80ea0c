//! Bounded-retry publish for the producer path.
//!
//! Deliberately simpler than a backoff policy: a fixed delay between
//! attempts, no exponential growth, no jitter. The producer path has exactly
//! one slow collaborator (the local backing store), so the effective timeout
//! stays a predictable `max_attempts x (store latency + delay)`.

use std::time::Duration;
use tracing::{debug, warn};

use packrat_core::{JsonObject, Result, SimpleError};
use packrat_queue::Queue;

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;

/// The message could not be published within the attempt budget.
pub const ERROR_NAME_PUBLISH_FAILURE: &str = "PublishFailure";

/// Retry policy for publishing into the queue.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget, first try included.
    pub max_attempts: u32,

    /// Fixed delay between failed attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(500),
        }
    }
}

/// Publish a message, retrying failed sends up to the policy's budget.
///
/// Each failed attempt is logged with the error, the payload, and the
/// 1-based attempt number. A success is logged once at debug level and stops
/// immediately; unused attempts are not consumed. Errors flagged as
/// overloaded abort the loop at once - retrying into resource exhaustion
/// only makes it worse.
///
/// On exhaustion the terminal [`ERROR_NAME_PUBLISH_FAILURE`] error carries
/// the last underlying error as cause and the attempt count as context.
pub async fn send_with_retry(
    queue: &dyn Queue,
    policy: &RetryPolicy,
    message: &JsonObject,
) -> Result<()> {
    let mut attempt: u32 = 0;

    let last_err = loop {
        attempt += 1;
        match queue.send(message).await {
            Ok(()) => {
                debug!(attempt, "published message to queue");
                return Ok(());
            }
            Err(err) => {
                warn!(
                    error = %err,
                    payload = %serde_json::Value::Object(message.clone()),
                    attempt,
                    "error while publishing message to queue"
                );

                if err.overloaded || attempt >= policy.max_attempts {
                    break err;
                }
                tokio::time::sleep(policy.delay).await;
            }
        }
    };

    Err(SimpleError::new(
        ERROR_NAME_PUBLISH_FAILURE,
        "unable to publish message to queue",
    )
    .with_context(
        [("attempts".to_string(), serde_json::json!(attempt))]
            .into_iter()
            .collect(),
    )
    .with_cause(last_err))
}
