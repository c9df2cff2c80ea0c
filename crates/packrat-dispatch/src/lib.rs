//! # Packrat Dispatch
//!
//! Producer-side intake: the sole entry point for committing validated work
//! to the queue.
//!
//! The intake path upstream (HTTP routing, the content-classification rule
//! chain) is out of scope here; its verdict arrives as an opaque
//! [`IntakeDecision`]. Rejected input is turned away immediately without
//! touching the queue. Accepted input is published through the bounded-retry
//! wrapper in [`retry`], so a transiently failing backing store does not
//! bubble straight into a dropped unit of work.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use packrat_core::{JsonObject, Result, SimpleError};
use packrat_queue::Queue;

// Module declarations
pub mod retry;

// Re-export commonly used types at crate root for convenience
pub use retry::{send_with_retry, RetryPolicy, ERROR_NAME_PUBLISH_FAILURE};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The input was judged ineligible for enqueueing. Maps to a client-error
/// response at the ingress layer.
pub const ERROR_NAME_CONTENT_REJECTED: &str = "ContentRejected";

/// Verdict of the upstream classification rule chain about one unit of
/// input. The chain itself is an external collaborator; only its decision
/// crosses into this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntakeDecision {
    /// The input is eligible, optionally tagged with a classification label.
    Accept { label: Option<String> },

    /// The input is not eligible for enqueueing.
    Reject,
}

/// Producer-side entry point for committing work to the queue.
pub struct Dispatcher {
    queue: Arc<dyn Queue>,
    policy: RetryPolicy,
}

impl Dispatcher {
    /// Create a dispatcher over the given queue with the default retry
    /// policy.
    pub fn new(queue: Arc<dyn Queue>) -> Self {
        Self::with_policy(queue, RetryPolicy::default())
    }

    /// Create a dispatcher with a custom retry policy.
    pub fn with_policy(queue: Arc<dyn Queue>, policy: RetryPolicy) -> Self {
        Self { queue, policy }
    }

    /// Commit one unit of work according to the classifier's decision.
    ///
    /// Rejected input returns [`ERROR_NAME_CONTENT_REJECTED`] without any
    /// queue interaction. Accepted input is published with bounded retry;
    /// exhaustion surfaces as [`ERROR_NAME_PUBLISH_FAILURE`] carrying the
    /// last underlying error as cause, which the ingress layer maps to a
    /// server-error response.
    pub async fn dispatch(&self, message: &JsonObject, decision: &IntakeDecision) -> Result<()> {
        let label = match decision {
            IntakeDecision::Reject => {
                return Err(SimpleError::new(
                    ERROR_NAME_CONTENT_REJECTED,
                    "input is not eligible for enqueueing",
                ));
            }
            IntakeDecision::Accept { label } => label.as_deref().unwrap_or("unlabeled"),
        };

        debug!(label, "accepted input for publication");
        send_with_retry(self.queue.as_ref(), &self.policy, message).await
    }
}
