//! Tests for the dispatcher entry point.

use super::*;
use async_trait::async_trait;
use packrat_queue::{MemoryQueue, ERROR_NAME_SEND_FAILURE};
use std::time::Duration;
use tokio::time::timeout;

fn sample_message() -> JsonObject {
    [(
        "url".to_string(),
        serde_json::Value::String("https://example.com/post/1".to_string()),
    )]
    .into_iter()
    .collect()
}

fn fast_dispatcher(queue: Arc<dyn Queue>) -> Dispatcher {
    Dispatcher::with_policy(
        queue,
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(5),
        },
    )
}

/// Queue double whose send always reports a storage fault.
struct BrokenQueue;

#[async_trait]
impl Queue for BrokenQueue {
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }

    async fn send(&self, _message: &JsonObject) -> Result<()> {
        Err(SimpleError::new(ERROR_NAME_SEND_FAILURE, "unable to send message").retryable())
    }

    async fn receive(&self) -> Result<JsonObject> {
        Err(SimpleError::bug("receive is not part of this double"))
    }
}

#[tokio::test]
async fn test_accepted_input_is_published_unchanged() {
    let queue = Arc::new(MemoryQueue::new());
    let dispatcher = fast_dispatcher(queue.clone());
    let message = sample_message();

    dispatcher
        .dispatch(
            &message,
            &IntakeDecision::Accept {
                label: Some("text/html".to_string()),
            },
        )
        .await
        .expect("accepted input should be committed");

    let received = queue.receive().await.expect("receive");
    assert_eq!(received, message);
}

#[tokio::test]
async fn test_rejected_input_never_touches_the_queue() {
    let queue = Arc::new(MemoryQueue::new());
    let dispatcher = fast_dispatcher(queue.clone());

    let err = dispatcher
        .dispatch(&sample_message(), &IntakeDecision::Reject)
        .await
        .expect_err("rejected input must surface a client-class error");
    assert_eq!(err.name, ERROR_NAME_CONTENT_REJECTED);

    assert!(
        timeout(Duration::from_millis(150), queue.receive())
            .await
            .is_err(),
        "nothing may be enqueued for rejected input"
    );
}

#[tokio::test]
async fn test_exhausted_retries_surface_as_terminal_failure() {
    let dispatcher = fast_dispatcher(Arc::new(BrokenQueue));

    let err = dispatcher
        .dispatch(&sample_message(), &IntakeDecision::Accept { label: None })
        .await
        .expect_err("publish should exhaust its budget");

    assert_eq!(err.name, ERROR_NAME_PUBLISH_FAILURE);
    assert_eq!(
        err.cause.as_deref().map(|c| c.name.as_str()),
        Some(ERROR_NAME_SEND_FAILURE)
    );
}

#[test]
fn test_decision_survives_a_json_round_trip() {
    let decision = IntakeDecision::Accept {
        label: Some("text/html".to_string()),
    };

    let encoded = serde_json::to_string(&decision).expect("serialize");
    let decoded: IntakeDecision = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, decision);
}
