//! Conformance checks for [`Queue`] backends.
//!
//! Any implementation of the contract must pass these properties. They are
//! exposed publicly so downstream crates providing their own backend (a
//! hosted broker, say) can run the same checks from their test suite:
//!
//! ```rust,no_run
//! # async fn demo() {
//! use std::sync::Arc;
//! use packrat_queue::{conformance, MemoryQueue, Queue};
//!
//! let queue: Arc<dyn Queue> = Arc::new(MemoryQueue::new());
//! conformance::check_conformance(queue).await;
//! # }
//! ```
//!
//! The checks panic on violation, matching the assertion style of the test
//! suites they run inside.

use rand::distr::Alphanumeric;
use rand::Rng;
use std::sync::Arc;

use packrat_core::JsonObject;

use crate::Queue;

fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a message with randomized keys and a mix of value shapes.
pub fn random_message() -> JsonObject {
    let mut rng = rand::rng();
    let mut message = JsonObject::new();
    message.insert(
        random_string(12),
        serde_json::Value::String(random_string(24)),
    );
    message.insert(
        random_string(12),
        serde_json::json!([random_string(8), random_string(8), random_string(8)]),
    );
    message.insert(
        random_string(12),
        serde_json::json!(rng.random_range(-1_000_000i64..1_000_000i64)),
    );
    message.insert(random_string(12), serde_json::json!(rng.random::<bool>()));
    message
}

/// Canonical form for multiset comparison. The message data model has a
/// deterministic encoding (sorted keys), so equal messages encode equally.
fn canonical(message: &JsonObject) -> String {
    serde_json::to_string(message).expect("json object must serialize")
}

/// The queue can be connected and disconnected, in any order, repeatedly.
pub async fn check_lifecycle(queue: &dyn Queue) {
    queue
        .disconnect()
        .await
        .expect("disconnect before connect must be a no-op success");
    queue.connect().await.expect("connect must succeed");
    queue
        .connect()
        .await
        .expect("connect while connected must succeed");
    queue.disconnect().await.expect("disconnect must succeed");
    queue
        .disconnect()
        .await
        .expect("disconnect must be idempotent");
}

/// A receive immediately following a single send on an empty queue returns a
/// value deeply equal to the message sent.
pub async fn check_sequential_round_trip(queue: &dyn Queue) {
    queue.connect().await.expect("connect must succeed");

    for _ in 0..25 {
        let message = random_message();
        queue.send(&message).await.expect("send must succeed");

        let received = queue.receive().await.expect("receive must succeed");
        assert_eq!(received, message, "claimed message must round-trip");
    }
}

/// For N concurrent sends of N distinct messages followed by N concurrent
/// receives, the received multiset equals the sent multiset; no message is
/// claimed twice.
pub async fn check_concurrent_exactly_once(queue: Arc<dyn Queue>) {
    queue.connect().await.expect("connect must succeed");

    for _ in 0..10 {
        let messages: Vec<JsonObject> = (0..5).map(|_| random_message()).collect();

        let sends: Vec<_> = messages
            .iter()
            .cloned()
            .map(|message| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move { queue.send(&message).await })
            })
            .collect();
        for send in sends {
            send.await
                .expect("send task must not panic")
                .expect("concurrent send must succeed");
        }

        let receives: Vec<_> = (0..messages.len())
            .map(|_| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move { queue.receive().await })
            })
            .collect();
        let mut received = Vec::new();
        for receive in receives {
            received.push(
                receive
                    .await
                    .expect("receive task must not panic")
                    .expect("concurrent receive must succeed"),
            );
        }

        let mut sent: Vec<String> = messages.iter().map(canonical).collect();
        let mut claimed: Vec<String> = received.iter().map(canonical).collect();
        sent.sort();
        claimed.sort();
        assert_eq!(claimed, sent, "received multiset must equal sent multiset");
    }
}

/// Run every conformance check against a fresh backend.
pub async fn check_conformance(queue: Arc<dyn Queue>) {
    check_lifecycle(queue.as_ref()).await;
    check_sequential_round_trip(queue.as_ref()).await;
    check_concurrent_exactly_once(queue).await;
}
