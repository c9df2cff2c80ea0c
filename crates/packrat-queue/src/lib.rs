//! # Packrat Queue
//!
//! Durable FIFO work queue decoupling the intake path from downstream
//! processing. Producers enqueue JSON messages; a consumer claims each message
//! exactly once.
//!
//! This library provides:
//! - [`Queue`] - the capability contract every backend implements
//! - [`LocalQueue`] - the SQLite-backed reference implementation
//! - [`MemoryQueue`] - an in-process double for consumers' tests
//! - [`conformance`] - property checks any backend must pass
//!
//! Consumers depend only on the [`Queue`] trait, never a concrete backend, so
//! the persistent store can be swapped for a hosted broker without touching
//! the call sites.

use async_trait::async_trait;
use packrat_core::{JsonObject, Result};

// Module declarations
pub mod conformance;
pub mod error;
pub mod local;
pub mod memory;
pub mod message;

// Re-export commonly used types at crate root for convenience
pub use error::{
    ERROR_NAME_MESSAGE_NOT_SERIALIZABLE, ERROR_NAME_QUEUE_CONNECT, ERROR_NAME_RECEIVE_FAILURE,
    ERROR_NAME_SEND_FAILURE,
};
pub use local::{LocalQueue, LocalQueueConfig, IN_MEMORY_TARGET};
pub use memory::MemoryQueue;
pub use message::{decode_message, encode_message};

/// Capability contract for a FIFO work queue.
///
/// Each message is a JSON object owned by the queue from `send` until a single
/// `receive` claims it. Implementations are safe to share across tasks.
///
/// Dropping a queue value releases whatever backing resource it holds, so a
/// scope that uses a queue never needs a manual cleanup call on its exit
/// paths; `disconnect` exists for callers that want to release early or
/// observe teardown failures.
#[async_trait]
pub trait Queue: Send + Sync {
    /// Initiate a connection to the backing resource.
    ///
    /// May be a no-op depending on the implementation, and is safe to call
    /// repeatedly; an established connection is left untouched.
    async fn connect(&self) -> Result<()>;

    /// Shut down the connection to the backing resource.
    ///
    /// A no-op success if never connected; valid from any state.
    async fn disconnect(&self) -> Result<()>;

    /// Append a message to the tail of the queue.
    ///
    /// Connects first if needed. A message that cannot be encoded is rejected
    /// with [`ERROR_NAME_MESSAGE_NOT_SERIALIZABLE`] and nothing is stored.
    async fn send(&self, message: &JsonObject) -> Result<()>;

    /// Claim the oldest message, suspending until one is available.
    ///
    /// Connects first if needed. The claim atomically removes the message; it
    /// will not be returned to any other caller. There is no built-in
    /// deadline - callers wanting one layer `tokio::time::timeout` on top,
    /// understanding that abandoning the wait claims nothing.
    async fn receive(&self) -> Result<JsonObject>;
}
