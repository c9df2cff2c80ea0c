//! In-process queue double.
//!
//! Implements the full [`Queue`] contract over a `VecDeque` of serialized
//! records. Messages pass through the same encode/decode seam as the
//! persistent backend so round-trip defects stay observable, and `receive`
//! blocks by polling at the same fixed interval.
//!
//! This backend is intended for:
//! - Unit testing of queue consumers
//! - Development and prototyping
//!
//! `disconnect` drops any buffered records; the queue is scoped to the
//! process lifetime.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;

use packrat_core::{JsonObject, Result};

use crate::message::{decode_message, encode_record};
use crate::Queue;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// In-memory FIFO queue double.
pub struct MemoryQueue {
    records: Mutex<VecDeque<String>>,
}

impl MemoryQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
        }
    }
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Queue for MemoryQueue {
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.records.lock().await.clear();
        Ok(())
    }

    async fn send(&self, message: &JsonObject) -> Result<()> {
        let record = encode_record(message)?;
        self.records.lock().await.push_back(record);
        Ok(())
    }

    async fn receive(&self) -> Result<JsonObject> {
        loop {
            let claimed = self.records.lock().await.pop_front();
            match claimed {
                Some(record) => return decode_message(&record),
                None => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }
    }
}
