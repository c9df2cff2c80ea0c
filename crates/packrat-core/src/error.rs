//! Serializable error descriptor and result alias.
//!
//! [`SimpleError`] deliberately carries no behavior beyond `Display` and
//! `source`: it is a plain record that can be serialized, relayed, and
//! deserialized without losing the failure's identity. Boundaries that
//! sanitize thrown values (spawned tasks, process hops, structured logs)
//! therefore cannot strip anything the caller needs to branch on.

use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

/// Standard result type for all Packrat operations.
pub type Result<T> = std::result::Result<T, SimpleError>;

/// JSON object value, the data model for queue messages and error context.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Name assigned to descriptors created without an explicit category.
pub const DEFAULT_ERROR_NAME: &str = "SimpleError";

/// Name assigned to descriptors representing broken internal invariants.
pub const BUG_ERROR_NAME: &str = "Bug";

/// Plain, fully serializable error descriptor.
///
/// The `message` must be a static description of the failure; dynamic values
/// belong in `context` so identical failures remain comparable in logs.
///
/// Three independent flags qualify how callers may react:
/// - `retryable` - the operation that produced the error may be retried
/// - `overloaded` - the error came from resource exhaustion and must never be
///   retried, even when also marked retryable
/// - `remote` - the error originated on the far side of a process boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{name}: {message}")]
pub struct SimpleError {
    /// Error category, one of the workspace's published name constants.
    pub name: String,

    /// Static description of the failure.
    pub message: String,

    /// Captured backtrace text from the construction site.
    #[serde(default)]
    pub stack: String,

    /// The descriptor this one was created in response to, if any.
    #[source]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<SimpleError>>,

    /// Dynamic values specific to this instance of the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<JsonObject>,

    /// The failed operation may be retried.
    #[serde(default)]
    pub retryable: bool,

    /// Resource exhaustion; must never be retried.
    #[serde(default)]
    pub overloaded: bool,

    /// Raised on the other side of a process boundary.
    #[serde(default)]
    pub remote: bool,
}

impl SimpleError {
    /// Create a new descriptor with the given category and static message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: Backtrace::force_capture().to_string(),
            cause: None,
            context: None,
            retryable: false,
            overloaded: false,
            remote: false,
        }
    }

    /// Create a descriptor for a broken internal invariant.
    ///
    /// Fixes the category to [`BUG_ERROR_NAME`] and prefixes the message so
    /// programmer errors stand out from operational failures in logs and
    /// traces.
    pub fn bug(message: impl Into<String>) -> Self {
        Self::new(BUG_ERROR_NAME, format!("BUG: {}", message.into()))
    }

    /// Normalize any error value into descriptor form.
    ///
    /// A value that already is a [`SimpleError`] passes through unchanged;
    /// anything else is wrapped with its `Display` text as the message and
    /// its `source()` chain recursively normalized into `cause`.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        if let Some(simple) = err.downcast_ref::<SimpleError>() {
            return simple.clone();
        }

        let mut simple = Self::new(DEFAULT_ERROR_NAME, err.to_string());
        if let Some(source) = err.source() {
            simple.cause = Some(Box::new(Self::from_error(source)));
        }
        simple
    }

    /// Attach the descriptor this one was created in response to.
    pub fn with_cause(mut self, cause: SimpleError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Attach instance-specific values.
    pub fn with_context(mut self, context: JsonObject) -> Self {
        self.context = Some(context);
        self
    }

    /// Mark the failed operation as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    /// Mark the failure as resource exhaustion.
    pub fn overloaded(mut self) -> Self {
        self.overloaded = true;
        self
    }

    /// Mark the failure as having crossed a process boundary.
    pub fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    /// Walk the cause chain to the originating descriptor.
    pub fn root_cause(&self) -> &SimpleError {
        let mut current = self;
        while let Some(cause) = current.cause.as_deref() {
            current = cause;
        }
        current
    }
}
