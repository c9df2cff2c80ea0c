//! Error categories surfaced by queue implementations.
//!
//! The names are part of the public contract: callers branch on
//! [`SimpleError::name`](packrat_core::SimpleError) after a failure crosses a
//! boundary, so every backend must use the same constants.

use packrat_core::SimpleError;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

/// A connection to the backing store could not be established.
pub const ERROR_NAME_QUEUE_CONNECT: &str = "QueueConnectFailure";

/// The given message cannot be represented in the JSON data model.
pub const ERROR_NAME_MESSAGE_NOT_SERIALIZABLE: &str = "MessageNotSerializable";

/// The backing store rejected an insert.
pub const ERROR_NAME_SEND_FAILURE: &str = "SendFailure";

/// The backing store rejected a claim.
pub const ERROR_NAME_RECEIVE_FAILURE: &str = "ReceiveFailure";

/// Connect-category error wrapping the underlying fault.
pub(crate) fn connect_error(message: &str, cause: SimpleError) -> SimpleError {
    SimpleError::new(ERROR_NAME_QUEUE_CONNECT, message).with_cause(cause)
}

/// Send-category error wrapping the underlying fault. Storage faults are
/// transient from the producer's point of view, so these are retryable.
pub(crate) fn send_error(cause: SimpleError) -> SimpleError {
    SimpleError::new(ERROR_NAME_SEND_FAILURE, "unable to send message")
        .retryable()
        .with_cause(cause)
}

/// Receive-category error wrapping the underlying fault.
pub(crate) fn receive_error(cause: SimpleError) -> SimpleError {
    SimpleError::new(ERROR_NAME_RECEIVE_FAILURE, "unable to get new message").with_cause(cause)
}
