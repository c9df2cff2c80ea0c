//! Message encoding between caller structures and stored records.
//!
//! A stored record is the exact JSON text of the caller's message and must
//! round-trip losslessly. Encoding failures are caller-input errors; decoding
//! failures are bugs, because only validated encodings are ever stored.

use packrat_core::{JsonObject, Result, SimpleError};
use serde::Serialize;

use crate::error::ERROR_NAME_MESSAGE_NOT_SERIALIZABLE;

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// Normalize an arbitrary structure into the queue's message data model.
///
/// This is the entry point for caller types: anything `Serialize` that maps
/// onto a JSON object can be enqueued. Values outside the data model - maps
/// with non-string keys, types whose serializer reports a failure, values
/// that are not objects at the top level - are rejected with
/// [`ERROR_NAME_MESSAGE_NOT_SERIALIZABLE`] before anything touches storage.
pub fn encode_message<T: Serialize>(value: &T) -> Result<JsonObject> {
    let encoded = serde_json::to_value(value).map_err(|e| {
        SimpleError::new(
            ERROR_NAME_MESSAGE_NOT_SERIALIZABLE,
            "message must be valid json",
        )
        .with_cause(SimpleError::from_error(&e))
    })?;

    match encoded {
        serde_json::Value::Object(object) => Ok(object),
        other => Err(SimpleError::new(
            ERROR_NAME_MESSAGE_NOT_SERIALIZABLE,
            "message must be a json object",
        )
        .with_context([("encoded".to_string(), other)].into_iter().collect())),
    }
}

/// Serialize a message into its stored-record text.
///
/// `JsonObject` is encodable by construction, so a failure here means the
/// serializer itself faulted; the error still uses the caller-input category
/// so backends whose encoding can genuinely fail share one mapping.
pub(crate) fn encode_record(message: &JsonObject) -> Result<String> {
    serde_json::to_string(message).map_err(|e| {
        SimpleError::new(
            ERROR_NAME_MESSAGE_NOT_SERIALIZABLE,
            "message must be valid json",
        )
        .with_cause(SimpleError::from_error(&e))
    })
}

/// Decode a claimed record back into the message structure.
///
/// Only validated encodings are ever stored, so a record that fails to decode
/// signals a broken invariant, not bad input. The raw text rides along in the
/// context for triage.
pub fn decode_message(record: &str) -> Result<JsonObject> {
    serde_json::from_str(record).map_err(|e| {
        SimpleError::bug("received message is not valid json")
            .with_cause(SimpleError::from_error(&e))
            .with_context(
                [(
                    "received".to_string(),
                    serde_json::Value::String(record.to_string()),
                )]
                .into_iter()
                .collect(),
            )
    })
}
