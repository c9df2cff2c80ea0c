//! Tests for message encoding and decoding.

use super::*;
use packrat_core::BUG_ERROR_NAME;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
struct FetchRequest {
    url: String,
    content_type: String,
}

#[test]
fn test_encode_struct_round_trips() {
    let request = FetchRequest {
        url: "https://example.com/post/1".to_string(),
        content_type: "text/html".to_string(),
    };

    let message = encode_message(&request).expect("struct should encode");
    let record = encode_record(&message).expect("object should serialize");
    let decoded = decode_message(&record).expect("stored record should decode");

    assert_eq!(decoded, message);
    assert_eq!(
        decoded.get("url").and_then(|v| v.as_str()),
        Some("https://example.com/post/1")
    );
}

#[test]
fn test_encode_rejects_non_string_keys() {
    let mut bad = HashMap::new();
    bad.insert(vec![1u8, 2u8], "value");

    let err = encode_message(&bad).expect_err("non-string keys are outside the data model");
    assert_eq!(err.name, ERROR_NAME_MESSAGE_NOT_SERIALIZABLE);
    assert!(err.cause.is_some());
}

#[test]
fn test_encode_rejects_non_object_top_level() {
    let err = encode_message(&42u32).expect_err("top level must be an object");
    assert_eq!(err.name, ERROR_NAME_MESSAGE_NOT_SERIALIZABLE);
}

#[test]
fn test_decode_failure_is_a_bug() {
    let err = decode_message("not json at all").expect_err("garbage must not decode");

    assert_eq!(err.name, BUG_ERROR_NAME);
    let context = err.context.expect("raw text should ride along");
    assert_eq!(
        context.get("received").and_then(|v| v.as_str()),
        Some("not json at all")
    );
}
