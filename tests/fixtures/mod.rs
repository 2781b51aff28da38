//! Provider payloads used across the relay tests

#![allow(dead_code)]

use serde_json::{json, Value};

/// Request from the documented scenario.
pub const IMAGE_ID: u64 = 42;
pub const IMAGE_URL: &str = "https://x/img.jpg";

/// Generated content as the model returns it inside the message.
pub fn generated_fields() -> Value {
    json!({
        "altText": "a",
        "legend": "b",
        "title1": "c",
        "title2": "d",
        "title3": "e"
    })
}

/// Wrap `content` in a chat-completion envelope.
pub fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

/// Completion carrying every generated field.
pub fn complete_completion() -> String {
    completion(&generated_fields().to_string())
}

/// Completion whose content lacks `key`.
pub fn completion_without(key: &str) -> String {
    let mut fields = generated_fields();
    fields.as_object_mut().unwrap().remove(key);
    completion(&fields.to_string())
}

/// Completion for a street scene with a distinct legend, for rerun tests.
pub fn street_completion(legend: &str) -> String {
    completion(
        &json!({
            "altText": "A cyclist passes under a railway bridge at dusk",
            "legend": legend,
            "title1": "Iron and Spokes",
            "title2": "Under the Viaduct",
            "title3": "Last Light Commute"
        })
        .to_string(),
    )
}
