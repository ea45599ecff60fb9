//! Parses a candidate block and coerces each review field on its own.
//!
//! Model output is untrusted: every field is checked for the expected JSON type and
//! replaced with an explicit "absent" value on mismatch. One bad field never
//! discards the others.

use serde_json::{Map, Value};

use crate::review::models::{FeedbackFields, ValidationOutcome};

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 100.0;

/// Parses `candidate_text` as a JSON object and coerces its fields.
///
/// A candidate that is not JSON, or is JSON but not an object, yields
/// `parsed: None`. That is a normal outcome, not an error.
pub fn validate_candidate(candidate_text: &str) -> ValidationOutcome {
    let parsed = match serde_json::from_str::<Value>(candidate_text) {
        Ok(Value::Object(record)) => Some(coerce_fields(&record)),
        Ok(_) | Err(_) => None,
    };

    ValidationOutcome { parsed }
}

fn coerce_fields(record: &Map<String, Value>) -> FeedbackFields {
    FeedbackFields {
        score: record.get("score").and_then(coerce_score),
        summary: record.get("summary").and_then(coerce_summary),
        feedback_items: record
            .get("feedback")
            .map(coerce_feedback_items)
            .unwrap_or_default(),
    }
}

/// Numbers only: rounded to the nearest integer, then clamped to 0..=100.
///
/// The number is read from its literal text, so magnitudes beyond `f64` (e.g. `1e999`)
/// saturate to the nearest bound instead of being rejected.
fn coerce_score(value: &Value) -> Option<u8> {
    let Value::Number(number) = value else {
        return None;
    };
    let n = number.to_string().parse::<f64>().ok()?;
    Some(n.round().clamp(SCORE_MIN, SCORE_MAX) as u8)
}

fn coerce_summary(value: &Value) -> Option<String> {
    value.as_str().map(String::from)
}

/// Arrays only. A bare string is not wrapped into a one-item list.
fn coerce_feedback_items(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
