//! Axum route handlers for the Review API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ResponseMode;
use crate::errors::AppError;
use crate::review::models::{ReviewRequest, ValidatedFeedback};
use crate::review::pipeline::review_cv;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// Success body. The variant is chosen by `REVIEW_MODE`, not by the completion.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReviewResponse {
    /// `{ "feedback": "<raw completion>" }`
    Unstructured { feedback: String },
    /// `{ "score", "summary", "feedback": [..], "raw" }`
    Structured(ValidatedFeedback),
}

impl ReviewResponse {
    fn render(mode: ResponseMode, feedback: ValidatedFeedback) -> Self {
        match mode {
            ResponseMode::Unstructured => ReviewResponse::Unstructured {
                feedback: feedback.raw_text,
            },
            ResponseMode::Structured => ReviewResponse::Structured(feedback),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/review
///
/// Body: `{ "text": "<CV text>" }`. A body that is not JSON, or whose `text` is not a
/// string, is treated the same as missing text (400). The provider is only called
/// once the text passes validation.
pub async fn handle_review(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ReviewResponse>, AppError> {
    let body = match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!("Rejected review body: {rejection}");
            Value::Null
        }
    };
    let text = body.get("text").and_then(Value::as_str);

    let request = ReviewRequest::validate(text, state.settings.min_text_length)?;
    let feedback = review_cv(&request, state.gateway.as_ref(), &state.settings).await?;

    Ok(Json(ReviewResponse::render(state.settings.mode, feedback)))
}
