use crate::llm_client::ModelCompletion;
use crate::review::models::{ValidatedFeedback, ValidationOutcome};

/// Merges validated fields with the untouched completion.
///
/// `raw_text` is copied from the completion unconditionally.
pub fn assemble(completion: &ModelCompletion, outcome: ValidationOutcome) -> ValidatedFeedback {
    let fields = outcome.parsed.unwrap_or_default();

    ValidatedFeedback {
        score: fields.score,
        summary: fields.summary,
        feedback_items: fields.feedback_items,
        raw_text: completion.raw_text.clone(),
    }
}
