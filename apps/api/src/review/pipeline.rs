//! Review pipeline: prompt → gateway → extract → validate → assemble.
//!
//! Stateless per request. The gateway call is the only await point and is always
//! bounded by `ReviewSettings::timeout`. Dropping the returned future (client
//! disconnect) drops the in-flight provider request with it.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{Config, ResponseMode};
use crate::errors::AppError;
use crate::llm_client::{ModelCompletion, ModelGateway};
use crate::review::assembler::assemble;
use crate::review::extractor::extract_candidate;
use crate::review::models::{ReviewRequest, ValidatedFeedback};
use crate::review::prompts::build_review_prompt;
use crate::review::validator::validate_candidate;

/// Per-deployment review policy, copied out of `Config` at startup.
#[derive(Debug, Clone)]
pub struct ReviewSettings {
    pub mode: ResponseMode,
    pub min_text_length: usize,
    pub timeout: Duration,
}

impl From<&Config> for ReviewSettings {
    fn from(config: &Config) -> Self {
        Self {
            mode: config.mode,
            min_text_length: config.min_text_length,
            timeout: config.llm_timeout,
        }
    }
}

/// Turns a raw completion into the review contract. Never fails.
///
/// A prose completion is only worth a warning when JSON was asked for.
pub fn normalize_completion(completion: &ModelCompletion, mode: ResponseMode) -> ValidatedFeedback {
    let candidate = extract_candidate(&completion.raw_text);
    let outcome = validate_candidate(candidate.candidate_text);

    if outcome.parse_failed() {
        let chars = completion.raw_text.chars().count();
        match mode {
            ResponseMode::Structured => warn!(
                block_found = candidate.found,
                chars,
                "Completion did not contain a parseable JSON object; returning raw text only"
            ),
            ResponseMode::Unstructured => debug!(
                block_found = candidate.found,
                chars,
                "Prose completion in unstructured mode"
            ),
        }
    }

    assemble(completion, outcome)
}

/// Label for the completion log line. Raw text is the expected result in unstructured mode.
fn outcome_label(mode: ResponseMode, feedback: &ValidatedFeedback) -> &'static str {
    match mode {
        ResponseMode::Unstructured => "unstructured",
        ResponseMode::Structured if feedback.is_degraded() => "degraded",
        ResponseMode::Structured => "structured",
    }
}

/// Runs one review against `gateway`. Called exactly once per request: there is no retry.
pub async fn review_cv(
    request: &ReviewRequest,
    gateway: &dyn ModelGateway,
    settings: &ReviewSettings,
) -> Result<ValidatedFeedback, AppError> {
    let provider = gateway.provider();
    let prompt = build_review_prompt(request.text(), settings.mode);

    let completion = tokio::time::timeout(settings.timeout, gateway.complete(&prompt))
        .await
        .map_err(|_| AppError::UpstreamUnavailable {
            provider,
            reason: format!(
                "no completion within {}s",
                settings.timeout.as_secs_f32()
            ),
        })?
        .map_err(|e| AppError::from_gateway(provider, e))?;

    let feedback = normalize_completion(&completion, settings.mode);
    let outcome = outcome_label(settings.mode, &feedback);

    info!(
        provider,
        text_chars = request.text().chars().count(),
        outcome,
        score = ?feedback.score,
        "CV review completed"
    );

    Ok(feedback)
}
