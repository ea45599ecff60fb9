use serde::Serialize;

use crate::errors::AppError;

/// CV text that has passed request validation.
///
/// The only constructor is `ReviewRequest::validate`, so a value of this type is
/// proof that the text is non-blank and at least the configured length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    text: String,
}

impl ReviewRequest {
    /// Checks `text` against the minimum length (counted in characters, surrounding
    /// whitespace ignored).
    pub fn validate(text: Option<&str>, min_length: usize) -> Result<Self, AppError> {
        let text = text.unwrap_or_default();
        let trimmed_len = text.trim().chars().count();

        if trimmed_len == 0 {
            return Err(AppError::InvalidRequest(
                "Provide CV text in request body.".to_string(),
            ));
        }
        if trimmed_len < min_length {
            return Err(AppError::InvalidRequest(format!(
                "Provide CV text in request body (at least {min_length} characters)."
            )));
        }

        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Substring of a completion believed to hold the structured payload.
///
/// When `found` is false, `candidate_text` is the whole completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedCandidate<'a> {
    pub candidate_text: &'a str,
    pub found: bool,
}

/// Fields recovered from a candidate that parsed as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackFields {
    /// Always within 0..=100.
    pub score: Option<u8>,
    pub summary: Option<String>,
    pub feedback_items: Vec<String>,
}

/// Validator output. `parsed` is `None` when the candidate was not a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub parsed: Option<FeedbackFields>,
}

impl ValidationOutcome {
    pub fn parse_failed(&self) -> bool {
        self.parsed.is_none()
    }
}

/// The caller-facing review contract.
///
/// `raw_text` is the completion exactly as the provider returned it, whether or not
/// any structured field could be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedFeedback {
    pub score: Option<u8>,
    pub summary: Option<String>,
    #[serde(rename = "feedback")]
    pub feedback_items: Vec<String>,
    #[serde(rename = "raw")]
    pub raw_text: String,
}

impl ValidatedFeedback {
    /// True when no structured field survived validation.
    pub fn is_degraded(&self) -> bool {
        self.score.is_none() && self.summary.is_none() && self.feedback_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_missing_text() {
        let err = ReviewRequest::validate(None, 20).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn test_validate_rejects_whitespace_only() {
        assert!(ReviewRequest::validate(Some("   \n\t  "), 0).is_err());
    }

    #[test]
    fn test_validate_rejects_text_below_minimum() {
        let err = ReviewRequest::validate(Some("Too short CV"), 20).unwrap_err();
        assert!(err.to_string().contains("at least 20 characters"));
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        // 10 characters, 20 bytes
        let text = "éééééééééé";
        assert!(ReviewRequest::validate(Some(text), 11).is_err());
        assert!(ReviewRequest::validate(Some(text), 10).is_ok());
    }

    #[test]
    fn test_validate_keeps_text_verbatim() {
        let text = "  Jane Doe\nSenior Engineer, 8 years of Rust  ";
        let request = ReviewRequest::validate(Some(text), 20).unwrap();
        assert_eq!(request.text(), text);
    }

    #[test]
    fn test_validated_feedback_serializes_contract_field_names() {
        let feedback = ValidatedFeedback {
            score: None,
            summary: Some("Strong candidate.".to_string()),
            feedback_items: vec![],
            raw_text: "{}".to_string(),
        };
        let json = serde_json::to_value(&feedback).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "score": null,
                "summary": "Strong candidate.",
                "feedback": [],
                "raw": "{}"
            })
        );
    }
}
