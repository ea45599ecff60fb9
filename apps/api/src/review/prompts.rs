// Prompt templates for CV review. Replace `{cv_text}` before sending.

use crate::config::ResponseMode;

/// Asks for a scored JSON review. The model is told to emit JSON only, but the
/// pipeline does not rely on it.
pub const STRUCTURED_REVIEW_PROMPT_TEMPLATE: &str = r#"You are a helpful CV reviewer. Given the candidate's CV text below, return a JSON object with these fields:
- score: an integer 0-100 (estimate) using criteria: spelling/grammar (25%), conciseness (20%), layout/format (20%), experience impact (25%), punctuation (10%).
- summary: a suggested 1-2 sentence profile summary the candidate could use at the top of their CV.
- feedback: an array of 6 concise bullet suggestions (each 6-18 words) covering spelling/grammar, conciseness, layout, experience clarity, bullets with metrics, and final polish.
Only output valid JSON and nothing else.

CV_TEXT:
"""{cv_text}"""
"#;

/// Asks for free-text feedback in four fixed sections.
pub const UNSTRUCTURED_REVIEW_PROMPT_TEMPLATE: &str = r#"You are an expert CV reviewer. Analyse the following CV text and provide clear, concise feedback in 4 sections:
- Spelling & Grammar
- Layout & Formatting
- Clarity & Conciseness
- Experience & Skills

CV:
{cv_text}
"#;

/// Builds the instruction for `mode`, stripping code fences from the caller's text so
/// it cannot close the quoted block early.
pub fn build_review_prompt(cv_text: &str, mode: ResponseMode) -> String {
    let template = match mode {
        ResponseMode::Structured => STRUCTURED_REVIEW_PROMPT_TEMPLATE,
        ResponseMode::Unstructured => UNSTRUCTURED_REVIEW_PROMPT_TEMPLATE,
    };
    template.replace("{cv_text}", &cv_text.replace("```", ""))
}
