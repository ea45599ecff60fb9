//! Locates the JSON object a model embedded in its completion.

use crate::review::models::ExtractedCandidate;

/// Returns the balanced `{ ... }` block that starts at the first opening brace.
///
/// Depth is tracked brace by brace, so prose or stray braces after the block are
/// never absorbed into it. Braces inside double-quoted strings are ignored. If there
/// is no opening brace, or the block never closes, the whole completion is returned
/// with `found == false`.
pub fn extract_candidate(raw_text: &str) -> ExtractedCandidate<'_> {
    let not_found = ExtractedCandidate {
        candidate_text: raw_text,
        found: false,
    };

    let Some(start) = raw_text.find('{') else {
        return not_found;
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw_text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return ExtractedCandidate {
                        candidate_text: &raw_text[start..end],
                        found: true,
                    };
                }
            }
            _ => {}
        }
    }

    not_found
}
