//! Best-effort JSON recovery from free-text model replies.
//!
//! The model is told to answer with a single raw JSON object, but replies
//! sometimes arrive wrapped in prose or markdown anyway. The recovery
//! heuristic takes the inclusive substring between the first `{` and the
//! last `}` and parses that. It is intentionally not a balanced-brace
//! scanner: it assumes exactly one object and no stray braces in the
//! surrounding text. The tests pin down where that assumption breaks.

use crate::error::{AuditError, Result};

/// Extract and parse the single JSON object embedded in `text`.
pub fn extract_json(text: &str) -> Result<serde_json::Value> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(AuditError::MalformedResponse {
            detail: "no JSON object delimiters in the reply".to_string(),
        });
    };

    if end < start {
        // "} ... {": delimiters exist but enclose nothing
        return Err(AuditError::MalformedResponse {
            detail: "JSON object delimiters are out of order".to_string(),
        });
    }

    let candidate = &text[start..=end];
    serde_json::from_str(candidate).map_err(|err| {
        tracing::warn!(%err, candidate, "rejected model JSON");
        AuditError::MalformedResponse {
            detail: format!("invalid JSON between delimiters: {err}"),
        }
    })
}
