//! Detection of the facilitator's end-of-discussion marker
//!
//! The marker is a plain-text tag inside free-form model output. Detection
//! is best-effort: a marker quoted inside legitimate content also ends the
//! session.

/// Literal tag the facilitator appends when the discussion is finished
pub const CONCLUSION_MARKER: &str = "[CONCLUDED]";

/// Facilitator output split into what is shown and whether it concludes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conclusion {
    pub content: String,
    pub concluded: bool,
}

/// Inspect raw facilitator output for the conclusion marker.
///
/// Every occurrence of the marker is removed from the visible content,
/// which is then trimmed.
pub fn detect_conclusion(raw: &str) -> Conclusion {
    let concluded = raw.contains(CONCLUSION_MARKER);
    let content = if concluded {
        raw.replace(CONCLUSION_MARKER, "").trim().to_string()
    } else {
        raw.trim().to_string()
    };

    Conclusion { content, concluded }
}
