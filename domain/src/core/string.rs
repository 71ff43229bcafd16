//! String utilities for the domain layer.

/// Shorten text to at most `max_chars` characters for one-line previews.
///
/// Counts characters rather than bytes so CJK transcripts are cut at the
/// same visual width as ASCII ones. Newlines are folded into spaces.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flattened: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let flattened = flattened.trim();

    if flattened.chars().count() <= max_chars {
        return flattened.to_string();
    }

    let kept: String = flattened.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}
