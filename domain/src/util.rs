//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters for log output, marking
/// the cut with an ellipsis and flattening newlines.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}
