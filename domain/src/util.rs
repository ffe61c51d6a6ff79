//! Shared utility functions.

/// Single-line preview of `text` limited to `max_chars` characters.
///
/// Line breaks are folded into spaces so previews fit on one log line.
/// An ellipsis is appended when the text was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let folded: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let folded = folded.trim();
    if folded.chars().count() <= max_chars {
        return folded.to_string();
    }
    let mut cut: String = folded.chars().take(max_chars).collect();
    cut.push('…');
    cut
}
