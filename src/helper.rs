/// Trims user input. Both fields of a note go through this before validation.
pub fn normalize_field(text: &str) -> String {
    text.trim().to_string()
}

/// Shortens `text` to at most `max_chars` characters, appending `...` when
/// anything was cut. Counts characters, so multi-byte text is never split.
pub fn truncate_with_marker(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

// Reads a y/N answer
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_with_marker("milk", 50), "milk");
        assert_eq!(truncate_with_marker("exact", 5), "exact");
    }

    #[test]
    fn long_text_gets_marker() {
        assert_eq!(truncate_with_marker("abcdefgh", 3), "abc...");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_with_marker("äöüß€", 2), "äö...");
    }

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(normalize_field("  Todo \n"), "Todo");
        assert_eq!(normalize_field(" \t "), "");
    }

    #[test]
    fn affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
    }
}
