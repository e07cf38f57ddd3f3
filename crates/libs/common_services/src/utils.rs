/// Returns at most `max_chars` characters of `text`, cut on a char boundary.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

/// Text before the first period, or all of it when there is none.
#[must_use]
pub fn first_sentence(text: &str) -> &str {
    text.split_once('.').map_or(text, |(head, _)| head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn first_sentence_stops_at_period() {
        assert_eq!(first_sentence("A cat. Sleeping."), "A cat");
        assert_eq!(first_sentence("No period here"), "No period here");
        assert_eq!(first_sentence(".leading"), "");
    }
}
