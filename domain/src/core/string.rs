//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// First sentence of a block of text, with markdown emphasis and line breaks
/// flattened so it fits in a single table cell.
pub fn first_sentence(text: &str) -> String {
    let flat = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("**", "")
        .replace('|', "/");

    match flat.find(". ") {
        Some(idx) => flat[..=idx].to_string(),
        None => flat,
    }
}

/// Escape a value for use inside a markdown table cell.
pub fn table_cell(value: &str) -> String {
    value.replace('|', "/").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("stripe", 10), "stripe");
        assert_eq!(truncate("valued at $95 billion", 12), "valued at...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // 'é' is 2 bytes; the cut must not land inside it
        assert_eq!(truncate("café au lait", 7), "caf...");
    }

    #[test]
    fn test_first_sentence_flattens_markdown() {
        let text = "**Stripe** builds payment\ninfrastructure. Founded in 2010.";
        assert_eq!(first_sentence(text), "Stripe builds payment infrastructure.");
    }

    #[test]
    fn test_first_sentence_without_period() {
        assert_eq!(first_sentence("no period here"), "no period here");
    }

    #[test]
    fn test_table_cell_escapes_pipes() {
        assert_eq!(table_cell("a | b\nc"), "a / b c");
    }
}
