//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", floor_boundary(s, max_len.saturating_sub(3)))
    }
}

/// Longest prefix of `s` that is at most `max_bytes` long and ends on a
/// character boundary.
pub fn floor_boundary(s: &str, max_bytes: usize) -> &str {
    let mut end = max_bytes.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Collapse a (possibly multi-line) message onto one line.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "é" is 2 bytes: target=4 -> boundary at 4 -> "éé"
        assert_eq!(truncate("éééé", 7), "éé...");
        assert_eq!(truncate("日本語", 9), "日本語");
    }

    #[test]
    fn test_floor_boundary() {
        assert_eq!(floor_boundary("abc", 10), "abc");
        // "€" is 3 bytes
        assert_eq!(floor_boundary("€€", 4), "€");
        assert_eq!(floor_boundary("€", 2), "");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(
            single_line("near \"SELEC\":\n  syntax   error"),
            "near \"SELEC\": syntax error"
        );
    }
}
