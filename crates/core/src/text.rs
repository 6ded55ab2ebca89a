//! Line-ending normalization and line splitting.

use std::borrow::Cow;

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Normalize line endings and split into lines.
///
/// Empty text has no lines. A trailing newline produces a trailing empty
/// line, so `join_lines(&split_lines(t))` gives back the normalized text.
pub fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    normalize_line_endings(text)
        .split('\n')
        .map(str::to_string)
        .collect()
}

/// Join lines with `\n`.
pub fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

/// Comparison key for a line when whitespace differences are ignored.
pub fn whitespace_key(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mixed_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_split_empty() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_split_keeps_trailing_line() {
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb\r\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines("\n"), vec!["", ""]);
    }

    #[test]
    fn test_join_round_trips_normalized_text() {
        for text in ["x", "x\n", "x\r\ny\r\n", "\n\n", "a\rb"] {
            let normalized = normalize_line_endings(text).into_owned();
            assert_eq!(join_lines(&split_lines(text)), normalized);
        }
    }

    #[test]
    fn test_whitespace_key() {
        assert_eq!(whitespace_key("  fn  main ( )\t"), "fnmain()");
        assert_eq!(whitespace_key(""), "");
    }
}
