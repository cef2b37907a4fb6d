//! Line wrapping for tagged flat-file output
//!
//! A tagged line looks like `"TI  - Some long title"`. When it is longer than
//! the maximum width the content is re-flowed word by word; the tag stays on
//! the first line and continuation lines are indented by the tag width.

/// Wrap one tagged line.
///
/// Widths count characters. Lines that already fit are returned unchanged.
/// A single word wider than the available space gets a line of its own
/// rather than being split.
///
/// # Example
///
/// ```
/// use pmbib_formatter::wrap::wrap_line;
///
/// let lines = wrap_line("TI  - alpha beta gamma", 16, 6);
/// assert_eq!(lines, vec!["TI  - alpha beta", "      gamma"]);
/// ```
pub fn wrap_line(line: &str, max_width: usize, identifier_width: usize) -> Vec<String> {
    if line.chars().count() <= max_width {
        return vec![line.to_string()];
    }

    let split_at = line
        .char_indices()
        .nth(identifier_width)
        .map_or(line.len(), |(i, _)| i);
    let (identifier, content) = line.split_at(split_at);
    let budget = max_width.saturating_sub(identifier_width);
    let indent = " ".repeat(identifier_width);

    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    let flush = |current: &mut String, wrapped: &mut Vec<String>| {
        let prefix = if wrapped.is_empty() { identifier } else { indent.as_str() };
        wrapped.push(format!("{prefix}{current}"));
        current.clear();
    };

    for word in content.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + word_len + 1 <= budget {
            current.push(' ');
            current.push_str(word);
            current_len += word_len + 1;
        } else {
            flush(&mut current, &mut wrapped);
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() || wrapped.is_empty() {
        flush(&mut current, &mut wrapped);
    }

    wrapped
}

/// Wrap every line of `text` and join the result with `\n`
pub fn wrap_text(text: &str, max_width: usize, identifier_width: usize) -> String {
    text.lines()
        .flat_map(|line| wrap_line(line, max_width, identifier_width))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LOREM: &str = "AB  - Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
        tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis \
        nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

    #[test]
    fn test_short_line_is_unchanged() {
        assert_eq!(wrap_line("PMID- 12345", 87, 6), vec!["PMID- 12345"]);
    }

    #[test]
    fn test_line_of_exact_width_is_unchanged() {
        let line = format!("TI  - {}", "x".repeat(81));
        assert_eq!(line.chars().count(), 87);
        assert_eq!(wrap_line(&line, 87, 6), vec![line]);
    }

    #[test]
    fn test_continuation_lines_are_indented() {
        let lines = wrap_line(LOREM, 87, 6);
        assert!(lines.len() > 1);
        assert!(lines[0].starts_with("AB  - Lorem"));
        for line in &lines[1..] {
            assert!(line.starts_with("      "));
            assert!(!line[6..].starts_with(' '));
        }
    }

    #[rstest]
    #[case(87, 6)]
    #[case(40, 6)]
    #[case(20, 4)]
    fn test_wrapping_preserves_words_and_width(#[case] max: usize, #[case] id_width: usize) {
        let lines = wrap_line(LOREM, max, id_width);
        for line in &lines {
            assert!(line.chars().count() <= max, "line too long: {line:?}");
        }
        let original: Vec<&str> = LOREM[id_width..].split_whitespace().collect();
        let rewrapped: Vec<&str> = lines
            .iter()
            .flat_map(|line| line[id_width..].split_whitespace())
            .collect();
        assert_eq!(original, rewrapped);
    }

    #[test]
    fn test_overlong_word_gets_its_own_line() {
        let long_word = "y".repeat(30);
        let line = format!("AB  - short {long_word} tail");
        let lines = wrap_line(&line, 20, 6);
        assert_eq!(
            lines,
            vec![
                "AB  - short".to_string(),
                format!("      {long_word}"),
                "      tail".to_string(),
            ]
        );
    }

    #[test]
    fn test_multibyte_characters_count_as_one() {
        let line = "TI  - Análise de séries temporais éé";
        assert_eq!(wrap_line(line, 36, 6), vec![line.to_string()]);
        let lines = wrap_line(line, 30, 6);
        assert_eq!(lines[0], "TI  - Análise de séries");
        assert_eq!(lines[1], "      temporais éé");
    }

    #[test]
    fn test_wrap_text_handles_each_line() {
        let text = format!("PMID- 1\n{LOREM}");
        let wrapped = wrap_text(&text, 87, 6);
        assert!(wrapped.starts_with("PMID- 1\nAB  - Lorem"));
        assert!(wrapped.lines().all(|l| l.chars().count() <= 87));
    }
}
