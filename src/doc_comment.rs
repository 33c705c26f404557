//! Comment-block rendering for schema descriptions.

/// Column after which the next space starts a new comment line.
pub const WRAP_WIDTH: usize = 80;

/// Renders a description as a `/** ... */` block.
///
/// Descriptions of at most [`WRAP_WIDTH`] characters stay on one line. Longer
/// ones break at the first space once a line has passed the width, so words
/// are never split; every wrapped line is trimmed and prefixed with ` * `.
pub fn format_description(description: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut length = 0usize;

    for ch in description.chars() {
        length += 1;
        if length > WRAP_WIDTH && ch == ' ' {
            lines.push(std::mem::take(&mut current));
            length = 0;
        }
        current.push(ch);
    }
    lines.push(current);

    if lines.len() == 1 {
        return format!("/** {} */", lines[0]);
    }

    let body: Vec<String> = lines
        .iter()
        .map(|line| format!(" * {}", line.trim()))
        .collect();
    format!("/**\n{}\n */", body.join("\n"))
}

/// Prefixes every line of `text` with `width` spaces.
pub fn indent(width: usize, text: &str) -> String {
    let pad = " ".repeat(width);
    text.split('\n')
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_description_is_single_line() {
        assert_eq!(format_description("Chat identifier"), "/** Chat identifier */");
    }

    #[test]
    fn exactly_eighty_characters_stays_single_line() {
        let text = format!("{} {}", "a".repeat(39), "b".repeat(40));
        assert_eq!(text.chars().count(), 80);
        assert_eq!(format_description(&text), format!("/** {text} */"));
    }

    #[test]
    fn long_description_wraps_at_spaces() {
        let text = format!("{} tail end", "a".repeat(80));
        let rendered = format_description(&text);
        assert_eq!(
            rendered,
            format!("/**\n * {}\n * tail end\n */", "a".repeat(80))
        );
    }

    #[test]
    fn never_splits_words() {
        let text = format!("{} {}", "a".repeat(70), "b".repeat(30));
        assert_eq!(text.chars().count(), 101);
        // The only space sits at column 71, before the width is exceeded.
        assert_eq!(format_description(&text), format!("/** {text} */"));
    }

    #[test]
    fn wraps_repeatedly() {
        let word = "word ";
        let text = word.repeat(50);
        let rendered = format_description(text.trim_end());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.first(), Some(&"/**"));
        assert_eq!(lines.last(), Some(&" */"));
        assert_eq!(lines.len(), 2 + 3);
        // A line may run past the width by the word that straddles it.
        for line in &lines[1..lines.len() - 1] {
            assert!(line.starts_with(" * word"));
            assert!(line.len() <= " * ".len() + WRAP_WIDTH + "word".len());
        }
    }

    #[test]
    fn indents_every_line() {
        assert_eq!(indent(2, "/**\n * x\n */"), "  /**\n   * x\n   */");
    }
}
