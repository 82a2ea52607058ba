use crate::error::AppError;

/// Normalizes line endings and drops control characters, keeping newlines
/// and tabs, then trims surrounding whitespace.
pub fn sanitize_input(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let cleaned: String = normalized
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    cleaned.trim().to_string()
}

/// Length is counted in characters, not bytes.
pub fn validate_length(text: &str, max: usize) -> Result<(), AppError> {
    let actual = text.chars().count();
    if actual > max {
        return Err(AppError::TextTooLong { max, actual });
    }
    Ok(())
}

/// Sanitizes and validates a submitted text in one step.
pub fn prepare_text(raw: &str, max: usize) -> Result<String, AppError> {
    let text = sanitize_input(raw);
    if text.is_empty() {
        return Err(AppError::EmptyText);
    }
    validate_length(&text, max)?;
    Ok(text)
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_control_characters() {
        assert_eq!(sanitize_input("  Jane\u{0}Doe\u{7}\n\tx  "), "JaneDoe\n\tx");
        assert_eq!(sanitize_input("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(sanitize_input("\u{1b}[31mred"), "[31mred");
    }

    #[test]
    fn keeps_unicode_text() {
        assert_eq!(sanitize_input("Zoë Müller, 東京"), "Zoë Müller, 東京");
    }

    #[test]
    fn length_limit_is_inclusive() {
        assert!(validate_length("abcde", 5).is_ok());
        match validate_length("abcdef", 5) {
            Err(AppError::TextTooLong { max, actual }) => {
                assert_eq!(max, 5);
                assert_eq!(actual, 6);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn length_counts_characters() {
        // 5 characters, 10 bytes
        assert!(validate_length("ééééé", 5).is_ok());
    }

    #[test]
    fn prepare_rejects_blank_and_long() {
        assert!(matches!(prepare_text(" \n\t\u{0} ", 10), Err(AppError::EmptyText)));
        assert!(matches!(
            prepare_text("x".repeat(11).as_str(), 10),
            Err(AppError::TextTooLong { .. })
        ));
        assert_eq!(prepare_text("  hello  ", 5).unwrap(), "hello");
    }

    #[test]
    fn escapes_html_specials() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script> 'q'"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt; &#x27;q&#x27;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
