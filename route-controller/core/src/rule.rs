//! Syntactic checks for match rules.

use crate::Error;

/// Checks that every quoted span in a match rule is closed.
///
/// Double quotes, single quotes, and backticks open spans. Within double- or single-quoted spans a
/// backslash escapes the following character, so an escaped quote doesn't close the span.
/// Backtick spans are raw.
pub fn check_quotes(rule: &str) -> Result<(), Error> {
    let mut open: Option<char> = None;
    let mut escaped = false;

    for c in rule.chars() {
        match open {
            None => {
                if matches!(c, '"' | '\'' | '`') {
                    open = Some(c);
                }
            }
            Some(_) if escaped => escaped = false,
            Some('`') => {
                if c == '`' {
                    open = None;
                }
            }
            Some(q) => {
                if c == '\\' {
                    escaped = true;
                } else if c == q {
                    open = None;
                }
            }
        }
    }

    match open {
        None => Ok(()),
        Some(q) => Err(Error::MalformedRule {
            rule: rule.to_string(),
            reason: match q {
                '"' => "unterminated double-quoted string",
                '\'' => "unterminated single-quoted string",
                _ => "unterminated backtick-quoted string",
            },
        }),
    }
}
