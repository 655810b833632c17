//! Redaction of sensitive fragments from free-text error details.
//!
//! Patterns run in a fixed order and overlapping matches are not
//! de-duplicated: a later pattern sees the output of the earlier ones.
//!
//! 1. `password[^=]*=[^,]*` becomes `password=***` (case-sensitive)
//! 2. JSON `"password": "<value>"` pairs keep their key and mask the value
//! 3. `token[^=]*=[^,]*` becomes `token=***` (case-insensitive)
//! 4. `secret[^=]*=[^,]*` becomes `secret=***` (case-insensitive)
//! 5. `key[^=]*=[^,]*` becomes `key=***` (case-insensitive)

use std::fmt::Display;
use std::sync::OnceLock;

use regex::Regex;

struct Redaction {
    pattern: Regex,
    replacement: &'static str,
}

static REDACTIONS: OnceLock<Vec<Redaction>> = OnceLock::new();

fn redactions() -> &'static [Redaction] {
    REDACTIONS.get_or_init(|| {
        [
            (r"password[^=]*=[^,]*", "password=***"),
            (r#"("password"\s*:\s*)"[^"]*""#, r#"${1}"***""#),
            (r"(?i)token[^=]*=[^,]*", "token=***"),
            (r"(?i)secret[^=]*=[^,]*", "secret=***"),
            (r"(?i)key[^=]*=[^,]*", "key=***"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| Redaction {
            pattern: Regex::new(pattern).unwrap_or_else(|error| {
                panic!("redaction pattern {pattern} failed to compile: {error}")
            }),
            replacement,
        })
        .collect()
    })
}

/// Return a copy of `detail` with sensitive key/value fragments masked.
///
/// # Examples
/// ```
/// use user_service::domain::sanitize_detail;
///
/// let clean = sanitize_detail("login failed: password=hunter2, user=ada");
/// assert_eq!(clean, "login failed: password=***, user=ada");
/// ```
pub fn sanitize_detail(detail: &str) -> String {
    redactions()
        .iter()
        .fold(detail.to_owned(), |text, redaction| {
            redaction
                .pattern
                .replace_all(&text, redaction.replacement)
                .into_owned()
        })
}

/// Sanitise any displayable value by first rendering it to text.
pub fn sanitize_display(value: &impl Display) -> String {
    sanitize_detail(&value.to_string())
}
