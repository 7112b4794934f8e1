//! Escaping for untrusted text placed inside AppleScript string literals.
//!
//! AppleScript string literals are delimited by `"` and use `\` as the escape
//! character, so those two must be escaped, and raw line breaks are replaced
//! by their `\r` / `\n` escape sequences so a value can never end the
//! statement it is interpolated into.
//!
//! # Example
//! ```rust
//! use osabridge_core::{applescript_string_literal, escape_applescript_string};
//!
//! let title = "He said \"hi\"\nBye";
//! assert_eq!(escape_applescript_string(title), r#"He said \"hi\"\nBye"#);
//!
//! let script = format!(
//!     "display notification {} with title \"Build\"",
//!     applescript_string_literal(title)
//! );
//! assert!(script.starts_with(r#"display notification "He said \"hi\"\nBye""#));
//! ```

/// Escape `value` for use between double quotes in an AppleScript source.
///
/// Backslashes are escaped first, then double quotes, carriage returns and
/// line feeds. Every other character passes through untouched.
#[must_use]
pub fn escape_applescript_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + value.len() / 8);
    // Single pass: each source char maps to exactly one output chunk, which
    // gives the same result as replacing in backslash, quote, CR, LF order.
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escape `value` and wrap it in double quotes, ready to interpolate.
#[must_use]
pub fn applescript_string_literal(value: &str) -> String {
    format!("\"{}\"", escape_applescript_string(value))
}
