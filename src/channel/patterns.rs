//! Compiled patterns for the gatttool interactive shell.
//!
//! gatttool's output is matched as plain text, the same way pexpect-style
//! scripts drive it. All patterns operate on ANSI-stripped bytes.

use std::sync::OnceLock;

use regex::bytes::Regex;

/// The interactive shell's ready prompt, a line ending in `[LE]>`.
pub fn ready_prompt() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[LE\]>").unwrap())
}

/// Connect confirmation: either the success phrase or the `[CON]`
/// connection-state marker in the prompt.
pub fn connect_success() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Connection successful\.|\[CON\]").unwrap())
}

/// A characteristic read reply. The trailing carriage return is part of
/// the pattern: a reply without it must not match.
pub fn value_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Characteristic value/descriptor: (.+)\r").unwrap())
}

/// Extract the hex-pair group from a reply matched by [`value_line`],
/// trimmed of surrounding whitespace.
pub fn extract_value(data: &[u8]) -> Option<String> {
    value_line()
        .captures(data)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
}
