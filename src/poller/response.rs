//! Response type for characteristic reads.

use std::time::Duration;

use super::decode;
use crate::error::DecodeError;

/// One characteristic read, captured and decoded.
#[derive(Debug, Clone)]
pub struct ReadValue {
    /// The captured hex-pair group, trimmed (e.g. `"31 32 20 33 34"`).
    pub raw: String,

    /// The string the hex pairs decode to (e.g. `"12 34"`).
    pub decoded: String,

    /// Time from sending the read command to matching the reply.
    pub elapsed: Duration,
}

impl ReadValue {
    /// The decoded string split on the literal space character.
    pub fn tokens(&self) -> Vec<&str> {
        decode::split_tokens(&self.decoded)
    }

    /// Every token parsed as a decimal integer and reformatted as bare
    /// lowercase hex.
    pub fn hex_tokens(&self) -> Result<Vec<String>, DecodeError> {
        self.tokens().into_iter().map(decode::format_token).collect()
    }
}

impl std::fmt::Display for ReadValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_and_hex_tokens() {
        let value = ReadValue {
            raw: "31 32 20 33 34".to_string(),
            decoded: "12 34".to_string(),
            elapsed: Duration::from_millis(5),
        };
        assert_eq!(value.tokens(), vec!["12", "34"]);
        assert_eq!(
            value.hex_tokens().unwrap(),
            vec!["c".to_string(), "22".to_string()]
        );
        assert_eq!(value.to_string(), "12 34");
    }
}
