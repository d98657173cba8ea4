//! Pure decoding of characteristic read replies.
//!
//! The transformation is kept exactly as the pexpect-era tooling did it:
//! the captured hex pairs are decoded to character codes and concatenated,
//! the resulting string is split on a literal space, and each token is then
//! parsed as a *decimal* integer and reformatted as bare lowercase hex.
//! That last step is only coherent when the decoded bytes themselves spell
//! out ASCII digit groups; anything else is a typed error, never a silent
//! skip.

use crate::error::DecodeError;

/// Decode whitespace-separated hex pairs into the string of the character
/// codes they encode.
///
/// `"31 32 20 33 34"` decodes to `"12 34"`.
pub fn decode_hex_pairs(raw: &str) -> Result<String, DecodeError> {
    raw.split_whitespace()
        .map(|pair| {
            u32::from_str_radix(pair, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| DecodeError::InvalidHexPair(pair.to_string()))
        })
        .collect()
}

/// Split a decoded string on the literal space character.
///
/// Consecutive spaces produce empty tokens, matching a plain split.
pub fn split_tokens(decoded: &str) -> Vec<&str> {
    decoded.split(' ').collect()
}

/// Parse a decoded token as a decimal integer and format it as bare
/// lowercase hex, no prefix, no zero padding.
pub fn format_token(token: &str) -> Result<String, DecodeError> {
    token
        .parse::<u64>()
        .map(|value| format!("{:x}", value))
        .map_err(|_| DecodeError::NonNumericToken(token.to_string()))
}

/// Full pipeline: decode, split, and format every token.
pub fn format_values(raw: &str) -> Result<Vec<String>, DecodeError> {
    let decoded = decode_hex_pairs(raw)?;
    split_tokens(&decoded).into_iter().map(format_token).collect()
}
