//! Output buffer with tail-limited pattern search.
//!
//! Prompt markers only ever appear near the end of the accumulated output,
//! so searches are restricted to the last `search_depth` bytes of the
//! buffer (scrapli's tail-search optimization) rather than scanning
//! everything received since the last match.

use bytes::BytesMut;
use regex::bytes::Regex;

/// Buffer accumulating ANSI-stripped output between pattern matches.
#[derive(Debug)]
pub struct PatternBuffer {
    buffer: BytesMut,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,
}

impl PatternBuffer {
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            search_depth,
        }
    }

    /// Append new output, stripping ANSI escape sequences.
    ///
    /// gatttool colors its prompt, so raw bytes would never match the
    /// plain-text patterns.
    pub fn extend(&mut self, data: &[u8]) {
        let cleaned = strip_ansi_escapes::strip(data);
        self.buffer.extend_from_slice(&cleaned);
    }

    /// Check whether the pattern matches within the buffer tail.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        pattern.is_match(&self.buffer[start..])
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer).to_vec()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_accumulates() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"Connection ");
        buffer.extend(b"successful.");
        assert_eq!(buffer.as_slice(), b"Connection successful.");
    }

    #[test]
    fn extend_strips_ansi_escapes() {
        let mut buffer = PatternBuffer::new(100);
        // gatttool's colored prompt: blue address, bold brackets
        buffer.extend(b"\x1b[0;94m[C0:4B:39:C9:B1:04]\x1b[0m[LE]>");
        assert_eq!(buffer.as_slice(), b"[C0:4B:39:C9:B1:04][LE]>");
    }

    #[test]
    fn tail_search_finds_trailing_prompt() {
        let mut buffer = PatternBuffer::new(20);
        buffer.extend(&[b'x'; 200]);
        buffer.extend(b"\n[LE]>");

        let pattern = Regex::new(r"\[LE\]>").unwrap();
        assert!(buffer.tail_contains(&pattern));
    }

    #[test]
    fn tail_search_ignores_matches_outside_depth() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"[LE]>");
        buffer.extend(&[b'x'; 200]);

        let pattern = Regex::new(r"\[LE\]>").unwrap();
        assert!(!buffer.tail_contains(&pattern));
    }

    #[test]
    fn take_drains_buffer() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"some output");
        assert_eq!(buffer.take(), b"some output");
        assert!(buffer.is_empty());
    }
}
