//! Channel layer for pattern matching over the tool's output stream.
//!
//! This module handles the interactive session management, including
//! pattern-based waits with timeouts and ANSI stripping.

mod buffer;
pub mod patterns;
mod pty;

pub use buffer::PatternBuffer;
pub use pty::PtyChannel;
