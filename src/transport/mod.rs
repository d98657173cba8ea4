//! PTY transport layer wrapping portable-pty.
//!
//! This module provides the low-level subprocess management, spawning the
//! interactive tool on a pseudo-terminal and bridging its blocking I/O
//! into async channels.

pub mod config;
mod pty;

pub use config::PtyConfig;
pub use pty::PtySession;
