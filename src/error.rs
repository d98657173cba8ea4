//! Error types for gattpoll.

use std::io;
use thiserror::Error;

/// Main error type for gattpoll operations.
#[derive(Error, Debug)]
pub enum Error {
    /// PTY subprocess errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Poller-level errors
    #[error("Poller error: {0}")]
    Poller(#[from] PollerError),

    /// Value decoding errors
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Transport layer errors (subprocess spawning, PTY I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to open a PTY pair
    #[error("Failed to open PTY: {0}")]
    PtyOpenFailed(String),

    /// Failed to spawn the external tool
    #[error("Failed to spawn '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    /// The session was already closed
    #[error("Session closed")]
    Closed,

    /// I/O error on the PTY
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (pattern matching over the output stream).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(std::time::Duration),

    /// Output stream ended before the pattern matched
    #[error("Channel closed")]
    Closed,

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Poller layer errors (session lifecycle).
#[derive(Error, Debug)]
pub enum PollerError {
    /// Poller not connected
    #[error("Poller not connected - call open() first")]
    NotConnected,

    /// Poller already connected
    #[error("Poller already connected")]
    AlreadyConnected,

    /// The tool never confirmed the connection
    #[error("Connect to '{address}' failed: {reason}")]
    ConnectFailed { address: String, reason: String },

    /// Invalid configuration in the poller builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Errors from decoding a characteristic value reply.
#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    /// A whitespace-separated token was not a valid hex byte
    #[error("Invalid hex pair '{0}'")]
    InvalidHexPair(String),

    /// A decoded token was not a decimal integer
    #[error("Non-numeric token '{0}' after decode")]
    NonNumericToken(String),

    /// The captured value group was empty
    #[error("Empty characteristic value")]
    EmptyValue,
}

/// Result type alias using gattpoll's Error.
pub type Result<T> = std::result::Result<T, Error>;
