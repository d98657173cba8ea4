//! High-level channel combining the PTY session with pattern waits.

use std::time::Duration;

use log::trace;
use regex::bytes::Regex;

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};
use crate::transport::{PtyConfig, PtySession};

/// Interactive channel to the spawned tool.
///
/// Wraps the transport and provides pattern-based reads with timeout
/// handling, returning typed errors instead of hanging forever.
pub struct PtyChannel {
    session: PtySession,
    buffer: PatternBuffer,
    timeout: Duration,
}

impl PtyChannel {
    /// Spawn the tool and open a channel to it.
    pub fn open(config: &PtyConfig) -> Result<Self> {
        let session = PtySession::spawn(config)?;
        Ok(Self {
            session,
            buffer: PatternBuffer::new(config.search_depth),
            timeout: config.timeout,
        })
    }

    /// Send one line of input.
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        trace!("send: {}", line);
        self.session.send_line(line)
    }

    /// Accumulate output until `pattern` matches, then drain and return
    /// everything received.
    ///
    /// Output already buffered from a previous read is checked first.
    /// Errors with [`ChannelError::PatternTimeout`] if the deadline passes
    /// and [`ChannelError::Closed`] if the subprocess exits first.
    pub async fn read_until_pattern(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.buffer.tail_contains(pattern) {
                trace!("pattern matched after {} bytes", self.buffer.len());
                return Ok(self.buffer.take());
            }

            let chunk = tokio::time::timeout_at(deadline, self.session.recv_chunk())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))?
                .ok_or(ChannelError::Closed)?;

            trace!("recv chunk: {} bytes", chunk.len());
            self.buffer.extend(&chunk);
        }
    }

    /// Wait for `pattern` using the channel's default timeout.
    pub async fn read_until(&mut self, pattern: &Regex) -> Result<Vec<u8>> {
        self.read_until_pattern(pattern, self.timeout).await
    }

    /// Get the default timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check whether the subprocess is still running.
    pub fn is_alive(&mut self) -> bool {
        self.session.is_alive()
    }

    /// Kill the subprocess.
    pub fn close(&mut self) {
        self.session.kill();
    }
}
