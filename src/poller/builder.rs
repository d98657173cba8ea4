//! Builder for creating pollers.

use std::time::Duration;

use super::{Poller, PollerConfig, DEFAULT_ADDRESS, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HANDLE};
use crate::error::{PollerError, Result};
use crate::transport::PtyConfig;

/// Builder for constructing a [`Poller`].
///
/// Every setting has a default matching the fixed constants the scripted
/// workflow always used, so `PollerBuilder::new().build()` reproduces it
/// exactly.
///
/// # Example
///
/// ```rust,no_run
/// use gattpoll::PollerBuilder;
///
/// # fn example() -> Result<(), gattpoll::Error> {
/// let poller = PollerBuilder::new()
///     .address("C0:4B:39:C9:B1:04")
///     .handle(0x000c)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct PollerBuilder {
    address: String,
    handle: u16,
    connect_timeout: Duration,
    pty: PtyConfig,
}

impl PollerBuilder {
    /// Create a builder with the default target and timings.
    pub fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            handle: DEFAULT_HANDLE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pty: PtyConfig::default(),
        }
    }

    /// Set the target device address.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the characteristic handle to read.
    pub fn handle(mut self, handle: u16) -> Self {
        self.handle = handle;
        self
    }

    /// Set the timeout for the connect confirmation wait.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the timeout for each read reply wait.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.pty.timeout = timeout;
        self
    }

    /// Override the tool binary (e.g. a wrapper script around gatttool).
    pub fn tool(mut self, command: impl Into<String>, args: Vec<String>) -> Self {
        self.pty.command = command.into();
        self.pty.args = args;
        self
    }

    /// Build the poller.
    ///
    /// This does not spawn anything. Call `open()` on the returned poller
    /// to start the tool and connect.
    pub fn build(self) -> Result<Poller> {
        if self.address.is_empty() {
            return Err(PollerError::InvalidConfig {
                message: "Device address is required".to_string(),
            }
            .into());
        }

        Ok(Poller::new(PollerConfig {
            address: self.address,
            handle: self.handle,
            connect_timeout: self.connect_timeout,
            pty: self.pty,
        }))
    }
}

impl Default for PollerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixed_constants() {
        let poller = PollerBuilder::new().build().unwrap();
        assert_eq!(poller.address(), "C0:4B:39:C9:B1:04");
        assert_eq!(poller.read_command(), "char-read-hnd c");
    }

    #[test]
    fn empty_address_is_rejected() {
        assert!(PollerBuilder::new().address("").build().is_err());
    }
}
