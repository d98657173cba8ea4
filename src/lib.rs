//! # gattpoll
//!
//! Async expect-style automation for the BlueZ `gatttool` interactive shell.
//!
//! gattpoll spawns `gatttool -I` on a pseudo-terminal, drives it through a
//! scripted connect sequence by matching its prompts, then repeatedly reads
//! one characteristic handle and decodes the hex reply.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gattpoll::PollerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gattpoll::Error> {
//!     let mut poller = PollerBuilder::new()
//!         .address("C0:4B:39:C9:B1:04")
//!         .handle(0x000c)
//!         .build()?;
//!
//!     poller.open().await?;
//!
//!     let value = poller.read_value().await?;
//!     println!("{}", value.decoded);
//!
//!     poller.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod poller;
pub mod transport;

// Re-export main types for convenience
pub use error::Error;
pub use poller::{decode, Poller, PollerBuilder, ReadValue};
pub use transport::PtyConfig;
