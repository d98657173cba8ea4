//! High-level poller driving the gatttool shell.
//!
//! The poller owns the channel as a scoped resource: `open()` spawns the
//! tool and runs the connect handshake, `close()` tears it down, and the
//! poll loop stops cooperatively via a watch channel instead of running
//! unbounded.

mod builder;
pub mod decode;
mod response;

pub use builder::PollerBuilder;
pub use response::ReadValue;

use std::time::{Duration, Instant};

use chrono::Local;
use log::{debug, warn};
use tokio::sync::watch;

use crate::channel::{patterns, PtyChannel};
use crate::error::{ChannelError, DecodeError, Error, PollerError, Result};
use crate::transport::PtyConfig;

/// Device address the scripted workflow always targeted.
pub const DEFAULT_ADDRESS: &str = "C0:4B:39:C9:B1:04";

/// Characteristic handle the scripted workflow always read.
pub const DEFAULT_HANDLE: u16 = 0x000c;

/// How long to wait for the connect confirmation.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(300);

/// Timestamp format for poll loop output.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Resolved poller configuration, produced by [`PollerBuilder`].
pub(crate) struct PollerConfig {
    pub(crate) address: String,
    pub(crate) handle: u16,
    pub(crate) connect_timeout: Duration,
    pub(crate) pty: PtyConfig,
}

/// Drives the interactive tool: connect once, then read one characteristic
/// handle on demand or in a loop.
pub struct Poller {
    config: PollerConfig,

    /// Channel to the spawned tool (None when not connected).
    channel: Option<PtyChannel>,
}

impl Poller {
    pub(crate) fn new(config: PollerConfig) -> Self {
        Self {
            config,
            channel: None,
        }
    }

    /// The target device address.
    pub fn address(&self) -> &str {
        &self.config.address
    }

    /// The read command sent each poll, handle formatted as bare hex.
    pub fn read_command(&self) -> String {
        format!("char-read-hnd {:x}", self.config.handle)
    }

    /// Check if the poller is connected.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Check if the underlying subprocess is still running.
    pub fn is_alive(&mut self) -> bool {
        self.channel.as_mut().map(PtyChannel::is_alive).unwrap_or(false)
    }

    /// Spawn the tool and run the connect handshake.
    ///
    /// Waits for the ready prompt, sends `connect <address>`, then waits
    /// for either `Connection successful.` or the `[CON]` marker. There is
    /// no retry; on failure the subprocess is torn down and the caller
    /// owns recovery.
    pub async fn open(&mut self) -> Result<()> {
        if self.channel.is_some() {
            return Err(PollerError::AlreadyConnected.into());
        }

        let mut channel = PtyChannel::open(&self.config.pty)?;

        channel.read_until(patterns::ready_prompt()).await?;
        debug!("ready prompt seen, connecting to {}", self.config.address);

        channel.send_line(&format!("connect {}", self.config.address))?;

        match channel
            .read_until_pattern(patterns::connect_success(), self.config.connect_timeout)
            .await
        {
            Ok(_) => {
                debug!("connected to {}", self.config.address);
                self.channel = Some(channel);
                Ok(())
            }
            Err(e) => {
                channel.close();
                Err(PollerError::ConnectFailed {
                    address: self.config.address.clone(),
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Send one read command and capture the decoded reply.
    pub async fn read_value(&mut self) -> Result<ReadValue> {
        let command = self.read_command();
        let channel = self.channel.as_mut().ok_or(PollerError::NotConnected)?;

        let start = Instant::now();
        channel.send_line(&command)?;
        let data = channel.read_until(patterns::value_line()).await?;
        let elapsed = start.elapsed();

        let raw = patterns::extract_value(&data).ok_or(DecodeError::EmptyValue)?;
        if raw.is_empty() {
            return Err(DecodeError::EmptyValue.into());
        }
        let decoded = decode::decode_hex_pairs(&raw)?;

        Ok(ReadValue {
            raw,
            decoded,
            elapsed,
        })
    }

    /// Poll the characteristic until told to stop.
    ///
    /// Each iteration prints a timestamp, sends the read command, prints a
    /// timestamp, waits for the reply, prints a timestamp, then prints each
    /// decoded token as bare lowercase hex, one per line. The first error
    /// (timeout, malformed hex, non-numeric token, dead subprocess) ends
    /// the loop and propagates.
    ///
    /// The loop stops cleanly when `shutdown` flips to `true`.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        if self.channel.is_none() {
            return Err(PollerError::NotConnected.into());
        }

        loop {
            if *shutdown.borrow() {
                debug!("shutdown requested, leaving poll loop");
                return Ok(());
            }

            println!("{}", Local::now().format(TIMESTAMP_FORMAT));

            let command = self.read_command();
            let channel = match self.channel.as_mut() {
                Some(c) => c,
                None => return Err(PollerError::NotConnected.into()),
            };

            channel.send_line(&command)?;
            println!("{}", Local::now().format(TIMESTAMP_FORMAT));

            let data = tokio::select! {
                _ = shutdown.changed() => {
                    debug!("shutdown requested mid-read, leaving poll loop");
                    return Ok(());
                }
                res = channel.read_until(patterns::value_line()) => res?,
            };
            println!("{}", Local::now().format(TIMESTAMP_FORMAT));

            let raw = patterns::extract_value(&data).ok_or(DecodeError::EmptyValue)?;
            let decoded = decode::decode_hex_pairs(&raw)?;
            for token in decode::split_tokens(&decoded) {
                println!("{}", decode::format_token(token)?);
            }
        }
    }

    /// Tear the session down.
    ///
    /// Best-effort `disconnect` and `exit` to the tool, then the
    /// subprocess is killed. Also happens on drop, so the tool never
    /// outlives the poller.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(mut channel) = self.channel.take() {
            if channel.is_alive() {
                if let Err(e) = channel
                    .send_line("disconnect")
                    .and_then(|_| channel.send_line("exit"))
                {
                    warn!("cleanup commands failed: {}", e);
                }
            }
            channel.close();
        }
        Ok(())
    }
}

impl Poller {
    /// True if the error is a pattern-wait timeout.
    pub fn is_timeout(err: &Error) -> bool {
        matches!(err, Error::Channel(ChannelError::PatternTimeout(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poller_with_handle(handle: u16) -> Poller {
        PollerBuilder::new().handle(handle).build().unwrap()
    }

    #[test]
    fn is_timeout_identifies_pattern_waits() {
        let timeout: Error =
            ChannelError::PatternTimeout(Duration::from_secs(30)).into();
        assert!(Poller::is_timeout(&timeout));
        assert!(!Poller::is_timeout(&PollerError::NotConnected.into()));
    }

    #[test]
    fn read_command_formats_handle_as_bare_hex() {
        assert_eq!(poller_with_handle(0x000c).read_command(), "char-read-hnd c");
        assert_eq!(
            poller_with_handle(0x002a).read_command(),
            "char-read-hnd 2a"
        );
    }

    #[tokio::test]
    async fn read_value_requires_open() {
        let mut poller = PollerBuilder::new().build().unwrap();
        let err = poller.read_value().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Poller(PollerError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn run_requires_open() {
        let (_tx, rx) = watch::channel(false);
        let mut poller = PollerBuilder::new().build().unwrap();
        assert!(poller.run(rx).await.is_err());
    }

    #[cfg(unix)]
    mod with_fake_tool {
        use super::*;

        /// Shell script standing in for gatttool: prints the prompt,
        /// confirms the connect, then answers every read with a fixed
        /// value line.
        const FAKE_TOOL: &str = r#"
printf '[                 ][LE]>'
while read cmd; do
    case "$cmd" in
        connect*) printf 'Connection successful.\r\n[CON][LE]>' ;;
        char-read-hnd*) printf 'Characteristic value/descriptor: 31 32 20 33 34 \r\n[CON][LE]>' ;;
        exit*) exit 0 ;;
    esac
done
"#;

        fn fake_poller() -> Poller {
            PollerBuilder::new()
                .tool("/bin/sh", vec!["-c".to_string(), FAKE_TOOL.to_string()])
                .read_timeout(Duration::from_secs(5))
                .connect_timeout(Duration::from_secs(5))
                .build()
                .unwrap()
        }

        #[tokio::test]
        async fn open_and_read_against_fake_tool() {
            let mut poller = fake_poller();
            poller.open().await.unwrap();
            assert!(poller.is_open());

            let value = poller.read_value().await.unwrap();
            assert_eq!(value.raw, "31 32 20 33 34");
            assert_eq!(value.decoded, "12 34");
            assert_eq!(
                value.hex_tokens().unwrap(),
                vec!["c".to_string(), "22".to_string()]
            );

            poller.close().await.unwrap();
            assert!(!poller.is_open());
        }

        #[tokio::test]
        async fn double_open_is_rejected() {
            let mut poller = fake_poller();
            poller.open().await.unwrap();
            let err = poller.open().await.unwrap_err();
            assert!(matches!(
                err,
                Error::Poller(PollerError::AlreadyConnected)
            ));
            poller.close().await.unwrap();
        }

        #[tokio::test]
        async fn run_stops_on_shutdown_signal() {
            let mut poller = fake_poller();
            poller.open().await.unwrap();

            let (tx, rx) = watch::channel(false);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                let _ = tx.send(true);
            });

            poller.run(rx).await.unwrap();
            poller.close().await.unwrap();
        }
    }
}
