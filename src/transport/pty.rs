//! PTY subprocess transport implementation using portable-pty.

use std::io::{Read, Write};
use std::thread;

use log::{debug, warn};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use tokio::sync::mpsc;

use super::config::PtyConfig;
use crate::error::{Result, TransportError};

/// An interactive tool running on a pseudo-terminal.
///
/// The blocking PTY reader runs on a background thread and forwards output
/// chunks into an async channel; the session owns the child process and
/// kills it when closed or dropped, so the tool never outlives the session.
pub struct PtySession {
    child: Box<dyn Child + Send + Sync>,

    writer: Box<dyn Write + Send>,

    /// Output chunks from the reader thread. `None` on recv means the
    /// stream hit EOF and the subprocess is gone.
    output: mpsc::UnboundedReceiver<Vec<u8>>,

    /// Keeps the PTY master side alive for the lifetime of the session.
    _master: Box<dyn MasterPty + Send>,

    closed: bool,
}

impl PtySession {
    /// Spawn the configured tool on a fresh PTY.
    pub fn spawn(config: &PtyConfig) -> Result<Self> {
        let pty_system = native_pty_system();

        let pair = pty_system
            .openpty(PtySize {
                rows: config.terminal_rows,
                cols: config.terminal_cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| TransportError::PtyOpenFailed(e.to_string()))?;

        let mut cmd = CommandBuilder::new(&config.command);
        cmd.args(&config.args);

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| TransportError::SpawnFailed {
                command: config.command.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            "spawned '{}' (pid {:?})",
            config.command,
            child.process_id()
        );

        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| TransportError::PtyOpenFailed(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| TransportError::PtyOpenFailed(e.to_string()))?;

        // Bridge the blocking PTY reader into an async channel.
        let (tx, rx) = mpsc::unbounded_channel::<Vec<u8>>();
        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => {
                        debug!("PTY read EOF, subprocess terminated");
                        break;
                    }
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            // Session dropped, nobody is listening anymore.
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        warn!("PTY read error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            child,
            writer,
            output: rx,
            _master: pair.master,
            closed: false,
        })
    }

    /// Send a line of input to the tool, appending a newline.
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed.into());
        }
        self.writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush())
            .map_err(TransportError::Io)?;
        Ok(())
    }

    /// Receive the next chunk of output.
    ///
    /// Returns `None` once the subprocess has exited and its output is
    /// drained.
    pub async fn recv_chunk(&mut self) -> Option<Vec<u8>> {
        self.output.recv().await
    }

    /// Check whether the subprocess is still running.
    pub fn is_alive(&mut self) -> bool {
        !self.closed && matches!(self.child.try_wait(), Ok(None))
    }

    /// Kill the subprocess and mark the session closed.
    pub fn kill(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.child.kill() {
            debug!("kill after exit: {}", e);
        }
        let _ = self.child.wait();
    }
}

impl Drop for PtySession {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    fn shell_config(script: &str) -> PtyConfig {
        PtyConfig {
            command: "/bin/sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            ..PtyConfig::default()
        }
    }

    #[tokio::test]
    async fn reads_subprocess_output() {
        let mut session = PtySession::spawn(&shell_config("echo ready")).unwrap();

        let mut collected = Vec::new();
        while let Some(chunk) = session.recv_chunk().await {
            collected.extend_from_slice(&chunk);
            if String::from_utf8_lossy(&collected).contains("ready") {
                return;
            }
        }
        panic!(
            "never saw 'ready' in output: {:?}",
            String::from_utf8_lossy(&collected)
        );
    }

    #[tokio::test]
    async fn send_line_reaches_subprocess() {
        let mut session = PtySession::spawn(&shell_config("read x; echo got:$x")).unwrap();
        session.send_line("ping").unwrap();

        let mut collected = Vec::new();
        while let Some(chunk) = session.recv_chunk().await {
            collected.extend_from_slice(&chunk);
            if String::from_utf8_lossy(&collected).contains("got:ping") {
                return;
            }
        }
        panic!(
            "never saw echo back: {:?}",
            String::from_utf8_lossy(&collected)
        );
    }

    #[tokio::test]
    async fn kill_terminates_subprocess() {
        let mut session = PtySession::spawn(&shell_config("sleep 60")).unwrap();
        assert!(session.is_alive());
        session.kill();
        assert!(!session.is_alive());
    }
}
