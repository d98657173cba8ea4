//! Subprocess and PTY configuration.

use std::time::Duration;

/// Configuration for the spawned interactive tool and its PTY.
#[derive(Debug, Clone)]
pub struct PtyConfig {
    /// Program to spawn.
    pub command: String,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Default timeout for pattern waits.
    pub timeout: Duration,

    /// How many bytes from the end of the buffer to search for patterns.
    pub search_depth: usize,

    /// Terminal width in columns.
    pub terminal_cols: u16,

    /// Terminal height in rows.
    pub terminal_rows: u16,
}

impl Default for PtyConfig {
    fn default() -> Self {
        Self {
            command: "gatttool".to_string(),
            args: vec!["-I".to_string()],
            timeout: Duration::from_secs(30),
            search_depth: 1000,
            terminal_cols: 80,
            terminal_rows: 24,
        }
    }
}
