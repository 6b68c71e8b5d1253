//! Clipboard collaborator for `copyToClipboard` requests.
//!
//! OS clipboard integration stays outside the protocol core: the dispatcher
//! only hands a resolved value to a [`Clipboard`] implementation. The
//! shipped implementation pipes the value into a user-configured command
//! (`wl-copy`, `xclip`, `pbcopy`, ...); tests use the in-memory capture.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Mutex;

use thiserror::Error;

/// Errors surfaced while copying a value to the clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard command is configured for this session.
    #[error("no clipboard command configured")]
    NotConfigured,

    /// The configured command could not be spawned or written to.
    #[error("clipboard command '{command}' failed: {source}")]
    Command {
        /// The command that failed.
        command: String,
        /// The underlying process error.
        #[source]
        source: std::io::Error,
    },

    /// The configured command exited with a non-zero status.
    #[error("clipboard command '{command}' exited with status {status}")]
    Status {
        /// The command that failed.
        command: String,
        /// Its exit status code, when one was reported.
        status: i32,
    },
}

/// Receives resolved secret values from the dispatcher.
pub trait Clipboard {
    /// Copies `value` to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns a [`ClipboardError`] when the value cannot be delivered.
    fn copy(&self, value: &str) -> Result<(), ClipboardError>;
}

/// Clipboard that pipes values into an external command's stdin.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    arguments: Vec<String>,
}

impl CommandClipboard {
    /// Builds a clipboard from a whitespace-separated command line.
    ///
    /// Returns `None` for an empty command line.
    #[must_use]
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_owned);
        let program = words.next()?;
        Some(Self {
            program,
            arguments: words.collect(),
        })
    }

    fn display_command(&self) -> String {
        let mut rendered = self.program.clone();
        for argument in &self.arguments {
            rendered.push(' ');
            rendered.push_str(argument);
        }
        rendered
    }
}

impl Clipboard for CommandClipboard {
    fn copy(&self, value: &str) -> Result<(), ClipboardError> {
        let command_error = |source| ClipboardError::Command {
            command: self.display_command(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.arguments)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(command_error)?;
        if let Some(stdin) = child.stdin.take() {
            let mut stdin = stdin;
            stdin.write_all(value.as_bytes()).map_err(command_error)?;
        }
        let status = child.wait().map_err(command_error)?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Status {
                command: self.display_command(),
                status: status.code().unwrap_or(-1),
            })
        }
    }
}

/// Clipboard that refuses every copy; used when none is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredClipboard;

impl Clipboard for UnconfiguredClipboard {
    fn copy(&self, _value: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::NotConfigured)
    }
}

/// Clipboard capturing values in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Creates an empty capture clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last copied value, if any.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, value: &str) -> Result<(), ClipboardError> {
        if let Ok(mut guard) = self.contents.lock() {
            *guard = Some(value.to_owned());
        }
        Ok(())
    }
}
