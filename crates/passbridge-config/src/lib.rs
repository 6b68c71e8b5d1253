//! Runtime configuration shared by the passbridge host binary.
//!
//! The host is spawned by a browser, so configuration arrives through
//! command-line arguments supplied in the native-messaging manifest and
//! through `PASSBRIDGE_*` environment variables. Both binaries and embedders
//! need to agree on defaults, so they live here rather than beside the
//! request loop.

mod defaults;
mod logging;

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
    default_store_root,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Configuration for the passbridge helper process.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, PartialEq, Eq)]
#[command(name = "passbridge", about = "Native-messaging bridge to a password store")]
pub struct Config {
    /// Tracing filter expression (e.g. `info`, `passbridge=debug`).
    #[arg(
        long = "log-filter",
        env = "PASSBRIDGE_LOG_FILTER",
        default_value = DEFAULT_LOG_FILTER
    )]
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,

    /// Logging output format (`compact` or `json`).
    #[arg(
        long = "log-format",
        env = "PASSBRIDGE_LOG_FORMAT",
        default_value_t = LogFormat::default()
    )]
    #[serde(default)]
    pub log_format: LogFormat,

    /// Root directory of the secret store served by this helper.
    #[arg(long = "store-root", env = "PASSBRIDGE_STORE_ROOT", default_value_os_t = default_store_root())]
    #[serde(default = "default_store_root")]
    pub store_root: PathBuf,

    /// External command that receives clipboard payloads on stdin
    /// (e.g. `wl-copy` or `xclip -selection clipboard`).
    #[arg(long = "clipboard-command", env = "PASSBRIDGE_CLIPBOARD_COMMAND")]
    #[serde(default)]
    pub clipboard_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            store_root: default_store_root(),
            clipboard_command: None,
        }
    }
}

impl Config {
    /// Loads configuration from command-line arguments and the environment.
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }

    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured logging format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
