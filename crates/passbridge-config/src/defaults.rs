use std::env;
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Computes the default store root directory.
///
/// Prefers the platform data directory (`~/.local/share` on Linux) and falls
/// back to a `passbridge` directory under the system temp dir when no data
/// directory can be resolved.
#[must_use]
pub fn default_store_root() -> PathBuf {
    let mut base = dirs::data_dir().unwrap_or_else(env::temp_dir);
    base.push("passbridge");
    base.push("store");
    base
}
