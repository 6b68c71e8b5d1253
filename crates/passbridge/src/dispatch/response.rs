//! Response payload types.
//!
//! Each operation has its own response shape; all of them serialize to a
//! single JSON object (or array, for queries) that the transport layer
//! frames. Field order follows declaration order, matching the shapes the
//! extension expects.

use semver::Version;
use serde::Serialize;
use serde_json::{Map, Value};

/// Response to `getVersion`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionResponse {
    /// Full display string, including any pre-release suffix.
    pub version: String,
    /// Major version component.
    pub major: u64,
    /// Minor version component.
    pub minor: u64,
    /// Patch version component.
    pub patch: u64,
}

impl From<&Version> for VersionResponse {
    fn from(version: &Version) -> Self {
        Self {
            version: version.to_string(),
            major: version.major,
            minor: version.minor,
            patch: version.patch,
        }
    }
}

/// Response to `getLogin` and `create`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginResponse {
    /// Resolved username for the entry.
    pub username: String,
    /// Primary password line.
    pub password: String,
    /// Multi-field credential data, surfaced only when well-formed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_fields: Option<Map<String, Value>>,
}

/// Response to `getData` for a TOTP-bearing secret.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TotpResponse {
    /// Code for the current time window.
    pub current_totp: String,
    /// The otpauth URI the code was derived from, echoed back.
    pub otpauth: String,
}

/// Acknowledgement response for side-effecting operations.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusResponse {
    /// Fixed status marker.
    pub status: &'static str,
}

impl StatusResponse {
    /// The affirmative acknowledgement.
    pub const OK: Self = Self { status: "ok" };
}
