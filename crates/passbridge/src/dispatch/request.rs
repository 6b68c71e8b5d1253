//! Request envelope parsing.
//!
//! Parsing happens in two phases, mirroring the protocol's loose envelope:
//! first only the `type` discriminant is read (defaulting to empty when
//! absent), then the payload is re-parsed into the operation's typed
//! request. Fields the peer omits take their zero values, so a missing
//! `entry` surfaces later as a store miss rather than a parse error.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::errors::DispatchError;

/// Password length used when a `create` request omits `length`.
pub const DEFAULT_GENERATED_LENGTH: usize = 24;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default, rename = "type")]
    message_type: String,
}

/// Payload of a `query` request.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    /// Substring looked up over full entry paths.
    #[serde(default)]
    pub query: String,
}

/// Payload of a `queryHost` request.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HostQueryRequest {
    /// Hostname matched against entry path segments.
    #[serde(default)]
    pub host: String,
}

/// Payload of requests addressing a single entry (`getLogin`, `getData`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EntryRequest {
    /// Full entry name.
    #[serde(default)]
    pub entry: String,
}

/// Payload of a `create` request.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreateRequest {
    /// Name for the new entry.
    #[serde(default)]
    pub entry_name: String,
    /// Login stored in the new entry's metadata.
    #[serde(default)]
    pub login: String,
    /// Password used verbatim when `generate` is false.
    #[serde(default)]
    pub password: String,
    /// Whether to generate the password instead of using `password`.
    #[serde(default)]
    pub generate: bool,
    /// Length of a generated password.
    #[serde(default = "default_generated_length")]
    pub length: usize,
    /// Whether generated passwords may include punctuation.
    #[serde(default)]
    pub use_symbols: bool,
}

/// Payload of a `copyToClipboard` request.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CopyRequest {
    /// Full entry name.
    #[serde(default)]
    pub entry: String,
    /// Optional metadata key selecting a sub-field instead of the password.
    #[serde(default)]
    pub key: Option<String>,
}

/// One parsed protocol request.
///
/// The set of operations is closed: an unrecognised discriminant is
/// rejected at parse time, so handler dispatch is an exhaustive match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `getVersion` — report the helper version triple.
    GetVersion,
    /// `query` — substring search over entry paths.
    Query(QueryRequest),
    /// `queryHost` — domain-boundary-aware host search.
    QueryHost(HostQueryRequest),
    /// `getLogin` — resolve username/password for one entry.
    GetLogin(EntryRequest),
    /// `getData` — return an entry's metadata (or TOTP fields).
    GetData(EntryRequest),
    /// `create` — store a new secret, never overwriting.
    Create(CreateRequest),
    /// `copyToClipboard` — hand a resolved value to the clipboard.
    CopyToClipboard(CopyRequest),
}

impl Request {
    /// Parses a JSON payload into a typed request.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedJson`] for syntactically invalid
    /// JSON and [`DispatchError::UnknownType`] for an absent or
    /// unrecognised discriminant.
    pub fn parse(payload: &[u8]) -> Result<Self, DispatchError> {
        let envelope: Envelope =
            serde_json::from_slice(payload).map_err(DispatchError::malformed_json)?;
        match envelope.message_type.as_str() {
            "getVersion" => Ok(Self::GetVersion),
            "query" => Ok(Self::Query(parse_body(payload)?)),
            "queryHost" => Ok(Self::QueryHost(parse_body(payload)?)),
            "getLogin" => Ok(Self::GetLogin(parse_body(payload)?)),
            "getData" => Ok(Self::GetData(parse_body(payload)?)),
            "create" => Ok(Self::Create(parse_body(payload)?)),
            "copyToClipboard" => Ok(Self::CopyToClipboard(parse_body(payload)?)),
            other => Err(DispatchError::unknown_type(other)),
        }
    }

    /// Canonical discriminant of this request, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::GetVersion => "getVersion",
            Self::Query(_) => "query",
            Self::QueryHost(_) => "queryHost",
            Self::GetLogin(_) => "getLogin",
            Self::GetData(_) => "getData",
            Self::Create(_) => "create",
            Self::CopyToClipboard(_) => "copyToClipboard",
        }
    }
}

fn parse_body<T: DeserializeOwned>(payload: &[u8]) -> Result<T, DispatchError> {
    serde_json::from_slice(payload).map_err(DispatchError::malformed_json)
}

const fn default_generated_length() -> usize {
    DEFAULT_GENERATED_LENGTH
}
