//! Error types for request parsing and dispatch failures.
//!
//! Several display texts here are part of the observable protocol contract
//! (clients and the end-to-end tests match on them); those variants carry a
//! note saying so. When a handler fails, the error bubbles to the session
//! boundary and no response frame is written at all.

use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::otp::OtpError;
use crate::secret::FieldError;
use crate::store::StoreError;

/// Errors surfaced while parsing or dispatching one request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The payload is not valid JSON for the expected shape.
    ///
    /// Contract text: `failed to unmarshal JSON message: <reason>`.
    #[error("failed to unmarshal JSON message: {source}")]
    MalformedJson {
        /// The underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The `type` discriminant is absent or names no known operation.
    ///
    /// Contract text: `unknown message of type '<type>'`.
    #[error("unknown message of type '{message_type}'")]
    UnknownType {
        /// The rejected discriminant (possibly empty).
        message_type: String,
    },

    /// A referenced entry could not be fetched from the store.
    ///
    /// Contract text: `failed to get secret: Entry is not in the password
    /// store`.
    #[error("failed to get secret: {source}")]
    GetSecret {
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },

    /// A named sub-field was requested but is absent from the metadata.
    ///
    /// Contract text: `failed to get secret sub entry: key not found in
    /// YAML document`.
    #[error("failed to get secret sub entry: {source}")]
    GetSubEntry {
        /// The underlying field lookup failure.
        #[source]
        source: FieldError,
    },

    /// Creation targeted an entry name that already exists.
    ///
    /// Contract text: `secret <name> already exists`.
    #[error("secret {name} already exists")]
    AlreadyExists {
        /// The conflicting entry name.
        name: String,
    },

    /// Persisting a newly created secret failed.
    #[error("failed to store secret: {source}")]
    StoreSecret {
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },

    /// Enumerating store entries for a query failed.
    #[error("failed to list store entries: {source}")]
    ListEntries {
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },

    /// TOTP derivation failed for a TOTP-bearing secret.
    #[error("failed to compute one-time code: {0}")]
    Otp(#[from] OtpError),

    /// The clipboard collaborator rejected the value.
    #[error("failed to copy to clipboard: {0}")]
    Clipboard(#[from] ClipboardError),

    /// The response object could not be serialized.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(serde_json::Error),
}

impl DispatchError {
    /// Creates a malformed JSON error from a serde failure.
    #[must_use]
    pub fn malformed_json(source: serde_json::Error) -> Self {
        Self::MalformedJson { source }
    }

    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(message_type: impl Into<String>) -> Self {
        Self::UnknownType {
            message_type: message_type.into(),
        }
    }

    /// Wraps a store failure from a secret fetch.
    #[must_use]
    pub fn get_secret(source: StoreError) -> Self {
        Self::GetSecret { source }
    }

    /// Wraps a field lookup failure from a sub-entry fetch.
    #[must_use]
    pub const fn get_sub_entry(source: FieldError) -> Self {
        Self::GetSubEntry { source }
    }

    /// Creates a creation conflict error.
    #[must_use]
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }

    /// Wraps a store failure from persisting a secret.
    #[must_use]
    pub fn store_secret(source: StoreError) -> Self {
        Self::StoreSecret { source }
    }

    /// Wraps a store failure from listing entries.
    #[must_use]
    pub fn list_entries(source: StoreError) -> Self {
        Self::ListEntries { source }
    }

    /// Wraps a response serialization failure.
    #[must_use]
    pub const fn serialize_response(source: serde_json::Error) -> Self {
        Self::SerializeResponse(source)
    }
}
