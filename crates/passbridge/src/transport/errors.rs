//! Error types for frame encoding and decoding.

use std::io;

use thiserror::Error;

/// Errors surfaced while reading or writing a message frame.
///
/// The two truncation variants carry distinct, fixed display texts. Clients
/// and tests match on them to tell a torn length prefix apart from a torn
/// payload, so the wording must not change.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The stream ended before the 4-byte length prefix was complete.
    #[error("not enough bytes read to determine message size")]
    TruncatedHeader,

    /// The length prefix promised more payload bytes than the stream held.
    #[error("incomplete message read")]
    TruncatedPayload,

    /// Outbound payload does not fit in a 4-byte length prefix.
    #[error("message payload of {size} bytes exceeds frame capacity")]
    PayloadTooLarge {
        /// Size of the rejected payload in bytes.
        size: usize,
    },

    /// Underlying stream read or write failure.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
