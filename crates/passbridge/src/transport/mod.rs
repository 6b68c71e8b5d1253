//! Length-prefixed message framing for the native-messaging streams.
//!
//! One frame on the wire is a 4-byte little-endian unsigned payload length
//! followed by exactly that many bytes of UTF-8 JSON. There are no
//! delimiters and no padding; a truncated header or payload poisons the
//! current frame and is surfaced as a [`TransportError`] rather than a
//! partial payload.

mod codec;
mod errors;

pub use self::codec::{LENGTH_PREFIX_BYTES, read_message, write_message};
pub use self::errors::TransportError;
