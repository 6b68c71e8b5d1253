//! Frame codec: blocking reads and writes of length-prefixed messages.

use std::io::{self, Read, Write};

use super::errors::TransportError;

/// Number of bytes in the little-endian length prefix.
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// Reads one framed message from the stream.
///
/// Returns `Ok(None)` when the stream is cleanly closed before any header
/// byte arrives; that is the normal end of a native-messaging session, not
/// an error. A partially delivered header or payload is a framing failure
/// and no payload is ever returned for it.
///
/// # Errors
///
/// - [`TransportError::TruncatedHeader`] when 1-3 header bytes arrive
///   before end of stream.
/// - [`TransportError::TruncatedPayload`] when the payload ends short of
///   the length the header promised.
/// - [`TransportError::Io`] when the underlying read fails.
pub fn read_message<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, TransportError> {
    let mut header = [0_u8; LENGTH_PREFIX_BYTES];
    let header_bytes = read_full(reader, &mut header)?;
    if header_bytes == 0 {
        return Ok(None);
    }
    if header_bytes < LENGTH_PREFIX_BYTES {
        return Err(TransportError::TruncatedHeader);
    }

    let length = u32::from_le_bytes(header) as usize;
    let mut payload = vec![0_u8; length];
    let payload_bytes = read_full(reader, &mut payload)?;
    if payload_bytes < length {
        return Err(TransportError::TruncatedPayload);
    }

    Ok(Some(payload))
}

/// Writes one framed message to the stream and flushes it.
///
/// The length prefix and payload form a single logical write: nothing is
/// written when the payload cannot be framed.
///
/// # Errors
///
/// Returns [`TransportError::PayloadTooLarge`] when the payload length does
/// not fit in the 4-byte prefix, or [`TransportError::Io`] when the
/// underlying write fails.
pub fn write_message<W: Write>(writer: &mut W, payload: &[u8]) -> Result<(), TransportError> {
    let length = u32::try_from(payload.len())
        .map_err(|_| TransportError::PayloadTooLarge { size: payload.len() })?;

    writer.write_all(&length.to_le_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

/// Fills `buf` from the reader, retrying on interrupts.
///
/// Returns the number of bytes read, which is only less than `buf.len()`
/// when the stream ends early.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while let Some(remaining) = buf.get_mut(filled..) {
        if remaining.is_empty() {
            break;
        }
        match reader.read(remaining) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;

    use super::*;

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut framed = Vec::new();
        write_message(&mut framed, payload).expect("framing should succeed");
        framed
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"{}".as_slice())]
    #[case(br#"{"type":"getVersion"}"#.as_slice())]
    fn round_trips_payloads(#[case] payload: &[u8]) {
        let framed = frame(payload);
        let decoded = read_message(&mut Cursor::new(framed))
            .expect("read should succeed")
            .expect("frame should be present");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn encodes_length_little_endian() {
        let framed = frame(b"abcd");
        assert_eq!(framed.first_chunk::<4>(), Some(&[4, 0, 0, 0]));
    }

    #[test]
    fn clean_eof_yields_none() {
        let result = read_message(&mut Cursor::new(Vec::new())).expect("eof is not an error");
        assert!(result.is_none());
    }

    #[test]
    fn short_header_is_distinct_error() {
        let error = read_message(&mut Cursor::new(b" ".to_vec())).expect_err("expected error");
        assert_eq!(
            error.to_string(),
            "not enough bytes read to determine message size"
        );
    }

    #[test]
    fn short_payload_is_distinct_error() {
        // Header "1234" claims 0x34333231 bytes; only five arrive.
        let error =
            read_message(&mut Cursor::new(b"1234Xabcd".to_vec())).expect_err("expected error");
        assert_eq!(error.to_string(), "incomplete message read");
    }

    #[test]
    fn header_claiming_more_than_available_never_returns_partial_payload() {
        let mut framed = frame(b"full payload");
        framed.truncate(framed.len() - 3);
        let error = read_message(&mut Cursor::new(framed)).expect_err("expected error");
        assert!(matches!(error, TransportError::TruncatedPayload));
    }

    #[test]
    fn write_failure_propagates_as_io() {
        struct FailingWriter;
        impl std::io::Write for FailingWriter {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("sink closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let error = write_message(&mut FailingWriter, b"x").expect_err("expected error");
        assert!(matches!(error, TransportError::Io(_)));
    }
}
