//! Session loop binding the transport to the dispatcher.
//!
//! One [`Api`] owns one framed byte stream pair for the lifetime of a
//! browser session. Frames are handled strictly in order; an error at
//! either layer ends the session before any partial response frame can
//! reach the peer.

use std::io::{Read, Write};

use tracing::{debug, info};

use crate::dispatch::{DispatchError, Dispatcher};
use crate::store::Store;
use crate::transport::{TransportError, read_message, write_message};

/// Log target for session events.
pub const API_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::api");

/// Errors terminating a session.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Reading or writing a frame failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A request could not be parsed or handled.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Outcome of handling a single inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// A request was read, handled, and answered.
    Handled,
    /// The peer closed the stream cleanly before sending another frame.
    Closed,
}

/// A request/response session over a framed byte stream pair.
pub struct Api<'a, S, R, W> {
    dispatcher: Dispatcher<'a>,
    store: S,
    reader: R,
    writer: W,
}

impl<'a, S, R, W> Api<'a, S, R, W>
where
    S: Store,
    R: Read,
    W: Write,
{
    /// Creates a session over the given store and streams.
    pub fn new(dispatcher: Dispatcher<'a>, store: S, reader: R, writer: W) -> Self {
        Self {
            dispatcher,
            store,
            reader,
            writer,
        }
    }

    /// Reads one frame, dispatches it, and writes the response frame.
    ///
    /// Returns [`ServeOutcome::Closed`] when the peer has shut the stream
    /// down cleanly.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the frame cannot be read, the request
    /// cannot be handled, or the response cannot be written. No response
    /// frame is written for a failed request.
    pub fn read_and_respond(&mut self) -> Result<ServeOutcome, ApiError> {
        let Some(payload) = read_message(&mut self.reader)? else {
            debug!(target: API_TARGET, "peer closed the stream");
            return Ok(ServeOutcome::Closed);
        };
        let response = self.dispatcher.respond(&mut self.store, &payload)?;
        write_message(&mut self.writer, &response)?;
        Ok(ServeOutcome::Handled)
    }

    /// Serves requests until the peer closes the stream.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] encountered; the session does not
    /// attempt to resynchronise after a failed frame.
    pub fn serve(&mut self) -> Result<(), ApiError> {
        let mut handled = 0_u64;
        loop {
            match self.read_and_respond()? {
                ServeOutcome::Handled => handled += 1,
                ServeOutcome::Closed => {
                    info!(target: API_TARGET, handled, "session complete");
                    return Ok(());
                }
            }
        }
    }
}
