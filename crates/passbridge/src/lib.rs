//! Native-messaging bridge between a browser extension and a password store.
//!
//! The browser spawns the `passbridge` binary and speaks a length-prefixed
//! binary protocol over the helper's stdin/stdout: each frame is a 4-byte
//! little-endian payload length followed by exactly that many bytes of JSON.
//! The helper reads one frame at a time, routes the request by its `type`
//! discriminant to a handler operating against the injected [`store::Store`],
//! and writes one framed JSON response back. On any failure no frame is
//! written at all; the peer treats silence as the error signal.
//!
//! The crate is organised around that pipeline:
//!
//! - [`transport`] frames and de-frames messages on the byte streams.
//! - [`dispatch`] parses the JSON envelope and runs the operation handlers.
//! - [`secret`] models a stored credential (password line plus YAML
//!   metadata) and its field-resolution rules.
//! - [`query`] matches entry paths against substring and hostname queries.
//! - [`otp`] derives time-based one-time codes from `otpauth:` URIs.
//! - [`pwgen`], [`clipboard`] and [`store`] are the collaborator seams the
//!   dispatcher calls into.
//! - [`api`] ties the pieces into the one-request-at-a-time serve loop.

pub mod api;
pub mod clipboard;
pub mod dispatch;
pub mod otp;
pub mod pwgen;
pub mod query;
pub mod secret;
pub mod store;
pub mod telemetry;
pub mod transport;

pub use api::{Api, ApiError, ServeOutcome};
pub use dispatch::{DispatchError, Dispatcher};
pub use secret::Secret;
pub use store::{FsStore, MemoryStore, Store, StoreError};
pub use transport::{TransportError, read_message, write_message};
