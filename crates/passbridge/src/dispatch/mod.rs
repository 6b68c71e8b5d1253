//! Request parsing and operation dispatch.
//!
//! One inbound JSON payload becomes one [`Request`], which the
//! [`Dispatcher`] resolves to a handler producing one outbound payload.
//! Handler failures surface as [`DispatchError`] values; the session layer
//! turns those into a closed session without writing a response frame.

mod errors;
mod request;
mod response;
mod router;

pub use errors::DispatchError;
pub use request::{
    CopyRequest, CreateRequest, DEFAULT_GENERATED_LENGTH, EntryRequest, HostQueryRequest,
    QueryRequest, Request,
};
pub use response::{LoginResponse, StatusResponse, TotpResponse, VersionResponse};
pub use router::Dispatcher;

/// Log target for dispatch events.
pub const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
