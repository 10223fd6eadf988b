//! Shared protocol values for the relay.
//!
//! This module holds the types that cross component seams:
//!
//! - **Requests** ([`request`]): [`RequestHead`] as supplied by the
//!   transport, [`Request`] as seen by handlers
//! - **Responses** ([`response`]): the handler's [`Response`] descriptor and
//!   the [`ResponseHead`] actually written to the transport
//! - **Bodies** ([`body`]): copy-through inbound streaming and the closed
//!   [`body::ResponseBody`] variant set
//! - **Errors** ([`error`]): the per-stage error taxonomy rooted at
//!   [`RelayError`]
//!
//! Everything here is created when an exchange begins, consumed exactly
//! once, and discarded when the exchange ends. Nothing is shared across
//! exchanges.

mod error;
pub use error::AdaptError;
pub use error::BoxError;
pub use error::RelayError;
pub use error::WriteError;

mod request;
pub use request::Request;
pub use request::RequestHead;

mod response;
pub use response::Response;
pub use response::ResponseHead;

pub mod body;
