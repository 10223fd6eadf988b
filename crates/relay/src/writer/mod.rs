//! Writing responses back onto the transport.
//!
//! Three entry points, all conditioned on the exchange's
//! [`TransportState`](crate::transport::TransportState):
//!
//! - [`write`]: the full success path (status/header inference, body
//!   dispatch, guaranteed ending, terminal wait)
//! - [`write_body`]: body dispatch alone, one branch per
//!   [`ResponseBody`](crate::protocol::body::ResponseBody) shape
//! - [`finalize`]: the error path, best-effort termination with a bare
//!   `500` when nothing was sent yet
//!
//! Each is independently replaceable through
//! [`Overrides`](crate::lifecycle::Overrides).

mod body_writer;
pub use body_writer::write_body;

mod response_writer;
pub use response_writer::write;

mod finalizer;
pub use finalizer::finalize;
