//! Body streaming for both halves of an exchange.
//!
//! - [`InboundBody`] / [`InboundPump`]: demand-driven copy-through of the
//!   request body from the raw transport stream to the handler
//! - [`ResponseBody`]: the closed set of response body shapes a handler can
//!   return

mod inbound;
pub use inbound::ByteStream;
pub use inbound::InboundBody;
pub use inbound::InboundPump;

mod outbound;
pub use outbound::ResponseBody;
