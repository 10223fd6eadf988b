//! The seam to the host server.
//!
//! The relay never touches sockets. The host server implements [`Transport`]
//! for the outbound half of one exchange and hands it over together with the
//! parsed request head and the inbound byte stream. Everything the relay
//! writes goes through [`Outbound`], a wrapper that owns the exchange's
//! [`TransportState`] and checks it before every mutating operation, so no
//! component ever double-writes headers or double-ends the stream.
//!
//! [`MemoryTransport`] is the in-repo reference implementation, used by the
//! test suite and for embedding.

use std::io;

use async_trait::async_trait;
use bytes::Bytes;

use crate::protocol::ResponseHead;

mod outbound;
pub use outbound::Outbound;
pub use outbound::TransportState;

mod memory;
pub use memory::MemoryTransport;

/// Outbound half of one exchange, implemented by the host server.
///
/// The relay calls these methods in order: [`send_head`](Transport::send_head)
/// at most once, any number of [`send_data`](Transport::send_data) calls,
/// then [`finish`](Transport::finish). [`terminal`](Transport::terminal)
/// resolves exactly once, when the exchange is fully flushed or has errored;
/// implementations must release any completion listeners on every exit path.
#[async_trait]
pub trait Transport: Send {
    /// Writes the status line and headers.
    async fn send_head(&mut self, head: ResponseHead) -> io::Result<()>;

    /// Writes one chunk of payload. Completion signals write-readiness, which
    /// is what gates how fast a streamed body is drained.
    async fn send_data(&mut self, data: Bytes) -> io::Result<()>;

    /// Marks the response complete and flushes buffered output.
    async fn finish(&mut self) -> io::Result<()>;

    /// Resolves when the exchange has reached its terminal state.
    async fn terminal(&mut self) -> io::Result<()>;

    /// Tears the exchange down mid-stream. Must not block; the transport is
    /// unusable for this exchange afterwards.
    fn abort(&mut self);
}
