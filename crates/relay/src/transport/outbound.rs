use bytes::Bytes;
use tracing::warn;

use super::Transport;
use crate::protocol::{ResponseHead, WriteError};

/// Write-side progress of one exchange.
///
/// Owned and updated exclusively by [`Outbound`]; every mutating operation
/// checks it first, which keeps the write sequence idempotent and ordered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing sent yet; the staged head is still mutable.
    Pending,
    /// Status line and headers are on the wire; they are immutable now.
    HeadersSent,
    /// The response is complete (or aborted); all writes are no-ops.
    Ended,
}

/// State-tracking wrapper around a raw [`Transport`].
///
/// The response head is staged locally and flushed right before the first
/// payload byte (or the end of an empty response), so status and headers stay
/// mutable until then, which is what the finalizer's defensive reset relies on.
pub struct Outbound<T> {
    transport: T,
    staged: ResponseHead,
    state: TransportState,
}

impl<T> Outbound<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self { transport, staged: ResponseHead::new(()), state: TransportState::Pending }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn headers_sent(&self) -> bool {
        self.state != TransportState::Pending
    }

    pub fn ended(&self) -> bool {
        self.state == TransportState::Ended
    }

    /// Staged response head. Mutable until the head is flushed; mutations
    /// after that point have no effect on the wire.
    pub fn head_mut(&mut self) -> &mut ResponseHead {
        &mut self.staged
    }

    /// Discards everything staged so far, restoring a default head.
    pub fn reset_staged(&mut self) {
        if self.headers_sent() {
            warn!("cannot reset a response head that is already on the wire");
            return;
        }
        self.staged = ResponseHead::new(());
    }

    /// Sends the staged head if it has not been sent yet.
    pub async fn flush_head(&mut self) -> Result<(), WriteError> {
        if self.headers_sent() {
            return Ok(());
        }
        let head = std::mem::replace(&mut self.staged, ResponseHead::new(()));
        self.transport.send_head(head).await?;
        self.state = TransportState::HeadersSent;
        Ok(())
    }

    /// Writes one payload chunk, flushing the head first if needed.
    pub async fn send_data(&mut self, data: Bytes) -> Result<(), WriteError> {
        if self.ended() {
            warn!("discarding payload chunk for an already ended response");
            return Ok(());
        }
        self.flush_head().await?;
        self.transport.send_data(data).await?;
        Ok(())
    }

    /// Completes the response. Idempotent.
    pub async fn end(&mut self) -> Result<(), WriteError> {
        if self.ended() {
            return Ok(());
        }
        self.flush_head().await?;
        self.transport.finish().await?;
        self.state = TransportState::Ended;
        Ok(())
    }

    /// Suspends until the transport reaches its terminal state.
    pub async fn wait_terminal(&mut self) -> Result<(), WriteError> {
        self.transport.terminal().await?;
        Ok(())
    }

    /// Tears the exchange down mid-stream.
    pub fn abort(&mut self) {
        self.transport.abort();
        self.state = TransportState::Ended;
    }

    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}
