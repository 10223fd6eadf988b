use http::StatusCode;

use crate::protocol::WriteError;
use crate::transport::{Outbound, Transport};

/// Forces an exchange into a terminated state after a failure.
///
/// If nothing is on the wire yet, every staged header is discarded (a
/// handler or body writer may have staged some before failing) and a bare
/// `500` is sent with no body. If the head is already out, only the ending
/// matters: status and headers are immutable once sent, so no error details
/// are written into a half-sent response.
///
/// Idempotent and safe to call on an already-finalized transport. The caller
/// reports a returned error and swallows it; termination here is
/// best-effort, not guaranteed delivery.
pub async fn finalize<T>(outbound: &mut Outbound<T>) -> Result<(), WriteError>
where
    T: Transport,
{
    if !outbound.headers_sent() {
        outbound.reset_staged();
        *outbound.head_mut().status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        outbound.end().await?;
    } else if !outbound.ended() {
        outbound.end().await?;
    }

    outbound.wait_terminal().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn nothing_sent_becomes_a_bare_500() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());
        outbound.head_mut().headers_mut().insert("x-partial", "staged".parse().unwrap());

        finalize(&mut outbound).await.unwrap();

        assert_eq!(transport.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(transport.headers().unwrap().is_empty());
        assert!(transport.payload().is_empty());
        assert!(transport.is_finished());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn sent_head_is_left_alone_and_only_ended() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());
        *outbound.head_mut().status_mut() = StatusCode::OK;
        outbound.flush_head().await.unwrap();

        finalize(&mut outbound).await.unwrap();

        assert_eq!(transport.status(), Some(StatusCode::OK));
        assert!(transport.is_finished());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn finalizing_twice_is_idempotent() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());

        finalize(&mut outbound).await.unwrap();
        finalize(&mut outbound).await.unwrap();

        assert_eq!(transport.finish_count(), 1);
    }
}
