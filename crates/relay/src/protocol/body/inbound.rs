//! Copy-through streaming of inbound request bodies.
//!
//! The adapter never hands the transport's stream to the handler directly.
//! Instead it splits the body into a consumer half and a producer half:
//!
//! - [`InboundBody`]: what the handler reads, implementing `http_body::Body`
//! - [`InboundPump`]: owns the raw stream and forwards chunks on demand
//!
//! The two halves communicate over a bounded channel. A chunk is pulled from
//! the raw stream only when the consumer asks for one, so back-pressure
//! propagates to the transport without the exchange ever buffering the whole
//! body. The driver runs the pump concurrently with the handler, which lets
//! the handler start reading at any point without losing leading bytes.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures::channel::{mpsc, oneshot};
use futures::stream::BoxStream;
use futures::{FutureExt, SinkExt, StreamExt};
use http_body::{Body, Frame};
use tracing::debug;

use crate::protocol::AdaptError;

/// Raw inbound body bytes as supplied by the transport.
pub type ByteStream = BoxStream<'static, Result<Bytes, std::io::Error>>;

enum ForwardItem {
    Chunk(Bytes),
    End,
    Failed(std::io::Error),
}

/// The request body handed to handlers.
///
/// Bytes arrive unmodified and in order from the raw inbound stream. The
/// body is finite, single-pass and not restartable.
pub struct InboundBody {
    signal: mpsc::Sender<oneshot::Sender<ForwardItem>>,
    receiving: Option<oneshot::Receiver<ForwardItem>>,
}

impl InboundBody {
    fn new(signal: mpsc::Sender<oneshot::Sender<ForwardItem>>) -> Self {
        Self { signal, receiving: None }
    }

    /// Creates the consumer/producer pair for one exchange's request body.
    pub fn channel(source: ByteStream) -> (InboundBody, InboundPump) {
        let (tx, receiver) = mpsc::channel(16);
        (InboundBody::new(tx), InboundPump { source, receiver, eof: false })
    }
}

/// Producer half of the copy-through channel.
///
/// Owned by the driver and polled concurrently with the handler via
/// [`forward`](InboundPump::forward).
pub struct InboundPump {
    source: ByteStream,
    receiver: mpsc::Receiver<oneshot::Sender<ForwardItem>>,
    eof: bool,
}

impl InboundPump {
    /// Forwards chunks from the raw stream until the body ends or the
    /// consumer goes away.
    ///
    /// A raw stream failure is delivered to the consumer as a read error and
    /// ends forwarding.
    pub async fn forward(&mut self) -> Result<(), AdaptError> {
        loop {
            if self.eof {
                return Ok(());
            }

            match self.receiver.next().await {
                Some(reply) => match self.source.next().await {
                    Some(Ok(bytes)) => {
                        let _ = reply.send(ForwardItem::Chunk(bytes));
                    }
                    Some(Err(e)) => {
                        debug!(cause = %e, "inbound stream failed, surfacing on body");
                        self.eof = true;
                        let _ = reply.send(ForwardItem::Failed(e));
                    }
                    None => {
                        self.eof = true;
                        let _ = reply.send(ForwardItem::End);
                    }
                },
                // handler dropped the body without reading to the end
                None => return Ok(()),
            }
        }
    }
}

impl Body for InboundBody {
    type Data = Bytes;
    type Error = AdaptError;

    fn poll_frame(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        loop {
            if let Some(receiver) = &mut self.receiving {
                return match ready!(receiver.poll_unpin(cx)) {
                    Ok(ForwardItem::Chunk(bytes)) => {
                        self.receiving.take();
                        Poll::Ready(Some(Ok(Frame::data(bytes))))
                    }
                    Ok(ForwardItem::End) => {
                        self.receiving.take();
                        Poll::Ready(None)
                    }
                    Ok(ForwardItem::Failed(e)) => {
                        self.receiving.take();
                        Poll::Ready(Some(Err(AdaptError::io(e))))
                    }
                    Err(_) => {
                        self.receiving.take();
                        Poll::Ready(Some(Err(AdaptError::Canceled)))
                    }
                };
            }

            match ready!(self.signal.poll_ready_unpin(cx)) {
                Ok(()) => {
                    let (tx, rx) = oneshot::channel();
                    match self.signal.start_send(tx) {
                        Ok(()) => {
                            self.receiving = Some(rx);
                        }
                        Err(e) => return Poll::Ready(Some(Err(AdaptError::invalid_body(e)))),
                    }
                }
                Err(e) => return Poll::Ready(Some(Err(AdaptError::invalid_body(e)))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::io;

    fn byte_stream(chunks: Vec<Result<Bytes, io::Error>>) -> ByteStream {
        Box::pin(futures::stream::iter(chunks))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn forwards_chunks_in_order() {
        let stream = byte_stream(vec![
            Ok(Bytes::from_static(b"alpha")),
            Ok(Bytes::from_static(b"beta")),
            Ok(Bytes::from_static(b"gamma")),
        ]);
        let (body, mut pump) = InboundBody::channel(stream);

        let (collected, forwarded) = tokio::join!(body.collect(), pump.forward());

        assert_eq!(collected.unwrap().to_bytes(), Bytes::from_static(b"alphabetagamma"));
        assert!(forwarded.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn source_error_surfaces_as_read_error() {
        let stream = byte_stream(vec![
            Ok(Bytes::from_static(b"lead")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let (mut body, mut pump) = InboundBody::channel(stream);

        let read = async {
            let first = body.frame().await.unwrap().unwrap().into_data().unwrap();
            assert_eq!(first, Bytes::from_static(b"lead"));
            body.frame().await.unwrap()
        };
        let (second, forwarded) = tokio::join!(read, pump.forward());

        assert!(matches!(second.unwrap_err(), AdaptError::Io { .. }));
        assert!(forwarded.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn dropped_pump_cancels_reads() {
        let stream = byte_stream(vec![Ok(Bytes::from_static(b"never"))]);
        let (body, pump) = InboundBody::channel(stream);
        drop(pump);

        assert!(body.collect().await.is_err());
    }
}
