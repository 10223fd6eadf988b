//! Adapts the raw inbound side of an exchange into the handler-facing
//! request value.
//!
//! Method, target and headers are carried over verbatim; the raw byte stream
//! is wrapped in the copy-through channel from [`crate::protocol::body`] so
//! the handler sees a generic readable body, decoupled from the transport's
//! stream type, while back-pressure still reaches the transport.

use crate::protocol::body::{ByteStream, InboundBody, InboundPump};
use crate::protocol::{Request, RequestHead};

/// Builds the request the handler will see.
///
/// Returns the request together with the pump that feeds its body; the
/// driver runs the pump concurrently with the handler. Adaptation itself has
/// no failure modes; transport-level stream errors surface later as read
/// errors on the body.
pub fn adapt(head: RequestHead, body: ByteStream) -> (Request, InboundPump) {
    let (inbound_body, pump) = InboundBody::channel(body);
    (head.into_request(inbound_body), pump)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Method, Uri, header};
    use http_body_util::BodyExt;
    use std::io;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn copies_head_fields_verbatim() {
        let mut head = RequestHead::new(Method::POST, Uri::from_static("/upload?kind=raw"));
        head.headers_mut().insert(header::CONTENT_TYPE, "application/json".parse().unwrap());

        let (request, _pump) = adapt(head, Box::pin(futures::stream::empty()));

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri(), &Uri::from_static("/upload?kind=raw"));
        assert_eq!(request.headers().get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn body_is_copied_through_in_order() {
        let chunks: Vec<Result<Bytes, io::Error>> =
            vec![Ok(Bytes::from_static(b"first,")), Ok(Bytes::from_static(b"second"))];
        let head = RequestHead::new(Method::POST, Uri::from_static("/"));

        let (request, mut pump) = adapt(head, Box::pin(futures::stream::iter(chunks)));

        let (collected, forwarded) = tokio::join!(request.into_body().collect(), pump.forward());
        assert_eq!(collected.unwrap().to_bytes(), Bytes::from_static(b"first,second"));
        assert!(forwarded.is_ok());
    }
}
