use bytes::Bytes;
use http::header;
use http::header::HeaderValue;
use http_body_util::BodyExt;
use tracing::error;

use crate::protocol::WriteError;
use crate::protocol::body::ResponseBody;
use crate::transport::{Outbound, Transport};

/// Writes a response body, dispatching on its shape.
///
/// Content-type and content-length are defaults, never overrides: a value
/// the handler already set always wins, and a handler-declared length that
/// disagrees with the actual bytes is the handler's responsibility. For HEAD
/// requests the inferred headers are still applied but no payload byte is
/// written.
///
/// Every branch either ends the transport or returns an error; the response
/// writer still re-checks afterwards so finalization is guaranteed
/// regardless of which branch ran.
pub async fn write_body<T>(outbound: &mut Outbound<T>, body: ResponseBody, is_head: bool) -> Result<(), WriteError>
where
    T: Transport,
{
    match body {
        ResponseBody::Empty => outbound.end().await,

        ResponseBody::Text(text) => {
            if !outbound.headers_sent() {
                default_content_type(outbound, mime::TEXT_PLAIN_UTF_8.as_ref());
            }
            write_buffer(outbound, Bytes::from(text), is_head).await
        }

        ResponseBody::Binary(bytes) => {
            if !outbound.headers_sent() {
                default_content_type(outbound, mime::APPLICATION_OCTET_STREAM.as_ref());
            }
            write_buffer(outbound, bytes, is_head).await
        }

        ResponseBody::Stream(mut stream) => {
            if !outbound.headers_sent() {
                default_content_type(outbound, mime::APPLICATION_OCTET_STREAM.as_ref());
            }

            if is_head {
                // headers only; the stream is never consumed
                return outbound.end().await;
            }

            loop {
                match stream.frame().await {
                    Some(Ok(frame)) => match frame.into_data() {
                        // a transport failure here drops the stream with us,
                        // so the source is never left dangling
                        Ok(data) => outbound.send_data(data).await?,
                        Err(_frame) => {
                            outbound.abort();
                            return Err(WriteError::invalid_body("unexpected non-data frame in response body"));
                        }
                    },
                    Some(Err(e)) => {
                        error!(cause = %e, "response body stream failed, aborting transport");
                        outbound.abort();
                        return Err(WriteError::invalid_body(format!("response body stream failed: {e}")));
                    }
                    None => return outbound.end().await,
                }
            }
        }
    }
}

async fn write_buffer<T>(outbound: &mut Outbound<T>, bytes: Bytes, is_head: bool) -> Result<(), WriteError>
where
    T: Transport,
{
    if !outbound.headers_sent() {
        let headers = outbound.head_mut().headers_mut();
        if !headers.contains_key(header::CONTENT_LENGTH) {
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
        }
    }

    if is_head {
        return outbound.end().await;
    }

    outbound.send_data(bytes).await?;
    outbound.end().await
}

fn default_content_type<T>(outbound: &mut Outbound<T>, value: &str)
where
    T: Transport,
{
    let headers = outbound.head_mut().headers_mut();
    if !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(header::CONTENT_TYPE, value.parse().unwrap());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use http_body::Frame;
    use http_body_util::StreamBody;
    use std::io;

    fn stream_of(chunks: Vec<Result<Frame<Bytes>, io::Error>>) -> ResponseBody {
        ResponseBody::stream(StreamBody::new(futures::stream::iter(chunks)))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn empty_body_just_ends() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());

        write_body(&mut outbound, ResponseBody::Empty, false).await.unwrap();

        assert!(transport.is_finished());
        assert!(transport.payload().is_empty());
        assert!(!transport.headers().unwrap().contains_key(header::CONTENT_TYPE));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn text_defaults_content_type_and_length() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());

        write_body(&mut outbound, ResponseBody::from("hello"), false).await.unwrap();

        let headers = transport.headers().unwrap();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");
        assert_eq!(headers.get(header::CONTENT_LENGTH).unwrap(), "5");
        assert_eq!(transport.payload(), Bytes::from_static(b"hello"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn handler_set_content_type_wins() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());
        outbound.head_mut().headers_mut().insert(header::CONTENT_TYPE, "text/html".parse().unwrap());

        write_body(&mut outbound, ResponseBody::from("<p>hi</p>"), false).await.unwrap();

        assert_eq!(transport.headers().unwrap().get(header::CONTENT_TYPE).unwrap(), "text/html");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn binary_round_trips_with_exact_length() {
        let payload = Bytes::from(vec![7u8; 1024]);
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());

        write_body(&mut outbound, ResponseBody::from(payload.clone()), false).await.unwrap();

        let headers = transport.headers().unwrap();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/octet-stream");
        assert_eq!(headers.get(header::CONTENT_LENGTH).unwrap(), "1024");
        assert_eq!(transport.payload(), payload);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn head_request_sends_headers_but_no_payload() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());

        write_body(&mut outbound, ResponseBody::from("ok"), true).await.unwrap();

        assert_eq!(transport.headers().unwrap().get(header::CONTENT_LENGTH).unwrap(), "2");
        assert!(transport.payload().is_empty());
        assert!(transport.is_finished());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn stream_body_is_forwarded_chunk_by_chunk() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());
        let body = stream_of(vec![
            Ok(Frame::data(Bytes::from_static(b"chunk-a"))),
            Ok(Frame::data(Bytes::from_static(b"chunk-b"))),
        ]);

        write_body(&mut outbound, body, false).await.unwrap();

        let headers = transport.headers().unwrap();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/octet-stream");
        assert!(!headers.contains_key(header::CONTENT_LENGTH));
        assert_eq!(transport.payload(), Bytes::from_static(b"chunk-achunk-b"));
        assert!(transport.is_finished());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn head_request_never_consumes_the_stream() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());
        let body = stream_of(vec![Ok(Frame::data(Bytes::from_static(b"unread")))]);

        write_body(&mut outbound, body, true).await.unwrap();

        assert!(transport.payload().is_empty());
        assert!(transport.is_finished());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn stream_error_aborts_after_written_prefix() {
        let transport = MemoryTransport::new();
        let mut outbound = Outbound::new(transport.clone());
        let body = stream_of(vec![
            Ok(Frame::data(Bytes::from_static(b"before"))),
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "source died")),
            Ok(Frame::data(Bytes::from_static(b"after"))),
        ]);

        let result = write_body(&mut outbound, body, false).await;

        assert!(matches!(result.unwrap_err(), WriteError::InvalidBody { .. }));
        assert!(transport.is_aborted());
        assert!(!transport.is_finished());
        assert_eq!(transport.payload(), Bytes::from_static(b"before"));
    }
}
