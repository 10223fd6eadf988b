//! Response body representations.
//!
//! A handler supplies its body as one of a closed set of shapes. Dispatch in
//! the body writer is an exhaustive match over this enum, so a shape the
//! writer cannot handle does not exist at runtime.

use std::fmt;

use bytes::Bytes;
use http_body::Body;
use http_body_util::BodyExt;
use http_body_util::combinators::UnsyncBoxBody;

use crate::protocol::BoxError;

/// The body of an outbound response.
///
/// - `Empty`: no payload.
/// - `Text`: UTF-8 text, defaulting the content-type to `text/plain`.
/// - `Binary`: a pre-materialized byte buffer with a known length.
/// - `Stream`: lazily produced bytes, forwarded chunk by chunk under the
///   transport's back-pressure.
#[derive(Default)]
pub enum ResponseBody {
    #[default]
    Empty,
    Text(String),
    Binary(Bytes),
    Stream(UnsyncBoxBody<Bytes, BoxError>),
}

impl ResponseBody {
    /// Wraps any streaming body whose data chunks are [`Bytes`].
    pub fn stream<B>(body: B) -> Self
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self::Stream(UnsyncBoxBody::new(body.map_err(Into::into)))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Binary(bytes) => f.debug_tuple("Binary").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<()> for ResponseBody {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl From<&'static str> for ResponseBody {
    fn from(value: &'static str) -> Self {
        if value.is_empty() { Self::Empty } else { Self::Text(value.to_owned()) }
    }
}

impl From<String> for ResponseBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Bytes> for ResponseBody {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body::Frame;
    use http_body_util::StreamBody;
    use std::io;

    fn check_send<T: Send>() {}

    #[test]
    fn is_send() {
        check_send::<ResponseBody>();
    }

    #[test]
    fn conversions_pick_the_right_shape() {
        assert!(matches!(ResponseBody::from(()), ResponseBody::Empty));
        assert!(matches!(ResponseBody::from(""), ResponseBody::Empty));
        assert!(matches!(ResponseBody::from("ok"), ResponseBody::Text(_)));
        assert!(matches!(ResponseBody::from("ok".to_owned()), ResponseBody::Text(_)));
        assert!(matches!(ResponseBody::from(Bytes::from_static(b"ok")), ResponseBody::Binary(_)));
        assert!(matches!(ResponseBody::from(vec![1u8, 2, 3]), ResponseBody::Binary(_)));
    }

    #[test]
    fn stream_constructor_boxes_any_body() {
        let chunks: Vec<Result<_, io::Error>> = vec![Ok(Frame::data(Bytes::from_static(b"ok")))];
        let body = ResponseBody::stream(StreamBody::new(futures::stream::iter(chunks)));
        assert!(matches!(body, ResponseBody::Stream(_)));
        assert!(!body.is_empty());
    }
}
