//! Outbound response values.
//!
//! [`Response`] is the descriptor a handler returns: everything in it is
//! optional, and whatever is missing is inferred by the response writer.
//! [`ResponseHead`] is the status/header pair actually sent to the transport,
//! using `http::Response<()>` with an empty body placeholder.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http::header::{HeaderValue, IntoHeaderName};

use crate::protocol::body::ResponseBody;

/// Type alias for the head of an outbound response.
pub type ResponseHead = http::Response<()>;

/// A handler's response descriptor.
///
/// Status and headers are optional; the body defaults to
/// [`ResponseBody::Empty`]. The response writer fills in whatever the handler
/// left out and never overrides what it set.
#[derive(Debug, Default)]
pub struct Response {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: ResponseBody,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Takes the body out, leaving [`ResponseBody::Empty`] behind.
    ///
    /// The body is single-use; the writer takes it exactly once.
    pub fn take_body(&mut self) -> ResponseBody {
        std::mem::take(&mut self.body)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_header<K>(mut self, name: K, value: HeaderValue) -> Self
    where
        K: IntoHeaderName,
    {
        self.headers.append(name, value);
        self
    }

    pub fn with_body<B>(mut self, body: B) -> Self
    where
        B: Into<ResponseBody>,
    {
        self.body = body.into();
        self
    }
}

impl From<ResponseBody> for Response {
    fn from(body: ResponseBody) -> Self {
        Self { status: None, headers: HeaderMap::new(), body }
    }
}

/// A handler that resolves with nothing produces the empty response.
impl From<()> for Response {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<&'static str> for Response {
    fn from(value: &'static str) -> Self {
        Self::from(ResponseBody::from(value))
    }
}

impl From<String> for Response {
    fn from(value: String) -> Self {
        Self::from(ResponseBody::from(value))
    }
}

impl From<Bytes> for Response {
    fn from(value: Bytes) -> Self {
        Self::from(ResponseBody::from(value))
    }
}
