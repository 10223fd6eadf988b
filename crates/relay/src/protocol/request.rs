//! Inbound request values.
//!
//! The transport has already parsed the request line and headers; this module
//! only carries them across the seam. [`RequestHead`] is the owned copy the
//! driver keeps for the exchange's duration, and [`Request`] is what the
//! handler receives once the adapted body is attached.

use http::request::Parts;
use http::{HeaderMap, Method, Uri, Version};

use crate::protocol::body::InboundBody;

/// The request value passed to handlers.
pub type Request = http::Request<InboundBody>;

/// Method, target and headers of one inbound request, as supplied by the
/// transport. Copied verbatim, with no parsing, normalization or validation.
#[derive(Debug, Clone)]
pub struct RequestHead {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
}

impl RequestHead {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self { method, uri, version: Version::HTTP_11, headers: HeaderMap::new() }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// True when the request method suppresses response payload bytes.
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    /// Attaches the adapted body, producing the handler-facing request.
    pub fn into_request(self, body: InboundBody) -> Request {
        let mut request = http::Request::new(body);
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.version_mut() = self.version;
        *request.headers_mut() = self.headers;
        request
    }
}

/// Converts parsed request parts into a RequestHead.
impl From<Parts> for RequestHead {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self { method: parts.method, uri: parts.uri, version: parts.version, headers: parts.headers }
    }
}
