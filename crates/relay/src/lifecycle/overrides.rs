use std::fmt;

use futures::future::BoxFuture;

use super::Failure;
use crate::protocol::body::{ByteStream, InboundPump};
use crate::protocol::{AdaptError, Request, RequestHead, Response, WriteError};
use crate::transport::Outbound;

/// Replaces the built-in request adaptation.
pub type AdaptFn =
    Box<dyn Fn(RequestHead, ByteStream) -> Result<(Request, InboundPump), AdaptError> + Send + Sync>;

/// Replaces the built-in response writer. The third argument is true for
/// HEAD requests.
pub type WriteFn<T> = Box<
    dyn for<'a> Fn(&'a mut Outbound<T>, &'a mut Response, bool) -> BoxFuture<'a, Result<(), WriteError>>
        + Send
        + Sync,
>;

/// Replaces the built-in finalizer.
pub type FinalizeFn<T> =
    Box<dyn for<'a> Fn(&'a mut Outbound<T>) -> BoxFuture<'a, Result<(), WriteError>> + Send + Sync>;

/// Receives every per-exchange failure.
pub type ErrorFn = Box<dyn Fn(Failure<'_>) + Send + Sync>;

/// Strategy table for one server instance.
///
/// Each entry independently replaces one built-in stage; unset entries fall
/// back to [`adapter::adapt`](crate::adapter::adapt),
/// [`writer::write`](crate::writer::write),
/// [`writer::finalize`](crate::writer::finalize) and a logging error hook.
/// Constructed once and passed to the driver; there is no ambient global
/// configuration.
pub struct Overrides<T> {
    pub adapt: Option<AdaptFn>,
    pub write: Option<WriteFn<T>>,
    pub finalize: Option<FinalizeFn<T>>,
    pub on_error: Option<ErrorFn>,
}

impl<T> Default for Overrides<T> {
    fn default() -> Self {
        Self { adapt: None, write: None, finalize: None, on_error: None }
    }
}

impl<T> Overrides<T> {
    pub fn with_adapt<F>(mut self, adapt: F) -> Self
    where
        F: Fn(RequestHead, ByteStream) -> Result<(Request, InboundPump), AdaptError> + Send + Sync + 'static,
    {
        self.adapt = Some(Box::new(adapt));
        self
    }

    pub fn with_write<F>(mut self, write: F) -> Self
    where
        F: for<'a> Fn(&'a mut Outbound<T>, &'a mut Response, bool) -> BoxFuture<'a, Result<(), WriteError>>
            + Send
            + Sync
            + 'static,
    {
        self.write = Some(Box::new(write));
        self
    }

    pub fn with_finalize<F>(mut self, finalize: F) -> Self
    where
        F: for<'a> Fn(&'a mut Outbound<T>) -> BoxFuture<'a, Result<(), WriteError>> + Send + Sync + 'static,
    {
        self.finalize = Some(Box::new(finalize));
        self
    }

    pub fn with_on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(Failure<'_>) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(on_error));
        self
    }
}

impl<T> fmt::Debug for Overrides<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("adapt", &self.adapt.is_some())
            .field("write", &self.write.is_some())
            .field("finalize", &self.finalize.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
