//! The application-facing handler contract.
//!
//! A handler is a single async function from [`Request`] to anything that
//! converts into a [`Response`], or an error. [`make_handler`] adapts a
//! plain async function into a [`Handler`].

use async_trait::async_trait;

use crate::protocol::{BoxError, Request, Response};

#[async_trait]
pub trait Handler: Send + Sync {
    /// What the handler resolves with; converted into a [`Response`] by the
    /// driver. `()` stands for "no response value".
    type Value: Into<Response> + Send;
    type Error: Into<BoxError> + Send;

    async fn call(&self, request: Request) -> Result<Self::Value, Self::Error>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut, R, E> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send,
    R: Into<Response> + Send,
    E: Into<BoxError> + Send,
{
    type Value = R;
    type Error = E;

    async fn call(&self, request: Request) -> Result<R, E> {
        (self.f)(request).await
    }
}

pub fn make_handler<F, Fut, R, E>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send,
    R: Into<Response> + Send,
    E: Into<BoxError> + Send,
{
    HandlerFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestHead;
    use crate::protocol::body::InboundBody;
    use http::{Method, Uri};

    fn empty_request() -> Request {
        let (body, _pump) = InboundBody::channel(Box::pin(futures::stream::empty()));
        RequestHead::new(Method::GET, Uri::from_static("/")).into_request(body)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn adapts_a_plain_async_function() {
        let handler = make_handler(|_request: Request| async { Ok::<_, BoxError>("hi") });

        let value = handler.call(empty_request()).await.unwrap();
        let response: Response = value.into();
        assert!(!response.body().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn propagates_handler_errors() {
        let handler = make_handler(|_request: Request| async { Err::<Response, BoxError>("boom".into()) });

        assert!(handler.call(empty_request()).await.is_err());
    }
}
