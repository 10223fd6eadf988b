//! Drives a few exchanges end to end against the in-memory transport.
//!
//! A real deployment implements [`relay_http::transport::Transport`] over its
//! own connection type and hands each parsed request to the driver; the flow
//! below is exactly that, minus the sockets.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream;
use http::{Method, StatusCode, Uri};
use http_body_util::BodyExt;
use relay_http::handler::make_handler;
use relay_http::lifecycle::{ExchangeDriver, InboundExchange};
use relay_http::protocol::{BoxError, Request, RequestHead, Response};
use relay_http::transport::MemoryTransport;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let handler = Arc::new(make_handler(echo));
    let driver = ExchangeDriver::new(handler);

    let transport = MemoryTransport::new();
    let head = RequestHead::new(Method::POST, Uri::from_static("/echo"));
    let body: Vec<Result<Bytes, std::io::Error>> = vec![Ok(Bytes::from_static(b"hello relay"))];
    let exchange = InboundExchange::new(head, Box::pin(stream::iter(body)), transport.clone());

    let state = driver.drive(exchange).await;
    info!(?state, status = ?transport.status(), payload = ?transport.payload(), "echo exchange");

    // HEAD requests get the same headers but no payload bytes
    let transport = MemoryTransport::new();
    let head = RequestHead::new(Method::HEAD, Uri::from_static("/echo"));
    let exchange = InboundExchange::new(head, Box::pin(stream::empty()), transport.clone());

    let state = driver.drive(exchange).await;
    info!(?state, status = ?transport.status(), payload = ?transport.payload(), "head exchange");
}

async fn echo(request: Request) -> Result<Response, BoxError> {
    let bytes = request.into_body().collect().await?.to_bytes();
    Ok(Response::new().with_status(StatusCode::OK).with_body(bytes))
}
