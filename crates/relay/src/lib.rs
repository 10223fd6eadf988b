//! An asynchronous relay between raw HTTP transports and request handlers
//!
//! This crate sits between a byte-oriented HTTP server transport and an
//! application-level handler function. It adapts one inbound request/response
//! pair into a handler-friendly request value, invokes a single user-supplied
//! handler, and writes whatever the handler returns back onto the transport,
//! handling text, fixed-binary and streamed bodies, HEAD semantics, default
//! status/header inference and failure cleanup. It guarantees that exactly
//! one well-formed response (or a bare `500`) is produced for every request,
//! exactly once.
//!
//! # Features
//!
//! - Per-exchange lifecycle state machine with a terminal state on every path
//! - Closed set of response body shapes, dispatched by exhaustive match
//! - Copy-through streaming of request bodies with structural back-pressure
//! - HEAD suppression that still sends inferred headers
//! - Best-effort finalization that never lets one exchange crash the process
//! - Per-stage strategy overrides, configured once per server instance
//!
//! What this crate deliberately does NOT do: socket handling, TLS, header
//! parsing, routing, middleware, keep-alive management. The host server owns
//! all of that and talks to the relay through the [`transport::Transport`]
//! trait.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use futures::stream;
//! use http::{Method, Uri};
//! use relay_http::handler::make_handler;
//! use relay_http::lifecycle::{ExchangeDriver, InboundExchange};
//! use relay_http::protocol::{Request, RequestHead};
//! use relay_http::transport::MemoryTransport;
//! use tracing::{info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!     let driver = ExchangeDriver::new(handler);
//!
//!     // a real deployment receives this triple from its host server
//!     let head = RequestHead::new(Method::GET, Uri::from_static("/"));
//!     let transport = MemoryTransport::new();
//!     let exchange = InboundExchange::new(head, Box::pin(stream::empty()), transport.clone());
//!
//!     let state = driver.drive(exchange).await;
//!     info!(?state, status = ?transport.status(), "exchange complete");
//! }
//!
//! async fn hello_world(_request: Request) -> Result<&'static str, std::convert::Infallible> {
//!     Ok("Hello World!\r\n")
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`lifecycle`]: the per-exchange orchestrator and its strategy table
//! - [`adapter`]: raw inbound pair → handler-facing request
//! - [`writer`]: response/body writing and error-path finalization
//! - [`transport`]: the seam to the host server, plus the state-tracking
//!   [`transport::Outbound`] wrapper
//! - [`protocol`]: requests, responses, bodies and the error taxonomy
//! - [`handler`]: the handler contract and the async-fn adapter
//!
//! # Error Handling
//!
//! Every stage has its own error type, rooted at
//! [`protocol::RelayError`]:
//!
//! - [`protocol::AdaptError`]: inbound adaptation and body-read errors
//! - [`protocol::WriteError`]: head/body write errors
//!
//! All of them funnel into the one per-exchange error callback; finalization
//! errors are reported there too and then swallowed.

pub mod adapter;
pub mod handler;
pub mod lifecycle;
pub mod protocol;
pub mod transport;
pub mod writer;
