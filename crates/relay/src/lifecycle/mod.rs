//! Per-exchange lifecycle orchestration.
//!
//! [`ExchangeDriver`] composes the adapter, the handler and the writers into
//! the state machine every exchange passes through:
//!
//! ```text
//! Received --adapt--> Adapted --handler--> Handled --write--> Written
//!     |                  |                    |                  |
//!     +------------------+----------+--------+------------------+
//!                                   v
//!                                Failed --finalize--> Finalized
//! ```
//!
//! `Written` and `Finalized` are terminal. Any failure is reported to the
//! error callback with whatever context is available, then the finalizer
//! runs unconditionally. A failure during finalization is reported to the
//! same callback and swallowed: one exchange's total failure never
//! propagates out of [`drive`](ExchangeDriver::drive).

use std::sync::Arc;

use tracing::{debug, error};

use crate::adapter;
use crate::handler::Handler;
use crate::protocol::body::ByteStream;
use crate::protocol::{RelayError, RequestHead, Response};
use crate::transport::{Outbound, Transport};
use crate::writer;

mod overrides;
pub use overrides::AdaptFn;
pub use overrides::ErrorFn;
pub use overrides::FinalizeFn;
pub use overrides::Overrides;
pub use overrides::WriteFn;

/// The raw pair for one exchange, as handed over by the transport layer:
/// the parsed request head, the inbound body bytes and the outbound handle.
pub struct InboundExchange<T> {
    pub head: RequestHead,
    pub body: ByteStream,
    pub transport: T,
}

impl<T> InboundExchange<T> {
    pub fn new(head: RequestHead, body: ByteStream, transport: T) -> Self {
        Self { head, body, transport }
    }
}

/// Observable states of a single exchange. `Failed` always transitions to
/// `Finalized`; only `Written` and `Finalized` are terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExchangeState {
    Received,
    Adapted,
    Handled,
    Written,
    Failed,
    Finalized,
}

/// Context handed to the error callback: always the error, plus the request
/// head and the handler's response when those stages were reached.
#[derive(Debug)]
pub struct Failure<'a> {
    pub error: &'a RelayError,
    pub request: Option<&'a RequestHead>,
    pub response: Option<&'a Response>,
}

/// Drives exchanges for one server instance.
///
/// The driver holds the handler and the strategy table; each call to
/// [`drive`](ExchangeDriver::drive) owns one exchange from arrival to its
/// terminal state. Exchanges are independent: nothing here is shared
/// between them beyond the driver itself, which is read-only while driving.
pub struct ExchangeDriver<H, T> {
    handler: Arc<H>,
    overrides: Overrides<T>,
}

impl<H, T> ExchangeDriver<H, T>
where
    H: Handler,
    T: Transport,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler, overrides: Overrides::default() }
    }

    pub fn with_overrides(handler: Arc<H>, overrides: Overrides<T>) -> Self {
        Self { handler, overrides }
    }

    /// Drives one exchange to its terminal state.
    ///
    /// Never panics or re-raises: every failure is routed to the error
    /// callback and the finalizer.
    pub async fn drive(&self, exchange: InboundExchange<T>) -> ExchangeState {
        let InboundExchange { head, body, transport } = exchange;
        let mut outbound = Outbound::new(transport);
        let is_head = head.is_head();

        debug!(state = ?ExchangeState::Received, method = %head.method(), uri = %head.uri(), "exchange received");

        let adapted = match &self.overrides.adapt {
            Some(adapt) => adapt(head.clone(), body),
            None => Ok(adapter::adapt(head.clone(), body)),
        };

        let (request, mut pump) = match adapted {
            Ok(adapted) => adapted,
            Err(e) => return self.fail(RelayError::from(e), Some(&head), None, &mut outbound).await,
        };
        debug!(state = ?ExchangeState::Adapted, "request adapted");

        // The handler and the inbound pump run concurrently: the handler may
        // read any amount of the request body while it executes, and the
        // pump is what feeds those reads.
        let handled = {
            tokio::pin! {
                let handler_future = self.handler.call(request);
                let pump_future = pump.forward();
            }

            let mut pump_running = true;
            loop {
                tokio::select! {
                    biased;
                    result = &mut handler_future => break result,
                    result = &mut pump_future, if pump_running => {
                        pump_running = false;
                        if let Err(e) = result {
                            debug!(cause = %e, "inbound body forwarding stopped");
                        }
                    }
                }
            }
        };

        match handled {
            Ok(value) => {
                let mut response = value.into();
                debug!(state = ?ExchangeState::Handled, "handler completed");

                let written = match &self.overrides.write {
                    Some(write) => write(&mut outbound, &mut response, is_head).await,
                    None => writer::write(&mut outbound, &mut response, is_head).await,
                };

                match written {
                    Ok(()) => {
                        debug!(state = ?ExchangeState::Written, "response written");
                        ExchangeState::Written
                    }
                    Err(e) => self.fail(RelayError::from(e), Some(&head), Some(&response), &mut outbound).await,
                }
            }
            Err(e) => self.fail(RelayError::handler(e), Some(&head), None, &mut outbound).await,
        }
    }

    async fn fail(
        &self,
        error: RelayError,
        request: Option<&RequestHead>,
        response: Option<&Response>,
        outbound: &mut Outbound<T>,
    ) -> ExchangeState {
        debug!(state = ?ExchangeState::Failed, "exchange failed");
        self.report(Failure { error: &error, request, response });

        let finalized = match &self.overrides.finalize {
            Some(finalize) => finalize(outbound).await,
            None => writer::finalize(outbound).await,
        };

        if let Err(e) = finalized {
            let finalize_error = RelayError::finalize(e);
            self.report(Failure { error: &finalize_error, request, response });
        }

        debug!(state = ?ExchangeState::Finalized, "exchange finalized");
        ExchangeState::Finalized
    }

    fn report(&self, failure: Failure<'_>) {
        match &self.overrides.on_error {
            Some(on_error) => on_error(failure),
            None => error!(cause = %failure.error, "exchange failed"),
        }
    }
}
