use http::StatusCode;

use super::body_writer::write_body;
use crate::protocol::{Response, WriteError};
use crate::transport::{Outbound, Transport};

/// Writes a handler's response and waits for the transport to settle.
///
/// Each step is conditioned on the current transport state:
///
/// 1. Headers not yet sent: pick the status (the handler's if present,
///    otherwise `204` for a HEAD request or an absent body, else `200`)
///    and apply the handler's headers, later entries for a key overwriting
///    earlier ones.
/// 2. Transport not yet ended: delegate to the body writer, then end
///    explicitly if the body branch left the transport open.
/// 3. Suspend until the transport reaches its terminal state.
///
/// Calling this on an already-ended transport is a no-op that completes
/// immediately.
pub async fn write<T>(outbound: &mut Outbound<T>, response: &mut Response, is_head: bool) -> Result<(), WriteError>
where
    T: Transport,
{
    if outbound.ended() {
        return Ok(());
    }

    let body = response.take_body();

    if !outbound.headers_sent() {
        let status = match response.status() {
            Some(status) => status,
            None if is_head || body.is_empty() => StatusCode::NO_CONTENT,
            None => StatusCode::OK,
        };

        let head = outbound.head_mut();
        *head.status_mut() = status;
        for (name, value) in response.headers() {
            head.headers_mut().insert(name, value.clone());
        }
    }

    write_body(outbound, body, is_head).await?;

    if !outbound.ended() {
        outbound.end().await?;
    }

    outbound.wait_terminal().await
}
