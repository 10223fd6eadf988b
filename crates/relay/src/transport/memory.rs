use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};

use super::Transport;
use crate::protocol::ResponseHead;

/// In-memory [`Transport`] that records everything written to it.
///
/// Cloning yields a handle onto the same recording, so a test can keep one
/// half while the relay consumes the other. Backs the test suite and the
/// embedding example; real deployments implement [`Transport`] over their own
/// connection type instead.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    head: Option<ResponseHead>,
    payload: BytesMut,
    finish_count: usize,
    aborted: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.inner.lock().unwrap().head.as_ref().map(|head| head.status())
    }

    pub fn headers(&self) -> Option<HeaderMap> {
        self.inner.lock().unwrap().head.as_ref().map(|head| head.headers().clone())
    }

    pub fn payload(&self) -> Bytes {
        Bytes::from(self.inner.lock().unwrap().payload.clone())
    }

    pub fn is_finished(&self) -> bool {
        self.inner.lock().unwrap().finish_count > 0
    }

    pub fn finish_count(&self) -> usize {
        self.inner.lock().unwrap().finish_count
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.lock().unwrap().aborted
    }

    pub fn is_terminal(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.finish_count > 0 || inner.aborted
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send_head(&mut self, head: ResponseHead) -> io::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.head.is_some() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "response head already sent"));
        }
        inner.head = Some(head);
        Ok(())
    }

    async fn send_data(&mut self, data: Bytes) -> io::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.finish_count > 0 || inner.aborted {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "response already terminated"));
        }
        inner.payload.extend_from_slice(&data);
        Ok(())
    }

    async fn finish(&mut self) -> io::Result<()> {
        self.inner.lock().unwrap().finish_count += 1;
        Ok(())
    }

    async fn terminal(&mut self) -> io::Result<()> {
        if self.is_terminal() {
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::NotConnected, "response was never finished"))
        }
    }

    fn abort(&mut self) {
        self.inner.lock().unwrap().aborted = true;
    }
}
