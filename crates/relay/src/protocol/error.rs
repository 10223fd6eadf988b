use std::error::Error;
use std::io;
use thiserror::Error;

/// Boxed error used at the handler seam.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Top-level error for a single exchange, tagged by the stage that failed.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("adapt error: {source}")]
    Adapt {
        #[from]
        source: AdaptError,
    },

    #[error("handler error: {source}")]
    Handler { source: BoxError },

    #[error("write error: {source}")]
    Write {
        #[from]
        source: WriteError,
    },

    #[error("finalize error: {source}")]
    Finalize { source: WriteError },
}

impl RelayError {
    pub fn handler<E: Into<BoxError>>(e: E) -> Self {
        Self::Handler { source: e.into() }
    }

    pub fn finalize(source: WriteError) -> Self {
        Self::Finalize { source }
    }
}

/// Errors raised while adapting the inbound side of an exchange.
///
/// Also the error type surfaced by reads on the adapted request body.
#[derive(Error, Debug)]
pub enum AdaptError {
    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("body forwarding canceled")]
    Canceled,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl AdaptError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors raised while writing the response head or body.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl WriteError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
