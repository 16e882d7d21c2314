use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Failures while receiving a request.
///
/// Malformed header lines and unusable `content-length` values are recovered
/// inside the parser and never show up here.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("connection closed before the request was complete, received {received} bytes")]
    PrematureClose { received: usize },

    #[error("no data received within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn premature_close(received: usize) -> Self {
        Self::PrematureClose { received }
    }

    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    /// Returns true if the peer went away before a full request arrived.
    pub fn is_premature_close(&self) -> bool {
        matches!(self, Self::PrematureClose { .. })
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("response not written within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
