//! The echo response.
//!
//! Every response has the same shape: `200 OK`, a `Server` header, a
//! `Connection: close` header and a `Content-Length` matching the body. The
//! body is the request body, byte for byte.

use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;

use crate::protocol::ParsedRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoResponse {
    status: StatusCode,
    server_name: Arc<str>,
    body: Bytes,
}

impl EchoResponse {
    pub fn new(server_name: Arc<str>, body: Bytes) -> Self {
        Self { status: StatusCode::OK, server_name, body }
    }

    /// Builds the response echoing `request`'s body.
    pub fn echo(server_name: Arc<str>, request: ParsedRequest) -> Self {
        Self::new(server_name, request.into_body())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The value written in the `Content-Length` header.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}
