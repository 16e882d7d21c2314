//! A fully received request.

use bytes::Bytes;

use crate::protocol::{HeadLine, HeaderFields};

/// The outcome of parsing one request: its headline, header fields, the raw
/// header block they were read from, and a body of exactly the declared
/// length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    head_line: HeadLine,
    headers: HeaderFields,
    headers_raw: Bytes,
    body: Bytes,
}

impl ParsedRequest {
    pub fn new(head_line: HeadLine, headers: HeaderFields, headers_raw: Bytes, body: Bytes) -> Self {
        Self { head_line, headers, headers_raw, body }
    }

    pub fn head_line(&self) -> &HeadLine {
        &self.head_line
    }

    pub fn method(&self) -> &[u8] {
        self.head_line.method()
    }

    pub fn target(&self) -> &[u8] {
        self.head_line.target()
    }

    pub fn headers(&self) -> &HeaderFields {
        &self.headers
    }

    /// The header block as received, without the blank-line delimiter.
    pub fn headers_raw(&self) -> &Bytes {
        &self.headers_raw
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}
