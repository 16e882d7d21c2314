//! HTTP request decoder module
//!
//! Adapts [`RequestParser`] to the [`Decoder`] trait so a connection can be
//! read through a [`FramedRead`](tokio_util::codec::FramedRead). Every byte
//! handed to [`decode`](Decoder::decode) is pushed into the parser as one
//! chunk, so the read buffer never keeps unparsed data around.
//!
//! # Example
//!
//! ```
//! use micro_echo::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//!
//! let mut buffer = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\n"[..]);
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! let mut buffer = BytesMut::from(&b"hi"[..]);
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(&request.body()[..], b"hi");
//! ```

use crate::codec::RequestParser;
use crate::ensure;
use crate::protocol::{ParseError, ParsedRequest};
use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

/// A decoder yielding exactly one [`ParsedRequest`].
///
/// After the request has been produced, further input is discarded.
#[derive(Debug)]
pub struct RequestDecoder {
    parser: Option<RequestParser>,
    max_header_size: Option<usize>,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a decoder that fails with [`ParseError::TooLargeHeader`] once
    /// the header block grows past `max_header_size` bytes.
    pub fn with_max_header_size(max_header_size: usize) -> Self {
        Self { max_header_size: Some(max_header_size), ..Default::default() }
    }

    /// Bytes consumed so far, `None` once the request has been produced.
    pub fn received(&self) -> Option<usize> {
        self.parser.as_ref().map(RequestParser::received)
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { parser: Some(RequestParser::new()), max_header_size: None }
    }
}

impl Decoder for RequestDecoder {
    type Item = ParsedRequest;
    type Error = ParseError;

    /// Pushes everything in `src` into the parser.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request is complete
    /// - `Ok(None)`: need more data, or the request was already produced
    /// - `Err(ParseError::TooLargeHeader)`: the header block exceeds the
    ///   configured limit
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let chunk = src.split();
        let Some(parser) = &mut self.parser else {
            trace!(discarded = chunk.len(), "request already decoded, drop bytes");
            return Ok(None);
        };

        parser.push_chunk(&chunk);

        if let Some(max_size) = self.max_header_size {
            // until the delimiter shows up every received byte is header
            let header_size = if parser.headers_finished() { parser.headers_raw().len() } else { parser.received() };
            ensure!(header_size <= max_size, ParseError::too_large_header(header_size, max_size));
        }

        if !parser.is_finished() {
            return Ok(None);
        }

        Ok(self.parser.take().and_then(RequestParser::into_request))
    }
}
