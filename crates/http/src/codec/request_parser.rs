//! Incremental parser for a single HTTP/1.1 request.
//!
//! The parser is fed with chunks of whatever size the transport delivers and
//! moves through three states:
//!
//! ```text
//! AwaitingHeaders -> HeadersComplete { content_length } -> BodyComplete
//! ```
//!
//! Headers are handled by [`HeaderBlockParser`]. Once they are complete the
//! content length is derived a single time, the bytes carried past the header
//! delimiter start the body, and later chunks extend it until the declared
//! length is reached. Anything beyond that length is dropped.

use bytes::Bytes;
use tracing::{debug, trace};

use crate::codec::body::LengthDecoder;
use crate::codec::header::HeaderBlockParser;
use crate::protocol::{HeadLine, HeaderFields, ParsedRequest};

/// Where a [`RequestParser`] is in its single request lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParserState {
    /// Header block not yet terminated by `\r\n\r\n`
    AwaitingHeaders,
    /// Headers parsed, collecting `content_length` body bytes
    HeadersComplete { content_length: u64 },
    /// The body has reached its declared length
    BodyComplete,
}

/// Parser for one request, fed chunk by chunk.
#[derive(Debug)]
pub struct RequestParser {
    header_parser: HeaderBlockParser,
    body_decoder: LengthDecoder,
    content_length: Option<u64>,
    state: ParserState,
    received: usize,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self {
            header_parser: HeaderBlockParser::new(),
            body_decoder: LengthDecoder::default(),
            content_length: None,
            state: ParserState::AwaitingHeaders,
            received: 0,
        }
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next chunk read from the connection.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.received += chunk.len();

        match self.state {
            ParserState::AwaitingHeaders => {
                self.header_parser.push_chunk(chunk);
                if self.header_parser.is_finished() {
                    self.on_headers_complete();
                }
            }
            ParserState::HeadersComplete { .. } => {
                let discarded = self.body_decoder.push_chunk(chunk);
                self.check_body(discarded);
            }
            ParserState::BodyComplete => {
                trace!(discarded = chunk.len(), "request already complete, drop chunk");
            }
        }
    }

    fn on_headers_complete(&mut self) {
        let content_length = self.header_parser.headers().content_length();
        self.content_length = Some(content_length);
        self.state = ParserState::HeadersComplete { content_length };
        debug!(content_length, "request headers complete");

        self.body_decoder = LengthDecoder::new(content_length);
        let carried = self.header_parser.take_body();
        let discarded = self.body_decoder.push_buf(carried);
        self.check_body(discarded);
    }

    fn check_body(&mut self, discarded: usize) {
        if discarded > 0 {
            trace!(discarded, "drop bytes past content length");
        }
        if self.body_decoder.is_finished() {
            self.state = ParserState::BodyComplete;
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// True once the body has reached the declared content length.
    pub fn is_finished(&self) -> bool {
        self.state == ParserState::BodyComplete
    }

    /// True once the header block has been parsed.
    pub fn headers_finished(&self) -> bool {
        self.state != ParserState::AwaitingHeaders
    }

    /// Total number of bytes pushed so far, including dropped ones.
    pub fn received(&self) -> usize {
        self.received
    }

    /// The declared body length, known once the headers are complete.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn head_line(&self) -> &HeadLine {
        self.header_parser.head_line()
    }

    /// See [`HeadLine::method`].
    pub fn method(&self) -> &[u8] {
        self.head_line().method()
    }

    /// See [`HeadLine::target`].
    pub fn target(&self) -> &[u8] {
        self.head_line().target()
    }

    /// See [`HeadLine::version`].
    pub fn version(&self) -> Option<&[u8]> {
        self.head_line().version()
    }

    pub fn headers(&self) -> &HeaderFields {
        self.header_parser.headers()
    }

    pub fn headers_raw(&self) -> &Bytes {
        self.header_parser.headers_raw()
    }

    /// Body bytes collected so far.
    pub fn body(&self) -> &[u8] {
        self.body_decoder.body()
    }

    /// Consumes the parser and returns the request, if it is complete.
    pub fn into_request(self) -> Option<ParsedRequest> {
        if !self.is_finished() {
            return None;
        }

        let (head_line, headers, headers_raw) = self.header_parser.into_parts();
        Some(ParsedRequest::new(head_line, headers, headers_raw, self.body_decoder.into_body()))
    }
}
