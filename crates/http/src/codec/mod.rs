//! HTTP codec module for receiving requests and encoding responses
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`HeaderBlockParser`]: accumulates bytes until the header block ends
//!   - [`RequestParser`]: drives the header parser and collects the body up
//!     to its declared length, see [`ParserState`]
//!   - [`RequestDecoder`]: [`Decoder`](tokio_util::codec::Decoder) adapter
//!     over [`RequestParser`]
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: writes the echo response head and body
//!
//! # Example
//!
//! ```
//! use micro_echo::codec::RequestParser;
//!
//! let mut parser = RequestParser::new();
//! parser.push_chunk(b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhel");
//! assert!(!parser.is_finished());
//!
//! parser.push_chunk(b"lo");
//! assert!(parser.is_finished());
//! assert_eq!(parser.body(), b"hello");
//! ```

mod body;
mod header;
mod request_decoder;
mod request_parser;
mod response_encoder;

pub use header::HeaderBlockParser;
pub use request_decoder::RequestDecoder;
pub use request_parser::{ParserState, RequestParser};
pub use response_encoder::ResponseEncoder;
