//! HTTP body handling
//!
//! Only `Content-Length` delimited request bodies are supported, see
//! [`LengthDecoder`]. The response body is written as-is by the response
//! encoder.

mod length_decoder;

pub use length_decoder::LengthDecoder;
