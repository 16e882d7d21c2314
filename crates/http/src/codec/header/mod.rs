//! HTTP header processing
//!
//! - [`HeaderBlockParser`]: accumulates request bytes until the blank line
//!   and builds the headline and field map
//! - [`HeaderEncoder`]: writes the echo response status line and headers

mod header_block_parser;
mod header_encoder;

pub use header_block_parser::HeaderBlockParser;
pub use header_encoder::HeaderEncoder;
