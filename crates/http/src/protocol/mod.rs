//! Core HTTP protocol types.
//!
//! These are the values passed between the codec and the connection layer:
//!
//! - **Request side**
//!   - [`HeadLine`]: the verbatim first request line, split on demand
//!   - [`HeaderFields`]: case-insensitive, last-write-wins field map
//!   - [`ParsedRequest`]: a complete request with its body
//!
//! - **Response side**
//!   - [`EchoResponse`]: the fixed-shape `200 OK` echoing a request body
//!
//! - **Errors**
//!   - [`HttpError`]: top-level error of a connection
//!   - [`ParseError`]: failures while receiving a request
//!   - [`SendError`]: failures while writing the response

mod head_line;
pub use head_line::HeadLine;

mod header_fields;
pub use header_fields::HeaderFields;

mod request;
pub use request::ParsedRequest;

mod response;
pub use response::EchoResponse;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
