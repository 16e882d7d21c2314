//! HTTP connection handling module
//!
//! - [`HttpConnection`]: runs the lifecycle of one accepted connection:
//!   - Reads the request chunk by chunk until it is complete
//!   - Writes exactly one response echoing the request body
//!   - Closes the connection, there is no keep-alive
//! - [`ConnectionOptions`]: server name, read size, deadlines and header limit

mod http_connection;

pub use http_connection::{ConnectionOptions, DEFAULT_READ_BUFFER_SIZE, DEFAULT_SERVER_NAME, HttpConnection};
