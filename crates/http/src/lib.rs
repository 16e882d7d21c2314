//! An asynchronous micro HTTP/1.1 echo server
//!
//! Each accepted connection carries exactly one request. The request is
//! parsed incrementally from whatever chunks the socket delivers, and the
//! server answers with a `200 OK` whose body is the request body, then closes
//! the connection.
//!
//! # Example
//!
//! ```no_run
//! use micro_echo::server::Server;
//! use tracing::{error, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let server = Server::builder()
//!         .address("127.0.0.1:6688")
//!         .server_name("my_server")
//!         .build()
//!         .expect("valid server config");
//!
//!     match server.bind().await {
//!         Ok(listener) => listener.run().await,
//!         Err(e) => error!(cause = %e, "bind server error"),
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request and response types, errors
//! - [`codec`]: the incremental request parser and the response encoder
//! - [`connection`]: the per-connection request lifecycle
//! - [`server`]: listener loop spawning one task per connection
//!
//! # Request Parsing
//!
//! [`codec::RequestParser`] accepts chunks of any size. The header block
//! ends at the first `\r\n\r\n`; field names are matched case-insensitively
//! and a repeated name keeps its last value. The body is exactly
//! `content-length` bytes long, a missing or unparsable length counts as 0
//! and extra bytes are dropped.
//!
//! The parser is lenient: field lines without `": "` are skipped and a
//! headline without spaces reports `GET` as both method and target.
//!
//! # Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error of a connection
//! - [`protocol::ParseError`]: the peer closed early, a read failed or timed out
//! - [`protocol::SendError`]: the response write failed or timed out
//!
//! An error ends only the connection it happened on.
//!
//! # Limitations
//!
//! - HTTP/1.1 only, one request per connection (no keep-alive, no pipelining)
//! - No chunked transfer-encoding
//! - No TLS support (use a reverse proxy for HTTPS)

pub mod codec;
pub mod connection;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
