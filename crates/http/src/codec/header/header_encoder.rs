//! Encoder for the echo response head
//!
//! Writes the status line and the fixed header set:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Server: <server name>\r\n
//! Connection: close\r\n
//! Content-Length: <body length>\r\n
//! \r\n
//! ```

use crate::protocol::{EchoResponse, SendError};

use bytes::{BufMut, BytesMut};

use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 256;

/// Encoder for the response head implementing the [`Encoder`] trait.
#[derive(Debug)]
pub struct HeaderEncoder;

impl Encoder<&EchoResponse> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the status line and headers of `item` into `dst`.
    ///
    /// # Errors
    ///
    /// Writing into a `BytesMut` does not fail, the error type only exists
    /// to satisfy the `Encoder` contract.
    fn encode(&mut self, item: &EchoResponse, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        let status = item.status();
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or_default())?;

        dst.put_slice(b"Server: ");
        dst.put_slice(item.server_name().as_bytes());
        dst.put_slice(b"\r\n");

        dst.put_slice(b"Connection: close\r\n");

        write!(FastWrite(dst), "Content-Length: {}\r\n", item.content_length())?;

        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format straight into the buffer without an intermediate
/// `String`.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
