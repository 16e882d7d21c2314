use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, trace};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::protocol::{EchoResponse, HttpError, ParseError, ParsedRequest, SendError};

/// Default size of a single read from the connection
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Default value of the `Server` response header
pub const DEFAULT_SERVER_NAME: &str = "micro-echo";

/// Per-connection settings.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// Value of the `Server` response header
    pub server_name: Arc<str>,
    /// Upper bound of bytes taken by a single read
    pub read_buffer_size: usize,
    /// Deadline for receiving the complete request
    pub read_timeout: Option<Duration>,
    /// Deadline for writing the response and closing the write side
    pub write_timeout: Option<Duration>,
    /// Upper bound of the header block size, unbounded when `None`
    pub max_header_size: Option<usize>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            server_name: Arc::from(DEFAULT_SERVER_NAME),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            read_timeout: None,
            write_timeout: None,
            max_header_size: None,
        }
    }
}

/// An HTTP connection carrying exactly one request and one response.
///
/// `HttpConnection` runs the whole lifecycle of an accepted connection:
/// - reads chunks and feeds them to the request parser until the request is
///   complete
/// - writes a single response echoing the request body
/// - shuts the write side down, the connection is closed when dropped
///
/// If the peer closes before the request is complete, nothing is written.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
    options: ConnectionOptions,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_options(reader, writer, ConnectionOptions::default())
    }

    pub fn with_options(reader: R, writer: W, options: ConnectionOptions) -> Self {
        let decoder = match options.max_header_size {
            Some(max_header_size) => RequestDecoder::with_max_header_size(max_header_size),
            None => RequestDecoder::new(),
        };
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, options.read_buffer_size),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
            options,
        }
    }

    pub async fn process(mut self) -> Result<(), HttpError> {
        let request = self.receive_request().await?;

        debug!(header = %String::from_utf8_lossy(request.headers_raw()), "received request header");
        debug!(body = %String::from_utf8_lossy(request.body()), "received request body");
        for (name, value) in request.headers() {
            trace!(name = %String::from_utf8_lossy(name), value = %String::from_utf8_lossy(value), "request header field");
        }
        info!(
            method = %String::from_utf8_lossy(request.method()),
            target = %String::from_utf8_lossy(request.target()),
            body_size = request.body().len(),
            "request complete"
        );

        let response = EchoResponse::echo(Arc::clone(&self.options.server_name), request);
        self.send_response(response).await?;
        Ok(())
    }

    async fn receive_request(&mut self) -> Result<ParsedRequest, ParseError> {
        let next = match self.options.read_timeout {
            Some(read_timeout) => {
                timeout(read_timeout, self.framed_read.next()).await.map_err(|_elapsed| ParseError::timeout(read_timeout))?
            }
            None => self.framed_read.next().await,
        };

        match next {
            Some(result) => result,
            None => {
                let received = self.framed_read.decoder().received().unwrap_or_default();
                Err(ParseError::premature_close(received))
            }
        }
    }

    async fn send_response(&mut self, response: EchoResponse) -> Result<(), SendError> {
        let write_timeout = self.options.write_timeout;
        let send = async {
            // send flushes, looping until every byte is written
            self.framed_write.send(response).await?;
            self.framed_write.get_mut().shutdown().await.map_err(SendError::io)
        };

        match write_timeout {
            Some(write_timeout) => timeout(write_timeout, send).await.map_err(|_elapsed| SendError::timeout(write_timeout))?,
            None => send.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Hands out one queued chunk per read, then EOF.
    struct ChunkedReader {
        chunks: VecDeque<Vec<u8>>,
        error_at_end: bool,
    }

    impl ChunkedReader {
        fn new(chunks: &[&[u8]]) -> Self {
            Self { chunks: chunks.iter().map(|chunk| chunk.to_vec()).collect(), error_at_end: false }
        }

        fn failing(chunks: &[&[u8]]) -> Self {
            Self { error_at_end: true, ..Self::new(chunks) }
        }
    }

    impl AsyncRead for ChunkedReader {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let Some(mut chunk) = self.chunks.pop_front() else {
                if self.error_at_end {
                    return Poll::Ready(Err(io::Error::from(io::ErrorKind::ConnectionReset)));
                }
                return Poll::Ready(Ok(()));
            };

            let amt = std::cmp::min(chunk.len(), buf.remaining());
            buf.put_slice(&chunk[..amt]);
            if amt < chunk.len() {
                let rest = chunk.split_off(amt);
                self.chunks.push_front(rest);
            }
            Poll::Ready(Ok(()))
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        data: Vec<u8>,
        writes: usize,
        shutdown: bool,
        broken: bool,
    }

    impl AsyncWrite for RecordingWriter {
        fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, io::Error>> {
            if self.broken {
                return Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)));
            }
            self.writes += 1;
            self.data.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
            self.shutdown = true;
            Poll::Ready(Ok(()))
        }
    }

    async fn run(chunks: &[&[u8]]) -> (Result<(), HttpError>, RecordingWriter) {
        let mut writer = RecordingWriter::default();
        let result = HttpConnection::new(ChunkedReader::new(chunks), &mut writer).process().await;
        (result, writer)
    }

    #[tokio::test]
    async fn echoes_body_in_single_write() {
        let (result, writer) = run(&[b"POST /echo HTTP/1.1\r\nHost: a\r\nContent-Length: 5\r\n\r\nhello"]).await;

        result.unwrap();
        assert_eq!(
            writer.data,
            b"HTTP/1.1 200 OK\r\nServer: micro-echo\r\nConnection: close\r\nContent-Length: 5\r\n\r\nhello"
        );
        assert_eq!(writer.writes, 1);
        assert!(writer.shutdown);
    }

    #[tokio::test]
    async fn request_without_body_gets_empty_echo() {
        let (result, writer) = run(&[b"GET /x HTTP/1.1\r\nHost: a\r\n\r\n"]).await;

        result.unwrap();
        assert!(writer.data.ends_with(b"Content-Length: 0\r\n\r\n"));
    }

    #[tokio::test]
    async fn body_across_reads() {
        let (result, writer) = run(&[b"GET / HTTP/1.1\r\nContent-Length: 3\r\n\r\n", b"a", b"bc"]).await;

        result.unwrap();
        assert!(writer.data.ends_with(b"Content-Length: 3\r\n\r\nabc"));
    }

    #[tokio::test]
    async fn excess_body_is_not_echoed() {
        let (result, writer) = run(&[b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\n12345678"]).await;

        result.unwrap();
        assert!(writer.data.ends_with(b"Content-Length: 5\r\n\r\n12345"));
    }

    #[tokio::test]
    async fn large_body_is_read_in_many_chunks() {
        let body = vec![b'x'; 10 * DEFAULT_READ_BUFFER_SIZE + 7];
        let mut request = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", body.len()).into_bytes();
        request.extend_from_slice(&body);

        let (result, writer) = run(&[request.as_slice()]).await;

        result.unwrap();
        assert!(writer.data.ends_with(&body));
        let header = format!("Content-Length: {}\r\n\r\n", body.len());
        assert!(writer.data.windows(header.len()).any(|window| window == header.as_bytes()));
    }

    #[tokio::test]
    async fn close_before_headers_complete_writes_nothing() {
        let (result, writer) = run(&[b"GET / HTTP/1.1\r\n"]).await;

        match result {
            Err(HttpError::RequestError { source: ParseError::PrematureClose { received } }) => assert_eq!(received, 16),
            other => panic!("expect premature close, got {other:?}"),
        }
        assert!(writer.data.is_empty());
        assert_eq!(writer.writes, 0);
    }

    #[tokio::test]
    async fn close_before_body_complete_writes_nothing() {
        let (result, writer) = run(&[b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc"]).await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::PrematureClose { .. } })));
        assert!(writer.data.is_empty());
    }

    #[tokio::test]
    async fn immediate_close_is_premature() {
        let (result, writer) = run(&[]).await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::PrematureClose { received: 0 } })));
        assert!(writer.data.is_empty());
    }

    #[tokio::test]
    async fn read_error_is_surfaced() {
        let mut writer = RecordingWriter::default();
        let reader = ChunkedReader::failing(&[b"GET / HTTP/1.1\r\n"]);

        let result = HttpConnection::new(reader, &mut writer).process().await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::Io { .. } })));
        assert!(writer.data.is_empty());
    }

    #[tokio::test]
    async fn write_error_is_surfaced() {
        let mut writer = RecordingWriter { broken: true, ..Default::default() };
        let reader = ChunkedReader::new(&[b"GET / HTTP/1.1\r\n\r\n"]);

        let result = HttpConnection::new(reader, &mut writer).process().await;

        assert!(matches!(result, Err(HttpError::ResponseError { source: SendError::Io { .. } })));
    }

    #[tokio::test]
    async fn custom_server_name() {
        let mut writer = RecordingWriter::default();
        let options = ConnectionOptions { server_name: Arc::from("my_server"), ..Default::default() };
        let reader = ChunkedReader::new(&[b"GET / HTTP/1.1\r\n\r\n"]);

        HttpConnection::with_options(reader, &mut writer, options).process().await.unwrap();

        assert!(writer.data.starts_with(b"HTTP/1.1 200 OK\r\nServer: my_server\r\n"));
    }

    #[tokio::test]
    async fn oversized_header_is_rejected_without_response() {
        let mut writer = RecordingWriter::default();
        let options = ConnectionOptions { max_header_size: Some(64), read_buffer_size: 16, ..Default::default() };
        let filler = vec![b'a'; 256];
        let reader = ChunkedReader::new(&[b"GET / HTTP/1.1\r\nX-Fill: ", filler.as_slice()]);

        let result = HttpConnection::with_options(reader, &mut writer, options).process().await;

        match result {
            Err(HttpError::RequestError { source: ParseError::TooLargeHeader { current_size, max_size } }) => {
                assert!(current_size > 64);
                assert_eq!(max_size, 64);
            }
            other => panic!("expect too large header, got {other:?}"),
        }
        assert!(writer.data.is_empty());
    }

    #[tokio::test]
    async fn header_limit_does_not_bound_body() {
        let mut writer = RecordingWriter::default();
        let options = ConnectionOptions { max_header_size: Some(64), ..Default::default() };
        let body = vec![b'x'; 4096];
        let reader = ChunkedReader::new(&[b"POST / HTTP/1.1\r\nContent-Length: 4096\r\n\r\n", body.as_slice()]);

        HttpConnection::with_options(reader, &mut writer, options).process().await.unwrap();

        assert!(writer.data.ends_with(&body));
    }

    #[tokio::test]
    async fn stalled_peer_hits_read_timeout() {
        let mut writer = RecordingWriter::default();
        // keep the client half alive so reads stay pending
        let (_client, server) = tokio::io::duplex(64);
        let options = ConnectionOptions { read_timeout: Some(Duration::from_millis(20)), ..Default::default() };

        let result = HttpConnection::with_options(server, &mut writer, options).process().await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::Timeout { .. } })));
        assert!(writer.data.is_empty());
    }
}
