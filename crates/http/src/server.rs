//! TCP listener driving one [`HttpConnection`] per accepted connection.
//!
//! Each connection runs on its own tokio task and shares nothing with the
//! others. By default the number of concurrent connections is unbounded and
//! no deadlines apply; [`ServerBuilder`] can set both.
//!
//! # Example
//!
//! ```no_run
//! use micro_echo::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let listener = Server::builder().address("127.0.0.1:6688").build()?.bind().await?;
//!     listener.run_until(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     }).await;
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use crate::connection::{ConnectionOptions, HttpConnection};
use crate::ensure;

/// Default time given to in-flight connections once shutdown starts
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct ServerBuilder {
    address: Option<String>,
    options: ConnectionOptions,
    max_connections: Option<usize>,
    shutdown_timeout: Duration,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { address: None, options: ConnectionOptions::default(), max_connections: None, shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT }
    }

    /// Address to listen on, e.g. `127.0.0.1:6688`. Host names are resolved
    /// on bind and each resolved address is tried in turn.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Value of the `Server` response header.
    pub fn server_name(mut self, server_name: impl AsRef<str>) -> Self {
        self.options.server_name = Arc::from(server_name.as_ref());
        self
    }

    pub fn read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.options.read_buffer_size = read_buffer_size;
        self
    }

    /// Deadline for receiving a complete request on a connection.
    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.options.read_timeout = Some(read_timeout);
        self
    }

    /// Deadline for writing the response on a connection.
    pub fn write_timeout(mut self, write_timeout: Duration) -> Self {
        self.options.write_timeout = Some(write_timeout);
        self
    }

    /// Rejects requests whose header block grows past `max_header_size` bytes.
    pub fn max_header_size(mut self, max_header_size: usize) -> Self {
        self.options.max_header_size = Some(max_header_size);
        self
    }

    /// Caps concurrently served connections; accepting pauses at the cap.
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = Some(max_connections);
        self
    }

    /// How long in-flight connections may keep running after shutdown starts.
    pub fn shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?;
        ensure!(self.options.read_buffer_size > 0, ServerBuildError::ZeroReadBufferSize);
        ensure!(self.options.max_header_size != Some(0), ServerBuildError::ZeroMaxHeaderSize);
        if let Some(max) = self.max_connections {
            ensure!(max > 0, ServerBuildError::ZeroMaxConnections);
            ensure!(max <= Semaphore::MAX_PERMITS, ServerBuildError::TooManyConnections { max });
        }

        Ok(Server {
            address,
            options: self.options,
            max_connections: self.max_connections,
            shutdown_timeout: self.shutdown_timeout,
        })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("address must be set")]
    MissingAddress,
    #[error("read buffer size must be greater than zero")]
    ZeroReadBufferSize,
    #[error("max header size must be greater than zero")]
    ZeroMaxHeaderSize,
    #[error("max connections must be greater than zero")]
    ZeroMaxConnections,
    #[error("max connections {max} exceeds the limit of {}", Semaphore::MAX_PERMITS)]
    TooManyConnections { max: usize },
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("bind {address} error: {source}")]
    Bind { address: String, source: io::Error },

    #[error("can't read local address: {source}")]
    LocalAddr { source: io::Error },
}

/// A validated server configuration, ready to bind.
#[derive(Debug)]
pub struct Server {
    address: String,
    options: ConnectionOptions,
    max_connections: Option<usize>,
    shutdown_timeout: Duration,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    pub fn max_connections(&self) -> Option<usize> {
        self.max_connections
    }

    /// Binds the listening socket.
    pub async fn bind(self) -> Result<Listener, ServerError> {
        let tcp_listener = match TcpListener::bind(self.address.as_str()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(address = %self.address, cause = %e, "bind server error");
                return Err(ServerError::Bind { address: self.address, source: e });
            }
        };
        let local_addr = tcp_listener.local_addr().map_err(|source| ServerError::LocalAddr { source })?;

        info!(%local_addr, "start listening");
        Ok(Listener {
            tcp_listener,
            local_addr,
            options: self.options,
            limiter: self.max_connections.map(|max| Arc::new(Semaphore::new(max))),
            shutdown_timeout: self.shutdown_timeout,
        })
    }
}

/// A bound server accepting connections.
#[derive(Debug)]
pub struct Listener {
    tcp_listener: TcpListener,
    local_addr: SocketAddr,
    options: ConnectionOptions,
    limiter: Option<Arc<Semaphore>>,
    shutdown_timeout: Duration,
}

impl Listener {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until the process ends.
    pub async fn run(self) {
        self.run_until(std::future::pending()).await;
    }

    /// Accepts connections until `shutdown` completes.
    ///
    /// Once `shutdown` fires no more connections are accepted. Connections
    /// in flight get the shutdown timeout to finish, after which they are
    /// cancelled. Returns when every connection task has ended.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let tracker = TaskTracker::new();
        let cancel_token = CancellationToken::new();
        tokio::pin!(shutdown);

        loop {
            let permit = match &self.limiter {
                Some(limiter) => select! {
                    () = &mut shutdown => break,
                    permit = Arc::clone(limiter).acquire_owned() => match permit {
                        Ok(permit) => Some(permit),
                        Err(_closed) => break,
                    },
                },
                None => None,
            };

            let (tcp_stream, remote_addr) = select! {
                () = &mut shutdown => break,
                accepted = self.tcp_listener.accept() => match accepted {
                    Ok(stream_and_addr) => stream_and_addr,
                    Err(e) => {
                        warn!(cause = %e, "failed to accept");
                        continue;
                    }
                },
            };

            let options = self.options.clone();
            let cancel_token = cancel_token.clone();
            tracker.spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::with_options(reader, writer, options);
                serve_connection(connection, remote_addr, cancel_token, permit).await;
            });
        }

        tracker.close();
        info!(in_flight = tracker.len(), "stop accepting, waiting for connections");

        if timeout(self.shutdown_timeout, tracker.wait()).await.is_err() {
            warn!(in_flight = tracker.len(), "shutdown timeout elapsed, cancel remaining connections");
            cancel_token.cancel();
            tracker.wait().await;
        }
        info!("server stopped");
    }
}

async fn serve_connection<R, W>(
    connection: HttpConnection<R, W>,
    remote_addr: SocketAddr,
    cancel_token: CancellationToken,
    _permit: Option<OwnedSemaphorePermit>,
) where
    R: tokio::io::AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    select! {
        result = connection.process() => match result {
            Ok(()) => info!(%remote_addr, "finished process, connection shutdown"),
            Err(e) => error!(%remote_addr, cause = %e, "connection process error, connection shutdown"),
        },
        () = cancel_token.cancelled() => warn!(%remote_addr, "server shutting down, connection dropped"),
    }
}
