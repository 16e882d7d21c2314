//! Command-line configuration for the echo server.

use std::time::Duration;

use clap::Parser;
use micro_echo::connection::{DEFAULT_READ_BUFFER_SIZE, DEFAULT_SERVER_NAME};
use micro_echo::server::{Server, ServerBuildError, ServerBuilder};
use tracing::Level;

/// Command-line arguments for the echo server
#[derive(Parser, Debug)]
#[command(name = "micro-echo-server")]
#[command(version)]
#[command(about = "An HTTP/1.1 server answering every request with its own body", long_about = None)]
pub struct CliArgs {
    /// Address to bind to (e.g., 127.0.0.1:6688)
    #[arg(short = 'l', long, default_value = "127.0.0.1:6688")]
    pub listen: String,

    /// Value of the `Server` response header
    #[arg(long, default_value = DEFAULT_SERVER_NAME)]
    pub server_name: String,

    /// Maximum number of bytes taken by a single read
    #[arg(long, default_value_t = DEFAULT_READ_BUFFER_SIZE)]
    pub read_buffer_size: usize,

    /// Deadline in milliseconds for receiving a complete request
    #[arg(long)]
    pub read_timeout_ms: Option<u64>,

    /// Deadline in milliseconds for writing the response
    #[arg(long)]
    pub write_timeout_ms: Option<u64>,

    /// Maximum size in bytes of a request header block (unbounded if unset)
    #[arg(long)]
    pub max_header_size: Option<usize>,

    /// Maximum number of connections served at once (unbounded if unset)
    #[arg(short = 'c', long)]
    pub max_connections: Option<usize>,

    /// Seconds in-flight connections may keep running after Ctrl-C
    #[arg(long, default_value_t = 10)]
    pub shutdown_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

impl CliArgs {
    /// Maps the arguments onto a [`ServerBuilder`].
    pub fn server_builder(&self) -> ServerBuilder {
        let mut builder = Server::builder()
            .address(self.listen.as_str())
            .server_name(&self.server_name)
            .read_buffer_size(self.read_buffer_size)
            .shutdown_timeout(Duration::from_secs(self.shutdown_timeout_secs));

        if let Some(ms) = self.read_timeout_ms {
            builder = builder.read_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.write_timeout_ms {
            builder = builder.write_timeout(Duration::from_millis(ms));
        }
        if let Some(max_header_size) = self.max_header_size {
            builder = builder.max_header_size(max_header_size);
        }
        if let Some(max_connections) = self.max_connections {
            builder = builder.max_connections(max_connections);
        }
        builder
    }

    pub fn build_server(&self) -> Result<Server, ServerBuildError> {
        self.server_builder().build()
    }
}
