//! Command line interface for the `streamframe` binary.
//!
//! Kept free of crate imports so the build script can render the man page
//! from the same definition.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

/// What the reader does when the delivery queue is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum QueuePolicyArg {
    /// Wait for the consumer to make room.
    #[default]
    Backpressure,
    /// Close the connection.
    Error,
    /// Discard the frame silently.
    Drop,
    /// Discard the frame and log a warning.
    WarnDrop,
}

/// Command line arguments for the `streamframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "streamframe",
    version,
    about = "Connect to a framed TCP server and log every frame received"
)]
pub struct Cli {
    /// Server address as `host:port`.
    #[arg(short, long)]
    pub addr: String,

    /// Milliseconds between consumer drain passes.
    #[arg(long, default_value_t = 5)]
    pub poll_interval_ms: u64,

    /// Maximum frames held between the reader and the consumer.
    #[arg(long, default_value_t = 1024)]
    pub queue_capacity: usize,

    /// Behaviour when the delivery queue is full.
    #[arg(long, value_enum, default_value_t = QueuePolicyArg::Backpressure)]
    pub policy: QueuePolicyArg,

    /// Largest payload accepted before the connection is closed.
    #[arg(long, default_value_t = 65_535)]
    pub max_payload: u32,

    /// Treat zero-length payloads as corrupt.
    #[arg(long)]
    pub reject_empty: bool,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,
}
