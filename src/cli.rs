//! Command-line contract.
//!
//! `portfwd <tcp|udp> <listen_address> <target_address>...`
//!
//! Addresses are host:port strings; they are resolved by [`crate::resolve`]
//! after parsing, so the CLI layer carries them as raw strings.

use clap::{Parser, ValueEnum};

/// Transport selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Forward TCP connections.
    Tcp,
    /// Forward UDP datagrams.
    Udp,
}

/// Round-robin TCP/UDP port forwarder.
#[derive(Debug, Parser)]
#[command(name = "portfwd", version, about)]
pub struct Cli {
    /// Transport to forward.
    #[arg(value_enum)]
    pub mode: Mode,

    /// Local address to listen on (host:port).
    pub listen: String,

    /// Target addresses traffic is rotated across (host:port).
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,
}
