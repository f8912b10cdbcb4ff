//! Round-robin TCP/UDP port forwarder.
//!
//! Listens on one local endpoint and relays traffic to an ordered set of
//! targets: new TCP connections (or individual UDP datagrams) are dispatched
//! across the targets in round-robin order. No protocol awareness, no TLS
//! termination, no connection pooling.
//!
//! The serve loops report their outcome as an [`ExitStatus`] value instead
//! of exiting the process, and shutdown is driven through a generic
//! cancellation pair from [`shutdown::channel`], so the whole engine can be
//! exercised from tests.

use clap::Parser;

pub mod cli;
pub mod forward;
pub mod resolve;
pub mod shutdown;
pub mod status;

pub use cli::{Cli, Mode};
pub use forward::{TargetRotor, TcpForwarder, UdpForwarder};
pub use resolve::{resolve_addr, ResolveError};
pub use shutdown::{Shutdown, ShutdownTrigger};
pub use status::ExitStatus;

/// Full argv-to-status path: parse arguments, resolve endpoints, and serve
/// until shutdown.
///
/// Invalid arguments print clap's usage message and map to
/// [`ExitStatus::BadArguments`]; no process exit happens here.
pub async fn run_from_args<I, T>(args: I, shutdown: Shutdown) -> ExitStatus
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitStatus::BadArguments;
        }
    };

    forward::run(&cli, shutdown).await
}
