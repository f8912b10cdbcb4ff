//! Listen-dispatch-relay engine.
//!
//! Resolves the configured endpoints, binds the listener for the selected
//! transport, and serves until shutdown or an unrecoverable error. Startup
//! and loop-level failures surface as an [`ExitStatus`]; per-session
//! failures are logged and swallowed inside the engines.

mod rotation;
mod tcp;
mod udp;

pub use rotation::TargetRotor;
pub use tcp::{TcpForwarder, RELAY_BUFFER_SIZE};
pub use udp::{UdpForwarder, MAX_DATAGRAM_SIZE};

use tracing::{error, info};

use crate::cli::{Cli, Mode};
use crate::resolve::resolve_addr;
use crate::shutdown::Shutdown;
use crate::status::ExitStatus;

/// Resolve endpoints, bind the listener, and serve until shutdown.
pub async fn run(cli: &Cli, shutdown: Shutdown) -> ExitStatus {
    let listen = match resolve_addr(&cli.listen).await {
        Ok(addr) => addr,
        Err(e) => {
            error!(addr = %cli.listen, error = %e, "Cannot resolve listen address");
            return ExitStatus::ResolveFailure;
        }
    };

    let mut targets = Vec::with_capacity(cli.targets.len());
    for raw in &cli.targets {
        match resolve_addr(raw).await {
            Ok(addr) => targets.push(addr),
            Err(e) => {
                error!(addr = %raw, error = %e, "Cannot resolve target address");
                return ExitStatus::ResolveFailure;
            }
        }
    }

    let status = match cli.mode {
        Mode::Tcp => match TcpForwarder::bind(listen, targets).await {
            Ok(forwarder) => forwarder.run(shutdown).await,
            Err(e) => {
                error!(listen = %listen, error = %e, "Cannot bind TCP listener");
                return ExitStatus::ListenFailure;
            }
        },
        Mode::Udp => match UdpForwarder::bind(listen, targets).await {
            Ok(forwarder) => forwarder.run(shutdown).await,
            Err(e) => {
                error!(listen = %listen, error = %e, "Cannot bind UDP socket");
                return ExitStatus::ListenFailure;
            }
        },
    };

    info!(status = ?status, "Forwarder stopped");
    status
}
