//! TCP relay engine.
//!
//! One task per accepted connection; within a session, two directional copy
//! loops race each other. Coordination between the directions is socket
//! closure: when either loop ends the session returns, both streams drop,
//! and the surviving loop observes an error or EOF.

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn, Instrument};

use super::rotation::TargetRotor;
use crate::shutdown::Shutdown;
use crate::status::ExitStatus;

/// Bytes read per relay iteration. A near-MTU tuning value, not a protocol
/// size.
pub const RELAY_BUFFER_SIZE: usize = 1492;

/// Accepts client connections and relays each to the next rotated target.
pub struct TcpForwarder {
    listener: TcpListener,
    rotor: TargetRotor,
}

impl TcpForwarder {
    /// Bind the listen endpoint.
    pub async fn bind(listen: SocketAddr, targets: Vec<SocketAddr>) -> io::Result<Self> {
        let listener = TcpListener::bind(listen).await?;
        let rotor = TargetRotor::new(targets);
        info!(
            listen = %listener.local_addr()?,
            targets = rotor.len(),
            "TCP listener bound"
        );
        Ok(Self { listener, rotor })
    }

    /// Get the local address this forwarder is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until shutdown or an unrecoverable accept error.
    ///
    /// Target selection happens in the accept loop, so rotation order is
    /// strict accept order. Sessions run independently; a failing session
    /// never affects the listener or other sessions. In-flight sessions are
    /// not torn down on shutdown.
    pub async fn run(mut self, mut shutdown: Shutdown) -> ExitStatus {
        let mut session_id: u64 = 0;
        info!("Listening for connections");

        loop {
            let accepted = tokio::select! {
                _ = shutdown.requested() => {
                    info!("Shutdown requested, closing TCP listener");
                    return ExitStatus::Ok;
                }
                accepted = self.listener.accept() => accepted,
            };

            match accepted {
                Ok((client, peer_addr)) => {
                    session_id += 1;
                    let target = self.rotor.select_next();
                    info!(
                        session = session_id,
                        peer_addr = %peer_addr,
                        target = %target,
                        "Client connected"
                    );

                    tokio::spawn(
                        relay_session(client, target)
                            .instrument(tracing::info_span!("session", id = session_id)),
                    );
                }
                Err(e) => {
                    if shutdown.is_requested() {
                        info!("Shutdown requested, closing TCP listener");
                        return ExitStatus::Ok;
                    }
                    error!(error = %e, "Accept failed");
                    return ExitStatus::ReadFailure;
                }
            }
        }
    }
}

/// Dial the target and relay bytes both ways until either direction ends.
///
/// A dial failure is local to the session: the client stream is dropped and
/// the task returns.
async fn relay_session(client: TcpStream, target: SocketAddr) {
    let remote = match TcpStream::connect(target).await {
        Ok(remote) => remote,
        Err(e) => {
            warn!(target = %target, error = %e, "Dial failed");
            return;
        }
    };
    debug!(target = %target, "Connected to target");

    let (client_read, client_write) = client.into_split();
    let (remote_read, remote_write) = remote.into_split();

    tokio::select! {
        _ = relay_direction("client->target", client_read, remote_write) => {}
        _ = relay_direction("target->client", remote_read, client_write) => {}
    }

    debug!("Session closed");
}

/// One directional copy loop. Ends on EOF, a read error, a write error, or a
/// short write (no partial-write retry is attempted).
async fn relay_direction(label: &'static str, mut read: OwnedReadHalf, mut write: OwnedWriteHalf) {
    let mut buf = vec![0u8; RELAY_BUFFER_SIZE];

    loop {
        let n = match read.read(&mut buf).await {
            Ok(0) => {
                debug!(direction = label, "disconnected");
                return;
            }
            Ok(n) => n,
            Err(e) => {
                debug!(direction = label, error = %e, "Read error");
                return;
            }
        };

        match write.write(&buf[..n]).await {
            Ok(written) if written == n => {}
            Ok(written) => {
                warn!(direction = label, written, read = n, "Short write");
                return;
            }
            Err(e) => {
                debug!(direction = label, error = %e, "Write error");
                return;
            }
        }
    }
}
