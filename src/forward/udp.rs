//! UDP relay engine.
//!
//! A single sequential read loop: each inbound datagram is forwarded
//! unmodified to the next rotated target. Fire-and-forget, no reply path,
//! no per-datagram state beyond the rotor.

use std::io;
use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tracing::{error, info, warn};

use super::rotation::TargetRotor;
use crate::shutdown::Shutdown;
use crate::status::ExitStatus;

/// Receive buffer size: the practical ceiling for a UDP payload.
pub const MAX_DATAGRAM_SIZE: usize = 65536;

/// Forwards datagrams from one listening socket to rotated targets.
pub struct UdpForwarder {
    socket: UdpSocket,
    rotor: TargetRotor,
}

impl UdpForwarder {
    /// Bind the listen endpoint.
    pub async fn bind(listen: SocketAddr, targets: Vec<SocketAddr>) -> io::Result<Self> {
        let socket = UdpSocket::bind(listen).await?;
        let rotor = TargetRotor::new(targets);
        info!(
            listen = %socket.local_addr()?,
            targets = rotor.len(),
            "UDP socket bound"
        );
        Ok(Self { socket, rotor })
    }

    /// Get the local address this forwarder is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Forward datagrams until shutdown or an unrecoverable receive error.
    ///
    /// A send failure only drops that datagram; a slow or unreachable target
    /// never stops the loop.
    pub async fn run(mut self, mut shutdown: Shutdown) -> ExitStatus {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        info!("Listening for datagrams");

        loop {
            let received = tokio::select! {
                _ = shutdown.requested() => {
                    info!("Shutdown requested, closing UDP socket");
                    return ExitStatus::Ok;
                }
                received = self.socket.recv_from(&mut buf) => received,
            };

            match received {
                Ok((n, peer_addr)) => {
                    let target = self.rotor.select_next();
                    match self.socket.send_to(&buf[..n], target).await {
                        Ok(sent) if sent == n => {}
                        Ok(sent) => warn!(
                            peer_addr = %peer_addr,
                            target = %target,
                            sent,
                            received = n,
                            "Short send"
                        ),
                        Err(e) => warn!(
                            peer_addr = %peer_addr,
                            target = %target,
                            error = %e,
                            "Forward failed"
                        ),
                    }
                }
                Err(e) => {
                    if shutdown.is_requested() {
                        info!("Shutdown requested, closing UDP socket");
                        return ExitStatus::Ok;
                    }
                    error!(error = %e, "Receive failed");
                    return ExitStatus::ReadFailure;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{port}").parse().unwrap()
    }

    #[tokio::test]
    async fn test_bind_ephemeral() {
        let forwarder = UdpForwarder::bind("127.0.0.1:0".parse().unwrap(), vec![addr(1)])
            .await
            .unwrap();
        assert_ne!(forwarder.local_addr().unwrap().port(), 0);
    }
}
