//! Test harness for forwarding integration tests.
//!
//! Provides spawnable TCP/UDP receivers that echo and record what they get,
//! plus small timing helpers.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::{mpsc, oneshot};

/// A TCP target that echoes every byte back and records connections and
/// received bytes.
#[allow(dead_code)]
pub struct TcpEchoTarget {
    pub addr: SocketAddr,
    connections: Arc<AtomicU64>,
    received: Arc<Mutex<Vec<u8>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TcpEchoTarget {
    pub async fn spawn() -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let connections = Arc::new(AtomicU64::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let conn_clone = Arc::clone(&connections);
        let recv_clone = Arc::clone(&received);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accept_result = listener.accept() => {
                        match accept_result {
                            Ok((mut stream, _)) => {
                                conn_clone.fetch_add(1, Ordering::Relaxed);
                                let received = Arc::clone(&recv_clone);
                                tokio::spawn(async move {
                                    let mut buf = vec![0u8; 8192];
                                    loop {
                                        match stream.read(&mut buf).await {
                                            Ok(0) => break,
                                            Ok(n) => {
                                                received
                                                    .lock()
                                                    .unwrap()
                                                    .extend_from_slice(&buf[..n]);
                                                if stream.write_all(&buf[..n]).await.is_err() {
                                                    break;
                                                }
                                            }
                                            Err(_) => break,
                                        }
                                    }
                                });
                            }
                            Err(_) => break,
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
        });

        Ok(Self {
            addr,
            connections,
            received,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn connection_count(&self) -> u64 {
        self.connections.load(Ordering::Relaxed)
    }

    pub fn bytes_received(&self) -> Vec<u8> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for TcpEchoTarget {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A UDP target that hands each received datagram to the test.
#[allow(dead_code)]
pub struct UdpTarget {
    pub addr: SocketAddr,
    datagrams: mpsc::UnboundedReceiver<Vec<u8>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl UdpTarget {
    pub async fn spawn() -> io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 65536];
            loop {
                tokio::select! {
                    recv_result = socket.recv_from(&mut buf) => {
                        match recv_result {
                            Ok((n, _)) => {
                                if tx.send(buf[..n].to_vec()).is_err() {
                                    break;
                                }
                            }
                            Err(_) => break,
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
        });

        Ok(Self {
            addr,
            datagrams: rx,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Receive the next forwarded datagram, or None on timeout.
    pub async fn recv_timeout(&mut self, wait: Duration) -> Option<Vec<u8>> {
        tokio::time::timeout(wait, self.datagrams.recv())
            .await
            .ok()
            .flatten()
    }
}

impl Drop for UdpTarget {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// An address nothing is listening on (bound once and released).
#[allow(dead_code)]
pub async fn unused_tcp_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Poll a condition until it holds, panicking after two seconds.
#[allow(dead_code)]
pub async fn wait_for<F: Fn() -> bool>(what: &str, cond: F) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for: {what}");
}
