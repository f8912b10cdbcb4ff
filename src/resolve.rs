//! Endpoint resolution.
//!
//! Resolution failures are startup input validation: the caller reports them
//! as `ResolveFailure` and never proceeds to serving.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::lookup_host;

/// Errors that can occur when resolving a host:port string.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The lookup itself failed (malformed input or resolver error).
    #[error("cannot resolve '{addr}': {source}")]
    Lookup {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The lookup succeeded but produced no addresses.
    #[error("'{0}' did not resolve to any address")]
    NoAddresses(String),
}

/// Resolve a host:port string into a socket address. The first resolved
/// address wins.
pub async fn resolve_addr(addr: &str) -> Result<SocketAddr, ResolveError> {
    let mut addrs = lookup_host(addr).await.map_err(|source| ResolveError::Lookup {
        addr: addr.to_string(),
        source,
    })?;
    addrs
        .next()
        .ok_or_else(|| ResolveError::NoAddresses(addr.to_string()))
}
