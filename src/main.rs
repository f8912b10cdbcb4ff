//! portfwd
//!
//! Round-robin TCP/UDP port forwarder.
//!
//! This binary:
//! - Parses the transport, listen address, and target addresses from argv
//! - Binds the listen endpoint and relays traffic across the targets
//! - Shuts down cleanly on interrupt, leaving in-flight sessions to finish

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portfwd::shutdown;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfwd");

    let (trigger, watcher) = shutdown::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
            trigger.trigger();
        }
    });

    let status = portfwd::run_from_args(std::env::args(), watcher).await;
    std::process::exit(status.code());
}
