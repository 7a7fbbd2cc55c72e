//! LanKV Server Binary
//!
//! Starts the TCP server and, optionally, broadcast replication.

use std::net::IpAddr;
use std::sync::Arc;

use clap::Parser;
use lankv::events::TracingSink;
use lankv::{Config, ReplicationConfig, Server, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// LanKV Server
#[derive(Parser, Debug)]
#[command(name = "lankv-server")]
#[command(about = "In-memory key-value store with LAN broadcast replication")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:27015")]
    listen: String,

    /// Replicate mutations to peers over UDP broadcast
    #[arg(short, long)]
    replicate: bool,

    /// UDP address to receive peer updates on
    #[arg(long, default_value = "0.0.0.0:2306")]
    update_listen: String,

    /// UDP destination for outgoing updates
    #[arg(short, long, default_value = "255.255.255.255:2306")]
    broadcast: String,

    /// Address identifying this host; updates from it are ignored (repeatable).
    /// Defaults to the address that routes to --broadcast
    #[arg(long = "local-addr")]
    local_addrs: Vec<IpAddr>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lankv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("LanKV Server v{}", lankv::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let mut builder = Config::builder().listen_addr(&args.listen);

    if args.replicate {
        tracing::info!("Replicating to {} (updates on {})", args.broadcast, args.update_listen);

        builder = builder.replication(
            ReplicationConfig::builder()
                .listen_addr(&args.update_listen)
                .broadcast_addr(&args.broadcast)
                .local_addrs(args.local_addrs.clone())
                .build(),
        );
    }

    let config = builder.build();

    let store = match Store::open() {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to start store: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::open(&config, store, Arc::new(TracingSink)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
