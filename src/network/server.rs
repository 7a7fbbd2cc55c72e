//! TCP Server
//!
//! Accepts connections and hands each one to its own thread.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use crate::config::{Config, ReplicationConfig};
use crate::error::{LanKvError, Result};
use crate::events::{EventSink, TracingSink};
use crate::replication::{
    discover_local_ip, Broadcaster, NoBroadcast, ReplicationListener, UdpBroadcaster,
};
use crate::store::Store;
use super::{Connection, Dispatcher};

/// TCP server for LanKV
pub struct Server {
    listener: TcpListener,
    dispatcher: Dispatcher,
    replication_addr: Option<SocketAddr>,
}

impl Server {
    /// Bind the client listener around an existing dispatcher
    pub fn bind(listen_addr: &str, dispatcher: Dispatcher) -> Result<Self> {
        let listener = TcpListener::bind(listen_addr)?;
        Ok(Self {
            listener,
            dispatcher,
            replication_addr: None,
        })
    }

    /// Wire a server from config
    ///
    /// With replication configured this binds the broadcast socket and
    /// starts the replication listener thread before returning. An empty
    /// `local_addrs` is filled with the discovered route address; if that
    /// fails the server does not start.
    pub fn open(config: &Config, store: Store, sink: Arc<dyn EventSink>) -> Result<Self> {
        let broadcaster: Arc<dyn Broadcaster> = match &config.replication {
            Some(replication) => Arc::new(UdpBroadcaster::bind(
                &replication.source_addr,
                &replication.broadcast_addr,
            )?),
            None => Arc::new(NoBroadcast),
        };

        let dispatcher = Dispatcher::new(store, broadcaster, sink);
        let mut server = Self::bind(&config.listen_addr, dispatcher)?;

        if let Some(replication) = &config.replication {
            let replication = with_self_filter(replication)?;
            let listener = ReplicationListener::bind(&replication, server.dispatcher.clone())?;
            server.replication_addr = Some(listener.local_addr()?);
            listener.spawn()?;
        }

        Ok(server)
    }

    /// Address the client listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Address the replication listener is bound to, if replicating
    pub fn replication_addr(&self) -> Option<SocketAddr> {
        self.replication_addr
    }

    /// Accept connections until the process stops
    pub fn run(self) -> Result<()> {
        tracing::info!("Server listening at {}", self.local_addr()?);

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => tracing::warn!("Failed to accept connection: {}", e),
            }
        }

        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream) {
        let dispatcher = self.dispatcher.clone();

        let spawned = thread::Builder::new()
            .name("lankv-conn".to_string())
            .spawn(move || match Connection::new(stream, dispatcher) {
                // Errors are logged by the handler; the stream closes on drop
                Ok(mut connection) => {
                    let _ = connection.handle();
                }
                Err(e) => tracing::warn!("Failed to set up connection: {}", e),
            });

        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn connection thread: {}", e);
        }
    }
}

fn with_self_filter(replication: &ReplicationConfig) -> Result<ReplicationConfig> {
    let mut replication = replication.clone();
    if replication.local_addrs.is_empty() {
        let ip = discover_local_ip(&replication.broadcast_addr).map_err(|e| {
            LanKvError::Config(format!("Cannot determine local address to filter: {}", e))
        })?;
        tracing::info!("Detected local address: {}", ip);
        replication.local_addrs.push(ip);
    }
    Ok(replication)
}

/// Serve a standalone store on `listen_addr` (blocking)
pub fn start_serving(listen_addr: &str) -> Result<()> {
    let config = Config::builder().listen_addr(listen_addr).build();
    Server::open(&config, Store::open()?, Arc::new(TracingSink))?.run()
}

/// Serve a store on `listen_addr` that replicates with its peers (blocking)
pub fn start_serving_replicated(listen_addr: &str, replication: ReplicationConfig) -> Result<()> {
    let config = Config::builder()
        .listen_addr(listen_addr)
        .replication(replication)
        .build();
    Server::open(&config, Store::open()?, Arc::new(TracingSink))?.run()
}
